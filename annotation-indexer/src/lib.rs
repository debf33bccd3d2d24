//! # Annotation Indexer
//!
//! Keeps a search index in sync with the annotations of the primary
//! datastore.
//!
//! ## Architecture
//!
//! The indexer follows a Processor-Loader pattern:
//!
//! 1. **Processor**: Turns an annotation into its search document and runs
//!    the transform hooks on it
//! 2. **Loader**: Writes or soft-deletes single documents
//! 3. **Batch**: Streams annotations from the store and writes them in bulk
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`events`]: Transform hook dispatch
//! - [`processor`]: Presenter and document building
//! - [`loader`]: Single-document indexing and deletion
//! - [`batch`]: Bulk reindexing
//! - [`errors`]: Error types for the indexer

pub mod batch;
pub mod config;
pub mod errors;
pub mod events;
pub mod loader;
pub mod processor;

pub use batch::{is_ignorable, BatchIndexer};
pub use config::{ConnectionMode, Dependencies, IndexerConfig};
pub use errors::{IndexerError, TransformError};
pub use events::{AnnotationTransformEvent, IndexContext, TransformHook};
pub use loader::Indexer;
pub use processor::{AnnotationPresenter, DocumentBuilder, SearchIndexPresenter};

use annotation_indexer_repository::AnnotationStoreError;
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Indexing error.
    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),

    /// Failed to reach the annotation store.
    #[error("Database error: {0}")]
    Database(#[from] AnnotationStoreError),

    /// The run finished but some annotations were not indexed.
    #[error("{} annotation(s) failed to index", failed.len())]
    Incomplete { failed: Vec<String> },
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
