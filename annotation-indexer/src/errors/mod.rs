//! Error types for the annotation indexer.

use annotation_indexer_repository::{AnnotationStoreError, SearchIndexError};
use thiserror::Error;

/// Errors that can occur while building or writing annotation documents.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// The search backend rejected a request or could not be reached.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// Reading the working set from the annotation store failed.
    #[error("Annotation store error: {0}")]
    AnnotationStore(#[from] AnnotationStoreError),

    /// A transform hook subscriber failed.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Error raised by a transform hook subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    /// Create a transform error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
