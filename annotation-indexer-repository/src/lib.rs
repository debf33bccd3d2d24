//! # Annotation Indexer Repository
//!
//! This crate provides the traits and implementations the indexing core talks
//! to: the search backend (`SearchIndexProvider`, with an OpenSearch
//! implementation and a chunked `streaming_bulk` helper) and the annotation
//! datastore (`AnnotationStore`, with PostgreSQL and in-memory
//! implementations).

pub mod bulk;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod postgres;
pub mod utils;

pub use bulk::streaming_bulk;
pub use config::BulkOptions;
pub use errors::{AnnotationStoreError, SearchIndexError};
pub use interfaces::{AnnotationStore, SearchIndexProvider};
pub use memory::InMemoryAnnotationStore;
pub use opensearch::OpenSearchProvider;
pub use postgres::PostgresAnnotationStore;
pub use utils::validate_document_id;
