//! Error types for the annotation indexer repository.
//!
//! One error type for the search backend and one for the annotation store.

mod annotation_store_error;
mod search_index_error;

pub use annotation_store_error::AnnotationStoreError;
pub use search_index_error::SearchIndexError;
