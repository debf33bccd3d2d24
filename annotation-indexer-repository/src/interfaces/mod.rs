//! Interface definitions for the search backend and the annotation store.
//!
//! Both are injected into the indexing core so the backends can be swapped
//! and mocked in tests.

mod annotation_store;
mod search_index_provider;

pub use annotation_store::AnnotationStore;
pub use search_index_provider::SearchIndexProvider;
