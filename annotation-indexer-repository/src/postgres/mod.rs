//! PostgreSQL implementation of the annotation store.

mod annotation_store;

pub use annotation_store::PostgresAnnotationStore;
