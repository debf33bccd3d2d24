use thiserror::Error;

/// Errors raised while reading annotations from the primary datastore.
#[derive(Debug, Error)]
pub enum AnnotationStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
