//! Utility functions for the annotation indexer repository.

use crate::errors::SearchIndexError;

/// Validate a document id before it is sent to the backend.
///
/// Ids are opaque, but an empty id would make the backend generate one, which
/// breaks the join between the datastore and the index.
///
/// # Example
///
/// ```
/// use annotation_indexer_repository::validate_document_id;
///
/// assert!(validate_document_id("AVLlVTs1f9G3pW-EYc6q").is_ok());
/// assert!(validate_document_id("").is_err());
/// ```
pub fn validate_document_id(id: &str) -> Result<(), SearchIndexError> {
    if id.trim().is_empty() {
        return Err(SearchIndexError::validation("Document id is required"));
    }
    if id.len() > 512 {
        return Err(SearchIndexError::validation(format!(
            "Document id is {} bytes long, the maximum is 512",
            id.len()
        )));
    }
    Ok(())
}
