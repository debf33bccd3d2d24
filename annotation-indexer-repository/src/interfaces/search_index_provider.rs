//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search backend operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use annotation_indexer_shared::{BulkAction, BulkItemResult, DocTypes, Document};
use async_trait::async_trait;

use crate::errors::SearchIndexError;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// A provider owns the backend connection, the default index name, and the
/// table mapping logical type names to backend types. One provider is shared
/// by the single-document and bulk paths, so implementations must not
/// serialize writes; the backend resolves concurrent writes per document.
///
/// # Note on Deletion
///
/// There is no `delete_document`. Annotations are soft-deleted by writing a
/// tombstone document through `index_document`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// The default index all operations target unless told otherwise.
    fn index_name(&self) -> &str;

    /// Logical type name to backend type table.
    fn doc_types(&self) -> &DocTypes;

    /// Ensure the search index and any required aliases exist, creating them if necessary.
    ///
    /// This method should be called during application startup to ensure the backend
    /// is properly initialized before performing document operations.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Write a full document under `id`, replacing any existing document.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index
    /// * `doc_type` - Backend type, `doc_types().annotation` for annotations
    /// * `id` - Document id
    /// * `document` - Full document body
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written
    /// * `Err(SearchIndexError)` - If the request failed or was rejected
    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), SearchIndexError>;

    /// Read back the stored body of a document.
    ///
    /// Returns `Ok(None)` if no document exists under `id`.
    async fn get_document(&self, index: &str, id: &str)
        -> Result<Option<Document>, SearchIndexError>;

    /// Send one bulk request.
    ///
    /// Returns one result per action, in the order of `actions`. Per-item
    /// failures are reported in the results; `Err` means the request as a whole
    /// failed (transport error, rejected request, unreadable response).
    async fn bulk(&self, actions: &[BulkAction]) -> Result<Vec<BulkItemResult>, SearchIndexError>;
}
