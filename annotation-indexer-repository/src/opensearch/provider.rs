//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use annotation_indexer_shared::{BulkAction, BulkItemResult, DocTypes, Document};
use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, GetParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::response::parse_bulk_response;
use crate::utils::validate_document_id;

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use annotation_indexer_repository::opensearch::IndexConfig;
/// use annotation_indexer_shared::DocTypes;
///
/// let config = IndexConfig::new("annotations", 0);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config, DocTypes::default()).await?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
    doc_types: DocTypes,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    /// * `doc_types` - Logical to backend type table
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(
        url: &str,
        index_config: IndexConfig,
        doc_types: DocTypes,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            annotation_type = %doc_types.annotation,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
            doc_types,
        })
    }

    /// Build the newline-delimited bulk body: descriptor line, then document.
    ///
    /// Descriptors are typeless whatever `doc_type` the actions carry, the
    /// same as `index_document`.
    fn bulk_lines(actions: &[BulkAction]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(actions.len() * 2);
        for action in actions {
            lines.push(action.descriptor());
            lines.push(Value::Object(action.document.clone()));
        }
        lines
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    fn index_name(&self) -> &str {
        &self.index_config.alias
    }

    fn doc_types(&self) -> &DocTypes {
        &self.doc_types
    }

    /// Create the versioned index with its alias unless the alias already resolves.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let alias = self.index_config.alias.as_str();

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(alias = %alias, "Index already exists");
            return Ok(());
        }

        let index_name = self.index_config.versioned_index_name();
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(get_index_settings(alias))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Creating {} failed with status {}: {}",
                index_name, status, error_body
            )));
        }

        info!(index = %index_name, alias = %alias, "Created search index");
        Ok(())
    }

    /// Write a full document under `id` with the index API.
    ///
    /// OpenSearch is typeless, so `doc_type` only shows up in the logs.
    async fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), SearchIndexError> {
        validate_document_id(id)?;

        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, doc_type = %doc_type, doc_id = %id, "Document indexed");
        Ok(())
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<Document>, SearchIndexError> {
        validate_document_id(id)?;

        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::get(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::get(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        match body.get("_source") {
            Some(Value::Object(source)) => Ok(Some(source.clone())),
            _ => Ok(None),
        }
    }

    /// Send one bulk request and parse the per-item results.
    async fn bulk(&self, actions: &[BulkAction]) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        if actions.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(
                Self::bulk_lines(actions)
                    .into_iter()
                    .map(JsonBody::from)
                    .collect::<Vec<JsonBody<Value>>>(),
            )
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let results = parse_bulk_response(actions, &body)?;
        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            warn!(total = results.len(), failed = failed, "Bulk request had item failures");
        } else {
            debug!(total = results.len(), "Bulk request succeeded");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_indexer_shared::OpType;
    use serde_json::json;

    fn action(op_type: OpType, doc_type: &str) -> BulkAction {
        let mut document = Document::new();
        document.insert("id".to_string(), json!("a1"));
        BulkAction {
            op_type,
            index: "annotations".to_string(),
            doc_type: doc_type.to_string(),
            id: "a1".to_string(),
            document,
        }
    }

    #[test]
    fn test_bulk_lines_pair_descriptor_and_document() {
        let lines = OpenSearchProvider::bulk_lines(&[action(OpType::Create, "_doc")]);

        assert_eq!(
            lines,
            vec![
                json!({"create": {"_index": "annotations", "_id": "a1"}}),
                json!({"id": "a1"}),
            ]
        );
    }

    #[test]
    fn test_bulk_lines_are_typeless_for_custom_doc_type() {
        let lines = OpenSearchProvider::bulk_lines(&[
            action(OpType::Index, "annotation"),
            action(OpType::Create, "annotation"),
        ]);

        assert_eq!(lines[0], json!({"index": {"_index": "annotations", "_id": "a1"}}));
        assert_eq!(lines[2], json!({"create": {"_index": "annotations", "_id": "a1"}}));
        assert!(lines.iter().all(|line| line
            .as_object()
            .and_then(|o| o.values().next())
            .and_then(|meta| meta.get("_type"))
            .is_none()));
    }
}
