//! Loader module for the annotation indexer.
//!
//! Writes single annotation documents and soft-deletes them.

use std::sync::Arc;

use annotation_indexer_repository::SearchIndexProvider;
use annotation_indexer_shared::{tombstone, Annotation};
use tracing::{debug, instrument};

use crate::errors::IndexerError;
use crate::events::IndexContext;
use crate::processor::DocumentBuilder;

/// Indexes and deletes one annotation at a time.
///
/// Each call is all-or-nothing: the document is built, then written with a
/// single request. Failures propagate; retrying is up to the caller.
#[derive(Clone)]
pub struct Indexer {
    provider: Arc<dyn SearchIndexProvider>,
    builder: DocumentBuilder,
}

impl Indexer {
    /// Create an indexer using the default presenter.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            builder: DocumentBuilder::default(),
        }
    }

    /// Create an indexer with a custom document builder.
    pub fn with_builder(provider: Arc<dyn SearchIndexProvider>, builder: DocumentBuilder) -> Self {
        Self { provider, builder }
    }

    /// Build the document for `annotation` and write it under the annotation's id.
    ///
    /// # Arguments
    ///
    /// * `context` - Context whose transform hooks run on the document
    /// * `annotation` - The annotation to index
    /// * `target_index` - Index to write to; the provider's index when `None`
    ///
    /// # Errors
    ///
    /// * `IndexerError::Transform` - If a transform hook subscriber fails
    /// * `IndexerError::SearchIndex` - If the write fails
    #[instrument(skip(self, context, annotation), fields(annotation_id = %annotation.id))]
    pub async fn index(
        &self,
        context: &IndexContext,
        annotation: &Annotation,
        target_index: Option<&str>,
    ) -> Result<(), IndexerError> {
        let document = self.builder.build(context, annotation)?;
        let index = target_index.unwrap_or_else(|| self.provider.index_name());

        self.provider
            .index_document(
                index,
                &self.provider.doc_types().annotation,
                &annotation.id,
                &document,
            )
            .await?;

        debug!(index = %index, "Annotation indexed");
        Ok(())
    }

    /// Mark the document of `annotation_id` as deleted.
    ///
    /// Writes `{"deleted": true}` over the existing document. The id stays
    /// resolvable in the index; readers must treat the tombstone as absent.
    ///
    /// # Arguments
    ///
    /// * `annotation_id` - Id of the annotation to delete
    /// * `target_index` - Index to write to; the provider's index when `None`
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        annotation_id: &str,
        target_index: Option<&str>,
    ) -> Result<(), IndexerError> {
        let index = target_index.unwrap_or_else(|| self.provider.index_name());

        self.provider
            .index_document(
                index,
                &self.provider.doc_types().annotation,
                annotation_id,
                &tombstone(),
            )
            .await?;

        debug!(index = %index, "Annotation marked as deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransformError;
    use annotation_indexer_repository::SearchIndexError;
    use annotation_indexer_shared::{BulkAction, BulkItemResult, DocTypes, Document};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Records every single-document write.
    struct MockSearchProvider {
        doc_types: DocTypes,
        writes: Mutex<Vec<(String, String, String, Document)>>,
        should_fail: bool,
    }

    impl MockSearchProvider {
        fn new() -> Self {
            Self {
                doc_types: DocTypes::new("annotation"),
                writes: Mutex::new(Vec::new()),
                should_fail: false,
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchProvider {
        fn index_name(&self) -> &str {
            "hypothesis"
        }

        fn doc_types(&self) -> &DocTypes {
            &self.doc_types
        }

        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn index_document(
            &self,
            index: &str,
            doc_type: &str,
            id: &str,
            document: &Document,
        ) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::index("Mock failure"));
            }
            self.writes.lock().unwrap().push((
                index.to_string(),
                doc_type.to_string(),
                id.to_string(),
                document.clone(),
            ));
            Ok(())
        }

        async fn get_document(
            &self,
            _index: &str,
            _id: &str,
        ) -> Result<Option<Document>, SearchIndexError> {
            Ok(None)
        }

        async fn bulk(
            &self,
            _actions: &[BulkAction],
        ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
            unreachable!("single-document paths never send bulk requests")
        }
    }

    fn annotation() -> Annotation {
        let mut annotation = Annotation::new(
            "test_annotation_id",
            "acct:alice@example.com",
            "http://example.com/example",
        );
        annotation.target_uri_normalized = Some("httpx://example.com/example".to_string());
        annotation
    }

    #[tokio::test]
    async fn test_index_writes_built_document() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());
        let context = IndexContext::new();
        let annotation = annotation();

        indexer.index(&context, &annotation, None).await.unwrap();

        let expected = DocumentBuilder::default().build(&context, &annotation).unwrap();
        let writes = provider.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (index, doc_type, id, document) = &writes[0];
        assert_eq!(index, "hypothesis");
        assert_eq!(doc_type, "annotation");
        assert_eq!(id, "test_annotation_id");
        assert_eq!(document, &expected);
    }

    #[tokio::test]
    async fn test_index_runs_transform_hooks() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());
        let mut context = IndexContext::new();
        context.subscribe(|event| {
            event
                .document
                .insert("transformed".to_string(), Value::Bool(true));
            Ok(())
        });

        indexer.index(&context, &annotation(), None).await.unwrap();

        let writes = provider.writes.lock().unwrap();
        assert_eq!(writes[0].3["transformed"], true);
    }

    #[tokio::test]
    async fn test_index_allows_to_override_target_index() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());

        indexer
            .index(&IndexContext::new(), &annotation(), Some("custom-index"))
            .await
            .unwrap();

        assert_eq!(provider.writes.lock().unwrap()[0].0, "custom-index");
    }

    #[tokio::test]
    async fn test_index_hook_failure_skips_write() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());
        let mut context = IndexContext::new();
        context.subscribe(|_event| Err(TransformError::new("nope")));

        let result = indexer.index(&context, &annotation(), None).await;

        assert!(matches!(result, Err(IndexerError::Transform(_))));
        assert!(provider.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_propagates_backend_failure() {
        let mut provider = MockSearchProvider::new();
        provider.should_fail = true;
        let indexer = Indexer::new(Arc::new(provider));

        let result = indexer.index(&IndexContext::new(), &annotation(), None).await;

        assert!(matches!(
            result,
            Err(IndexerError::SearchIndex(SearchIndexError::IndexError(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_marks_annotation_as_deleted() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());

        indexer.delete("test_annotation_id", None).await.unwrap();

        let writes = provider.writes.lock().unwrap();
        let (index, doc_type, id, document) = &writes[0];
        assert_eq!(index, "hypothesis");
        assert_eq!(doc_type, "annotation");
        assert_eq!(id, "test_annotation_id");
        assert_eq!(Value::Object(document.clone()), json!({"deleted": true}));
    }

    #[tokio::test]
    async fn test_delete_allows_to_override_target_index() {
        let provider = Arc::new(MockSearchProvider::new());
        let indexer = Indexer::new(provider.clone());

        indexer
            .delete("test_annotation_id", Some("custom-index"))
            .await
            .unwrap();

        assert_eq!(provider.writes.lock().unwrap()[0].0, "custom-index");
    }
}
