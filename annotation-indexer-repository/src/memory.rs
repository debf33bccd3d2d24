//! In-memory annotation store.
//!
//! Holds annotations in a `Vec` and serves them through the same streaming
//! interface as the PostgreSQL store. Used for tests and local runs.

use annotation_indexer_shared::Annotation;
use futures::stream::{self, BoxStream, StreamExt};

use crate::errors::AnnotationStoreError;
use crate::interfaces::AnnotationStore;

/// An `AnnotationStore` backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotationStore {
    annotations: Vec<Annotation>,
}

impl InMemoryAnnotationStore {
    /// Create a store holding the given annotations, deleted ones included.
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }
}

impl AnnotationStore for InMemoryAnnotationStore {
    fn annotations(&self) -> BoxStream<'_, Result<Annotation, AnnotationStoreError>> {
        stream::iter(self.annotations.iter().filter(|a| !a.deleted))
            .map(|a| Ok(a.clone()))
            .boxed()
    }

    fn annotations_by_ids<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxStream<'a, Result<Annotation, AnnotationStoreError>> {
        stream::iter(
            self.annotations
                .iter()
                .filter(move |a| !a.deleted && ids.contains(&a.id)),
        )
        .map(|a| Ok(a.clone()))
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn annotation(id: &str, deleted: bool) -> Annotation {
        let mut annotation = Annotation::new(id, "acct:alice@example.com", "http://example.com");
        annotation.deleted = deleted;
        annotation
    }

    fn store() -> InMemoryAnnotationStore {
        InMemoryAnnotationStore::new(vec![
            annotation("a1", false),
            annotation("a2", false),
            annotation("a3", true),
            annotation("a4", true),
        ])
    }

    #[tokio::test]
    async fn test_annotations_skips_deleted() {
        let store = store();
        let ids: Vec<String> = store
            .annotations()
            .map_ok(|a| a.id)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_annotations_by_ids_filters_and_skips_deleted() {
        let store = store();
        let filter = vec!["a2".to_string(), "a3".to_string(), "missing".to_string()];
        let ids: Vec<String> = store
            .annotations_by_ids(&filter)
            .map_ok(|a| a.id)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec!["a2"]);
    }
}
