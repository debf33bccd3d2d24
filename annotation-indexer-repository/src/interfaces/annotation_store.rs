//! Annotation store trait definition.

use annotation_indexer_shared::Annotation;
use futures::stream::BoxStream;

use crate::errors::AnnotationStoreError;

/// Read-only access to the annotations held by the primary datastore.
///
/// Both queries return a lazy stream so a full reindex never holds the whole
/// table in memory. Deleted annotations are never yielded.
pub trait AnnotationStore: Send + Sync {
    /// Stream every non-deleted annotation.
    fn annotations(&self) -> BoxStream<'_, Result<Annotation, AnnotationStoreError>>;

    /// Stream the non-deleted annotations whose id is in `ids`.
    ///
    /// Ids that do not exist, or belong to deleted annotations, are skipped.
    fn annotations_by_ids<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxStream<'a, Result<Annotation, AnnotationStoreError>>;
}
