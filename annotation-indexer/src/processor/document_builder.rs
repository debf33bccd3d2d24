//! Document building shared by the single-document and batch paths.

use std::sync::Arc;

use annotation_indexer_shared::{Annotation, Document};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::TransformError;
use crate::events::{AnnotationTransformEvent, IndexContext};
use crate::processor::presenter::{AnnotationPresenter, SearchIndexPresenter};

/// Builds the search document for an annotation.
///
/// Building is three steps, always in this order:
///
/// 1. the presenter renders the base document,
/// 2. the context fires the transform event exactly once,
/// 3. `target[0].scope` is set to the annotation's normalized target URI.
///
/// Documents are built fresh on every call and never cached.
#[derive(Clone)]
pub struct DocumentBuilder {
    presenter: Arc<dyn AnnotationPresenter>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SearchIndexPresenter::new()))
    }
}

impl DocumentBuilder {
    pub fn new(presenter: Arc<dyn AnnotationPresenter>) -> Self {
        Self { presenter }
    }

    /// Build the document for `annotation`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a transform hook subscriber.
    pub fn build(
        &self,
        context: &IndexContext,
        annotation: &Annotation,
    ) -> Result<Document, TransformError> {
        let mut document = self.presenter.present(annotation);

        let mut event = AnnotationTransformEvent::new(context, annotation, &mut document);
        context.notify(&mut event)?;

        enrich_scope(&mut document, annotation);

        debug!(annotation_id = %annotation.id, fields = document.len(), "Built document");
        Ok(document)
    }
}

/// Set `target[0].scope` to `[target_uri_normalized]`.
///
/// Does nothing when the annotation has no normalized URI or the document has
/// no non-empty `target` list.
fn enrich_scope(document: &mut Document, annotation: &Annotation) {
    let Some(normalized) = annotation.target_uri_normalized.as_deref() else {
        return;
    };
    if let Some(Value::Array(targets)) = document.get_mut("target") {
        if let Some(Value::Object(target)) = targets.first_mut() {
            target.insert("scope".to_string(), json!([normalized]));
        }
    }
}
