//! Annotation presenters.
//!
//! A presenter renders an annotation into the base search document. It is a
//! pure function: no I/O, no hooks, no enrichment.

use annotation_indexer_shared::{Annotation, Document, DocumentMetadata};
use chrono::SecondsFormat;
use serde_json::{json, Map, Value};

/// Renders an annotation into its base search document.
pub trait AnnotationPresenter: Send + Sync {
    fn present(&self, annotation: &Annotation) -> Document;
}

/// The presenter used for the annotation search index.
///
/// The document always carries `id` and a single-entry `target` list. The
/// `document` field is `{}` when the annotation has no document metadata;
/// otherwise it holds `title` as a one-element list (only when a title is
/// set) and `web_uri` (only when set).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchIndexPresenter;

impl SearchIndexPresenter {
    pub fn new() -> Self {
        Self
    }

    fn present_document(metadata: Option<&DocumentMetadata>) -> Value {
        let mut document = Map::new();
        if let Some(metadata) = metadata {
            if let Some(title) = &metadata.title {
                document.insert("title".to_string(), json!([title]));
            }
            if let Some(web_uri) = &metadata.web_uri {
                document.insert("web_uri".to_string(), json!(web_uri));
            }
        }
        Value::Object(document)
    }
}

impl AnnotationPresenter for SearchIndexPresenter {
    fn present(&self, annotation: &Annotation) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!(annotation.id));
        doc.insert(
            "created".to_string(),
            json!(annotation.created.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        doc.insert(
            "updated".to_string(),
            json!(annotation.updated.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        doc.insert("user".to_string(), json!(annotation.userid.to_lowercase()));
        doc.insert("user_raw".to_string(), json!(annotation.userid));
        if let Some(authority) = annotation.authority() {
            doc.insert("authority".to_string(), json!(authority));
        }
        doc.insert("uri".to_string(), json!(annotation.target_uri));
        doc.insert(
            "text".to_string(),
            json!(annotation.text.as_deref().unwrap_or_default()),
        );
        doc.insert("tags".to_string(), json!(annotation.tags));
        doc.insert("tags_raw".to_string(), json!(annotation.tags));
        doc.insert("group".to_string(), json!(annotation.groupid));
        doc.insert("shared".to_string(), json!(annotation.shared));
        doc.insert("references".to_string(), json!(annotation.references));
        doc.insert(
            "thread_ids".to_string(),
            json!([annotation.thread_root_id()]),
        );
        doc.insert(
            "target".to_string(),
            json!([{
                "source": annotation.target_uri,
                "selector": annotation.target_selectors,
            }]),
        );
        doc.insert(
            "document".to_string(),
            Self::present_document(annotation.document.as_ref()),
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation() -> Annotation {
        Annotation::new("test_annotation_id", "acct:Someone@example.com", "http://example.com/example")
    }

    #[test]
    fn test_present_core_fields() {
        let mut annotation = annotation();
        annotation.text = Some("Some text".to_string());
        annotation.tags = vec!["tag".to_string()];

        let doc = SearchIndexPresenter::new().present(&annotation);

        assert_eq!(doc["id"], "test_annotation_id");
        assert_eq!(doc["user"], "acct:someone@example.com");
        assert_eq!(doc["user_raw"], "acct:Someone@example.com");
        assert_eq!(doc["authority"], "example.com");
        assert_eq!(doc["text"], "Some text");
        assert_eq!(doc["tags"], json!(["tag"]));
        assert_eq!(doc["thread_ids"], json!(["test_annotation_id"]));
        assert_eq!(
            doc["target"],
            json!([{"source": "http://example.com/example", "selector": []}])
        );
    }

    #[test]
    fn test_present_has_no_scope() {
        let mut annotation = annotation();
        annotation.target_uri_normalized = Some("httpx://example.com/example".to_string());

        let doc = SearchIndexPresenter::new().present(&annotation);

        assert!(doc["target"][0].get("scope").is_none());
    }

    #[test]
    fn test_present_without_document() {
        let doc = SearchIndexPresenter::new().present(&annotation());
        assert_eq!(doc["document"], json!({}));
    }

    #[test]
    fn test_present_document_title() {
        let mut annotation = annotation();
        annotation.document = Some(DocumentMetadata {
            title: Some("test_document_title".to_string()),
            web_uri: None,
        });

        let doc = SearchIndexPresenter::new().present(&annotation);

        assert_eq!(doc["document"]["title"], json!(["test_document_title"]));
        assert!(doc["document"].get("web_uri").is_none());
    }

    #[test]
    fn test_present_document_without_title() {
        let mut annotation = annotation();
        annotation.document = Some(DocumentMetadata {
            title: None,
            web_uri: Some("http://example.com/example".to_string()),
        });

        let doc = SearchIndexPresenter::new().present(&annotation);

        assert!(doc["document"].get("title").is_none());
        assert_eq!(doc["document"]["web_uri"], "http://example.com/example");
    }
}
