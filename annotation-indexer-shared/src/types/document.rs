//! Search document types.
//!
//! A document is the search backend's representation of one annotation. It is
//! kept as a plain JSON object so transform hooks can add, alter or remove
//! fields without the indexer knowing about them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A search document: field name to JSON value.
pub type Document = Map<String, Value>;

/// Backend type used when the backend is typeless.
pub const TYPELESS_DOC_TYPE: &str = "_doc";

/// Mapping from logical document type names to backend type identifiers.
///
/// Only the `annotation` logical type exists today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypes {
    pub annotation: String,
}

impl Default for DocTypes {
    fn default() -> Self {
        Self {
            annotation: TYPELESS_DOC_TYPE.to_string(),
        }
    }
}

impl DocTypes {
    /// Create a type table mapping `annotation` to the given backend type.
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
        }
    }
}

/// The soft-delete marker written in place of a deleted annotation's document.
pub fn tombstone() -> Document {
    let mut doc = Document::new();
    doc.insert("deleted".to_string(), Value::Bool(true));
    doc
}

/// Whether a stored document is a soft-delete marker.
pub fn is_tombstone(doc: &Document) -> bool {
    matches!(doc.get("deleted"), Some(Value::Bool(true)))
}
