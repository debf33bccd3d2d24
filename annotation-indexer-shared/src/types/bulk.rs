//! Bulk action and bulk result types.
//!
//! A `BulkAction` pairs an action descriptor with a document body and only
//! lives for the duration of one bulk request. A `BulkItemResult` is the
//! backend's verdict for one action.

use serde_json::{json, Value};

use crate::types::document::Document;
use crate::types::op_type::OpType;

/// One entry of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    pub op_type: OpType,
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub document: Document,
}

impl BulkAction {
    /// The action descriptor line, e.g.
    /// `{"index": {"_index": "annotations", "_id": "a1"}}`.
    ///
    /// The descriptor never carries `_type`: typeless backends reject it in
    /// bulk metadata, so `doc_type` stays client-side like it does for single
    /// document writes.
    pub fn descriptor(&self) -> Value {
        json!({
            self.op_type.as_str(): {
                "_index": self.index,
                "_id": self.id,
            }
        })
    }
}

/// Classification of a per-item bulk failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkErrorKind {
    /// A `create` action hit an existing document.
    DocumentAlreadyExists,
    Other,
}

/// Error detail for one failed bulk item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    pub kind: BulkErrorKind,
    /// Backend error text, kept for logging.
    pub reason: String,
}

impl BulkItemError {
    pub fn new(kind: BulkErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn already_exists(reason: impl Into<String>) -> Self {
        Self::new(BulkErrorKind::DocumentAlreadyExists, reason)
    }

    pub fn other(reason: impl Into<String>) -> Self {
        Self::new(BulkErrorKind::Other, reason)
    }
}

/// Outcome of one bulk item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemResult {
    pub id: String,
    pub op_type: OpType,
    pub success: bool,
    /// HTTP status reported for the item, 0 when unknown.
    pub status: u16,
    pub error: Option<BulkItemError>,
}

impl BulkItemResult {
    pub fn ok(id: impl Into<String>, op_type: OpType, status: u16) -> Self {
        Self {
            id: id.into(),
            op_type,
            success: true,
            status,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, op_type: OpType, status: u16, error: BulkItemError) -> Self {
        Self {
            id: id.into(),
            op_type,
            success: false,
            status,
            error: Some(error),
        }
    }
}
