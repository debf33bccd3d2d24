//! # Annotation Indexer Shared
//!
//! This crate defines the data structures shared across the annotation indexer
//! crates: the stored annotation as read from the primary datastore, the
//! search document built from it, and the transient bulk action and bulk
//! result types exchanged with the search backend.

pub mod types;

pub use types::annotation::{Annotation, DocumentMetadata};
pub use types::bulk::{BulkAction, BulkErrorKind, BulkItemError, BulkItemResult};
pub use types::document::{
    is_tombstone, tombstone, DocTypes, Document, TYPELESS_DOC_TYPE,
};
pub use types::op_type::{OpType, ParseOpTypeError};
