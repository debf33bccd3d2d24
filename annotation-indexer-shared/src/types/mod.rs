//! This module defines the core data structures used across the annotation indexer.
//! It re-exports the annotation, document, bulk and op type modules.

pub mod annotation;
pub mod bulk;
pub mod document;
pub mod op_type;
