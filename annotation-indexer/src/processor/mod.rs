//! Processor module for the annotation indexer.
//!
//! Transforms stored annotations into search documents.

mod document_builder;
mod presenter;

pub use document_builder::DocumentBuilder;
pub use presenter::{AnnotationPresenter, SearchIndexPresenter};
