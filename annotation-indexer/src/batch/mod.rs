//! Batch indexing of annotations.
//!
//! `BatchIndexer` streams annotations out of the store, builds their search
//! documents and writes them through `streaming_bulk`. Per-item failures are
//! collected into a set of ids; anything else aborts the run.

use std::collections::HashSet;
use std::sync::Arc;

use annotation_indexer_repository::{
    streaming_bulk, AnnotationStore, BulkOptions, SearchIndexProvider,
};
use annotation_indexer_shared::{Annotation, BulkAction, BulkErrorKind, BulkItemError, OpType};
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};

use crate::errors::IndexerError;
use crate::events::IndexContext;
use crate::processor::DocumentBuilder;

pub use annotation_indexer_repository::config::DEFAULT_CHUNK_SIZE;

/// Returns true if a failed bulk item should not be reported.
///
/// Only a `create` hitting an already indexed document is ignorable: the
/// document is there, which is what the caller asked for.
pub fn is_ignorable(op_type: OpType, error: &BulkItemError) -> bool {
    op_type == OpType::Create && error.kind == BulkErrorKind::DocumentAlreadyExists
}

/// Reindexes annotations from an `AnnotationStore` in bulk.
pub struct BatchIndexer {
    store: Arc<dyn AnnotationStore>,
    provider: Arc<dyn SearchIndexProvider>,
    context: Arc<IndexContext>,
    builder: DocumentBuilder,
    op_type: OpType,
    chunk_size: usize,
}

impl BatchIndexer {
    /// Create a batch indexer writing with `index` in chunks of `DEFAULT_CHUNK_SIZE`.
    pub fn new(
        store: Arc<dyn AnnotationStore>,
        provider: Arc<dyn SearchIndexProvider>,
        context: Arc<IndexContext>,
    ) -> Self {
        Self {
            store,
            provider,
            context,
            builder: DocumentBuilder::default(),
            op_type: OpType::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_op_type(mut self, op_type: OpType) -> Self {
        self.op_type = op_type;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_builder(mut self, builder: DocumentBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Index every non-deleted annotation, or those among `filter`.
    ///
    /// # Arguments
    ///
    /// * `filter` - Annotation ids to restrict the run to; all when `None`
    ///
    /// # Returns
    ///
    /// The ids of the annotations that failed to index. Under `create`,
    /// documents that already exist are not counted as failures.
    ///
    /// # Errors
    ///
    /// Store iteration errors, transform hook failures and failed bulk
    /// requests abort the run.
    #[instrument(skip(self, filter), fields(
        request_id = %self.context.request_id(),
        op_type = %self.op_type,
        hooks = self.context.subscriber_count(),
        filtered = filter.is_some(),
    ))]
    pub async fn run(&self, filter: Option<&[String]>) -> Result<HashSet<String>, IndexerError> {
        let annotations = self.annotations(filter);
        let index = self.provider.index_name();
        let doc_type = &self.provider.doc_types().annotation;
        let op_type = self.op_type;
        let context = self.context.as_ref();
        let builder = &self.builder;

        let expand = move |annotation: Annotation| -> Result<BulkAction, IndexerError> {
            let document = builder.build(context, &annotation)?;
            Ok(BulkAction {
                op_type,
                index: index.to_string(),
                doc_type: doc_type.clone(),
                id: annotation.id,
                document,
            })
        };

        let mut results = streaming_bulk(
            self.provider.as_ref(),
            annotations,
            expand,
            BulkOptions::collect_errors(self.chunk_size),
        );

        let mut failed = HashSet::new();
        let mut indexed = 0usize;
        let mut ignored = 0usize;

        while let Some(result) = results.try_next().await? {
            if result.success {
                indexed += 1;
                continue;
            }

            match &result.error {
                Some(error) if is_ignorable(op_type, error) => {
                    debug!(annotation_id = %result.id, "Document already exists, skipping");
                    ignored += 1;
                }
                error => {
                    warn!(
                        annotation_id = %result.id,
                        status = result.status,
                        reason = error.as_ref().map(|e| e.reason.as_str()).unwrap_or_default(),
                        "Failed to index annotation"
                    );
                    failed.insert(result.id);
                }
            }
        }

        info!(
            indexed = indexed,
            failed = failed.len(),
            ignored = ignored,
            "Batch indexing finished"
        );

        Ok(failed)
    }

    fn annotations<'a>(
        &'a self,
        filter: Option<&'a [String]>,
    ) -> BoxStream<'a, Result<Annotation, IndexerError>> {
        let annotations = match filter {
            Some(ids) => self.store.annotations_by_ids(ids),
            None => self.store.annotations(),
        };
        annotations.map_err(IndexerError::from).boxed()
    }
}
