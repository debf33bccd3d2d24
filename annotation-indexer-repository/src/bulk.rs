//! Chunked streaming bulk writes.
//!
//! `streaming_bulk` turns a lazy stream of items into bulk requests of a fixed
//! size and yields one result per item as the responses come back. Items are
//! expanded into `BulkAction`s by a caller-supplied callback, so the caller
//! decides how each item is rendered while this module handles chunking.

use annotation_indexer_shared::{BulkAction, BulkItemResult};
use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryChunksError, TryStreamExt};
use tracing::debug;

use crate::config::BulkOptions;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;

/// Stream `items` into the backend in chunks and yield per-item results.
///
/// The returned stream is lazy: nothing is read from `items` and no request is
/// sent until it is polled. At most one chunk of expanded actions is held in
/// memory at a time.
///
/// # Arguments
///
/// * `provider` - Backend to send bulk requests to
/// * `items` - Source items; an `Err` item ends the stream with that error
/// * `expand` - Renders one item into its bulk action; an `Err` ends the stream
/// * `options` - Chunk size and per-item error handling
///
/// # Returns
///
/// A stream of `BulkItemResult`s. A failed bulk request ends the stream with
/// the provider's error. Failed items are yielded as unsuccessful results,
/// unless `options.raise_on_error` is set, in which case the first one ends
/// the stream with `SearchIndexError::BulkIndexError`.
pub fn streaming_bulk<'a, T, E, S, F>(
    provider: &'a dyn SearchIndexProvider,
    items: S,
    mut expand: F,
    options: BulkOptions,
) -> BoxStream<'a, Result<BulkItemResult, E>>
where
    T: Send + 'a,
    E: From<SearchIndexError> + Send + 'a,
    S: Stream<Item = Result<T, E>> + Send + 'a,
    F: FnMut(T) -> Result<BulkAction, E> + Send + 'a,
{
    let chunk_size = options.chunk_size.max(1);
    let raise_on_error = options.raise_on_error;

    items
        .map(move |item| item.and_then(&mut expand))
        .try_chunks(chunk_size)
        .map_err(|TryChunksError(_, err)| err)
        .and_then(move |chunk| async move {
            debug!(count = chunk.len(), "Sending bulk chunk");
            provider
                .bulk(&chunk)
                .await
                .map(|results| stream::iter(results.into_iter().map(Ok::<BulkItemResult, E>)))
                .map_err(E::from)
        })
        .try_flatten()
        .and_then(move |result| {
            let outcome = if raise_on_error && !result.success {
                let reason = result
                    .error
                    .as_ref()
                    .map(|e| e.reason.clone())
                    .unwrap_or_default();
                Err(E::from(SearchIndexError::bulk_index(format!(
                    "Bulk {} of document {} failed: {}",
                    result.op_type, result.id, reason
                ))))
            } else {
                Ok(result)
            };
            future::ready(outcome)
        })
        .boxed()
}
