//! Configuration types for bulk writes.

/// Default number of actions sent per bulk request.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Options for `streaming_bulk`.
///
/// Use this to control how many actions go into one bulk request and whether
/// a per-item failure should abort the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    /// Number of actions per bulk request. Values below 1 are treated as 1.
    pub chunk_size: usize,
    /// Turn the first failed item into a stream error instead of yielding it.
    pub raise_on_error: bool,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            raise_on_error: true,
        }
    }
}

impl BulkOptions {
    /// Options that yield per-item failures instead of raising them.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Number of actions per bulk request
    pub fn collect_errors(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            raise_on_error: false,
        }
    }
}
