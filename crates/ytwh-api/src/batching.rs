//! Fixed-size ID grouping for the batch-lookup endpoints.
//!
//! The `videos` and `channels` lookups accept at most 50 comma-joined IDs per
//! call. Groups are consecutive and order-preserving, so concatenating them
//! reconstructs the input.

use std::slice::Chunks;

/// Splits `ids` into consecutive groups of at most `cap` elements.
///
/// A `cap` of zero is treated as one.
#[must_use]
pub fn batches<T>(ids: &[T], cap: usize) -> Chunks<'_, T> {
    ids.chunks(cap.max(1))
}

/// Number of groups [`batches`] yields for `len` IDs: `ceil(len / cap)`.
#[must_use]
pub fn batch_count(len: usize, cap: usize) -> usize {
    len.div_ceil(cap.max(1))
}
