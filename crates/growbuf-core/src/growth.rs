//! Capacity growth policy.
//!
//! When `additional` more slots are needed than the buffer has, the new
//! capacity is `max(capacity * GROWTH_FACTOR, len + additional)`. Doubling
//! keeps repeated single-element pushes amortized O(1); the exact-fit term
//! guarantees the requested headroom for bulk appends.

use crate::error::BufferError;

/// Multiplier applied to the current capacity on growth.
pub const GROWTH_FACTOR: usize = 2;

/// Whether a buffer with `len` live elements and `capacity` slots must grow
/// to fit `additional` more elements.
///
/// Returns `true` when `len + additional` overflows, so the caller reaches
/// [`next_capacity`] and gets a [`BufferError::CapacityOverflow`].
pub fn needs_growth(len: usize, capacity: usize, additional: usize) -> bool {
    len.checked_add(additional)
        .is_none_or(|required| required > capacity)
}

/// Capacity to grow to so that `additional` more elements fit.
///
/// # Errors
///
/// Returns [`BufferError::CapacityOverflow`] if `len + additional` does
/// not fit in `usize`.
pub fn next_capacity(len: usize, capacity: usize, additional: usize) -> Result<usize, BufferError> {
    let required = len
        .checked_add(additional)
        .ok_or(BufferError::CapacityOverflow)?;
    // Saturate so the exact-fit term still applies near usize::MAX.
    let doubled = capacity.saturating_mul(GROWTH_FACTOR);
    Ok(doubled.max(required))
}
