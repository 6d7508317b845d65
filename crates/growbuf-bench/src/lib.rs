//! Benchmark workloads for growbuf.
//!
//! Provides deterministic inputs shared by the Criterion benches:
//!
//! - [`reference_values`]: pseudo-random walk of `n` integers
//! - [`reference_input`]: the same walk rendered one value per line
//! - [`prefilled`]: a buffer built by single pushes, as a caller would

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use growbuf_core::GrowableBuffer;

/// Element count for the reference profile.
pub const REFERENCE_LEN: usize = 10_000;

/// Element count for the stress profile (10x reference).
pub const STRESS_LEN: usize = 100_000;

/// Generate a deterministic random walk of `n` values.
///
/// Uses an LCG step from `seed` so identical seeds give identical inputs.
pub fn reference_values(n: usize, seed: u64) -> Vec<i64> {
    let mut state = seed;
    let mut value = 100i64;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        value += ((state >> 33) % 21) as i64 - 10;
        out.push(value);
    }
    out
}

/// Render [`reference_values`] as a newline-separated input stream.
pub fn reference_input(n: usize, seed: u64) -> String {
    reference_values(n, seed)
        .iter()
        .map(|v| format!("{v}\n"))
        .collect()
}

/// Build a buffer of `0..n` through repeated `push`.
pub fn prefilled(n: usize) -> GrowableBuffer<u64> {
    let mut buf = GrowableBuffer::new();
    for i in 0..n as u64 {
        buf.push(i);
    }
    buf
}
