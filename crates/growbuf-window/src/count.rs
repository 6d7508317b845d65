//! Sliding-window counting.

use crate::config::WindowConfig;

/// Count the windows `values[i..i + width]` whose last value is strictly
/// greater than their first.
///
/// Fewer than `width` values means no windows and a count of zero. A zero
/// width also yields zero; [`WindowConfig::validate`] rejects it upstream.
pub fn count_increases(values: &[i64], config: &WindowConfig) -> usize {
    if config.width == 0 {
        return 0;
    }
    values
        .windows(config.width)
        .filter(|window| window[window.len() - 1] > window[0])
        .count()
}
