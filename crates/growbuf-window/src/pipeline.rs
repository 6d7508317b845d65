//! End-to-end counting: read, count, report.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::WindowConfig;
use crate::count::count_increases;
use crate::error::WindowError;
use crate::input::read_values;

/// Read integers from `input`, count increasing windows, and write the
/// count followed by a newline to `output`.
///
/// Returns the count. The buffer holding the values is freed before the
/// result is written.
///
/// # Errors
///
/// Returns [`WindowError::Config`] if `config` is invalid (nothing is read),
/// [`WindowError::Input`] for read or parse failures (nothing is written),
/// and [`WindowError::Output`] if writing fails.
pub fn run<R: BufRead, W: Write>(
    config: &WindowConfig,
    input: R,
    mut output: W,
) -> Result<usize, WindowError> {
    config.validate()?;
    let values = read_values(input)?;
    let count = count_increases(&values, config);
    debug!(
        values = values.len(),
        width = config.width,
        count,
        "counted increasing windows"
    );
    values.free();

    writeln!(output, "{count}").map_err(WindowError::Output)?;
    output.flush().map_err(WindowError::Output)?;
    Ok(count)
}
