//! Reading integer values from a line-oriented stream.

use std::io::BufRead;

use growbuf_core::GrowableBuffer;
use tracing::debug;

use crate::error::InputError;

/// Read every integer in `reader` into a fresh buffer.
///
/// Each line may hold any number of whitespace-separated integers; blank
/// lines are skipped. The buffer starts as the empty-marker and grows by
/// push.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the reader fails, or
/// [`InputError::Parse`] for the first token that is not an `i64`.
pub fn read_values<R: BufRead>(reader: R) -> Result<GrowableBuffer<i64>, InputError> {
    let mut values = GrowableBuffer::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let value = token.parse::<i64>().map_err(|_| InputError::Parse {
                line: index + 1,
                token: token.to_owned(),
            })?;
            values.push(value);
        }
    }
    debug!(
        count = values.len(),
        capacity = values.capacity(),
        "read input values"
    );
    Ok(values)
}
