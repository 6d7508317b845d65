//! Buffer error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during buffer operations.
///
/// Split into two tiers. [`AllocationFailed`](Self::AllocationFailed) and
/// [`CapacityOverflow`](Self::CapacityOverflow) are fatal: the default
/// APIs abort on them and only the `try_*` variants surface them. The
/// bounds variants are caller errors: the operation was a no-op and the
/// buffer is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The global allocator could not provide the requested block.
    AllocationFailed {
        /// Size of the block that was requested, in bytes.
        bytes: usize,
    },
    /// The requested capacity does not fit in `isize::MAX` bytes.
    CapacityOverflow,
    /// An element index was not strictly below the live element count.
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Live element count at the time of the call.
        len: usize,
    },
    /// A range `[index, index + count)` extended past the live elements.
    RangeOutOfBounds {
        /// Start of the rejected range.
        index: usize,
        /// Number of elements in the rejected range.
        count: usize,
        /// Live element count at the time of the call.
        len: usize,
    },
}

impl BufferError {
    /// Whether this error belongs to the unrecoverable allocation tier.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. } | Self::CapacityOverflow)
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { bytes } => {
                write!(f, "allocation failed: requested {bytes} bytes")
            }
            Self::CapacityOverflow => write!(f, "capacity overflow"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::RangeOutOfBounds { index, count, len } => {
                write!(
                    f,
                    "range of {count} elements at index {index} out of bounds for length {len}"
                )
            }
        }
    }
}

impl Error for BufferError {}

/// A value that could not be placed into a buffer, returned to the caller.
///
/// Produced by [`GrowableBuffer::try_insert`](crate::GrowableBuffer::try_insert)
/// and [`GrowableBuffer::try_push`](crate::GrowableBuffer::try_push) so
/// that a rejected value is not silently dropped.
pub struct Rejected<T> {
    /// The value that was not stored.
    pub value: T,
    /// Why it was rejected.
    pub error: BufferError,
}

impl<T> Rejected<T> {
    /// Recover the rejected value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Discard the value and keep only the error.
    pub fn into_error(self) -> BufferError {
        self.error
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value rejected: {}", self.error)
    }
}

impl<T> Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
