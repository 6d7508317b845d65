//! Contiguous growable buffer with explicit capacity control.
//!
//! [`GrowableBuffer<T>`] is an owning, contiguous, type-generic dynamic
//! array. It offers amortized O(1) append, explicit capacity control,
//! mid-buffer insertion and removal by bulk shifting, and an API that
//! degrades gracefully when the buffer has never allocated.
//!
//! # Architecture
//!
//! ```text
//! GrowableBuffer<T> (policy: bounds rejection, growth, logging)
//! └── RawBuf<T> (all unsafe code: allocation, shifting, drops)
//!     └── one global-allocator block of `capacity` slots, or none
//! ```
//!
//! # The empty-marker
//!
//! A buffer created with [`GrowableBuffer::new`] (or shrunk or resized to
//! zero capacity) holds no allocation at all. Every query on it is
//! well-defined: `len() == capacity() == 0`, [`GrowableBuffer::end`]
//! returns a null pointer, and index-taking operations are rejected.
//!
//! # Failure tiers
//!
//! - **Fatal:** allocation failure in the default APIs logs a diagnostic
//!   and aborts through [`std::alloc::handle_alloc_error`]. The `try_*`
//!   variants return [`BufferError::AllocationFailed`] instead.
//! - **Caller error:** out-of-range `insert`/`remove`/`erase` requests are
//!   no-ops that return [`BufferError::IndexOutOfBounds`] or
//!   [`BufferError::RangeOutOfBounds`].
//!
//! # Safety
//!
//! All `unsafe` code is confined to the private `raw` module, where each
//! block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod growth;
pub mod iter;
mod macros;
mod raw;

// Public re-exports for the primary API surface.
pub use buffer::GrowableBuffer;
pub use error::{BufferError, Rejected};
pub use iter::IntoIter;
