//! Sliding-window increase counter built on `growbuf-core`.
//!
//! Reads integers from a line-oriented stream into a
//! [`GrowableBuffer`](growbuf_core::GrowableBuffer), then counts the
//! fixed-width windows whose last value is strictly greater than their
//! first.
//!
//! ```
//! use growbuf_window::{run, WindowConfig};
//!
//! let mut out = Vec::new();
//! let count = run(&WindowConfig::default(), "1\n2\n3\n4\n5\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(count, 2);
//! assert_eq!(out, b"2\n");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod count;
pub mod error;
pub mod input;
pub mod pipeline;

pub use config::WindowConfig;
pub use count::count_increases;
pub use error::{ConfigError, InputError, WindowError};
pub use input::read_values;
pub use pipeline::run;
