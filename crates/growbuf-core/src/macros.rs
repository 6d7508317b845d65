//! Construction macros.

/// Create a [`GrowableBuffer`](crate::GrowableBuffer) holding the given
/// elements, with capacity equal to their count.
///
/// ```
/// use growbuf_core::buffer;
///
/// let empty: growbuf_core::GrowableBuffer<u8> = buffer![];
/// assert!(empty.is_unallocated());
///
/// let listed = buffer![1, 2, 3];
/// assert_eq!(listed.capacity(), 3);
///
/// let repeated = buffer!["x"; 4];
/// assert_eq!(repeated.len(), 4);
/// ```
#[macro_export]
macro_rules! buffer {
    () => {
        $crate::GrowableBuffer::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::GrowableBuffer::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::GrowableBuffer::from([$($x),+])
    };
}
