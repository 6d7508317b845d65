//! The growable buffer itself.
//!
//! [`GrowableBuffer`] layers policy on top of the private raw storage:
//! bounds rejection for index-taking operations, the growth policy from
//! [`crate::growth`], and the fatal allocation-failure path.

use std::alloc::{self, Layout};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut};

use tracing::{error, trace};

use crate::error::{BufferError, Rejected};
use crate::growth;
use crate::iter::IntoIter;
use crate::raw::RawBuf;

/// An owning, contiguous, growable array of `T`.
///
/// A freshly created buffer holds no allocation (the empty-marker). Storage
/// is allocated on first growth and is a single block of `capacity()`
/// slots, the first `len()` of which are live. The buffer dereferences to
/// `[T]`, so indexing, slicing and slice iteration work as on a plain array.
///
/// ```
/// use growbuf_core::GrowableBuffer;
///
/// let mut buf = GrowableBuffer::new();
/// buf.push(1);
/// buf.push(3);
/// buf.insert(1, 2).unwrap();
/// assert_eq!(buf.as_slice(), &[1, 2, 3]);
/// assert!(buf.remove(3).is_err());
/// ```
pub struct GrowableBuffer<T> {
    raw: RawBuf<T>,
}

impl<T> GrowableBuffer<T> {
    /// Create an empty buffer without allocating.
    pub const fn new() -> Self {
        Self { raw: RawBuf::new() }
    }

    /// Create an empty buffer with room for exactly `capacity` elements.
    ///
    /// A capacity of zero yields the empty-marker.
    ///
    /// # Aborts
    ///
    /// Aborts the process if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|err| alloc_failure::<T>(err))
    }

    /// Fallible form of [`with_capacity`](Self::with_capacity).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] or
    /// [`BufferError::AllocationFailed`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let mut buf = Self::new();
        buf.try_resize(capacity)?;
        Ok(buf)
    }

    /// Build a buffer holding `n` clones of `elem`.
    pub fn from_elem(elem: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut buf = Self::with_capacity(n);
        if n > 0 {
            for _ in 1..n {
                buf.raw.push_within_capacity(elem.clone());
            }
            buf.raw.push_within_capacity(elem);
        }
        buf
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Number of elements the storage holds before it must reallocate.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this buffer is the empty-marker: no storage at all.
    ///
    /// A cleared buffer is empty but still allocated.
    pub fn is_unallocated(&self) -> bool {
        self.capacity() == 0
    }

    /// Grow the capacity to exactly `capacity` if it is currently smaller.
    ///
    /// Unlike `Vec::reserve`, the argument is a target capacity, not a
    /// number of additional elements.
    ///
    /// # Aborts
    ///
    /// Aborts the process if the allocation fails.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            alloc_failure::<T>(err);
        }
    }

    /// Fallible form of [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] or
    /// [`BufferError::AllocationFailed`]; the buffer is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), BufferError> {
        if capacity > self.capacity() {
            self.try_resize(capacity)?;
        }
        Ok(())
    }

    /// Reduce the capacity to the live element count.
    ///
    /// No-op on the empty-marker. An allocated buffer with no live elements
    /// releases its storage and becomes the empty-marker.
    pub fn shrink_to_fit(&mut self) {
        if self.is_unallocated() {
            return;
        }
        self.resize(self.len());
    }

    /// Reallocate the storage to hold exactly `capacity` elements.
    ///
    /// If `capacity < len()`, the elements past it are dropped and the
    /// length is truncated. Resizing to zero releases the storage.
    ///
    /// # Aborts
    ///
    /// Aborts the process if the allocation fails.
    pub fn resize(&mut self, capacity: usize) {
        if let Err(err) = self.try_resize(capacity) {
            alloc_failure::<T>(err);
        }
    }

    /// Fallible form of [`resize`](Self::resize).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityOverflow`] or
    /// [`BufferError::AllocationFailed`]. The existing storage is kept;
    /// a shrinking request has already dropped the truncated elements.
    pub fn try_resize(&mut self, capacity: usize) -> Result<(), BufferError> {
        let old_capacity = self.capacity();
        self.raw.reallocate(capacity)?;
        if old_capacity != capacity {
            trace!(
                old_capacity,
                new_capacity = capacity,
                len = self.len(),
                "reallocated buffer storage"
            );
        }
        Ok(())
    }

    /// Make sure `additional` more elements fit, growing per the policy in
    /// [`crate::growth`].
    fn try_grow_for(&mut self, additional: usize) -> Result<(), BufferError> {
        if !growth::needs_growth(self.len(), self.capacity(), additional) {
            return Ok(());
        }
        let capacity = growth::next_capacity(self.len(), self.capacity(), additional)?;
        self.try_resize(capacity)
    }

    fn grow_for(&mut self, additional: usize) {
        if let Err(err) = self.try_grow_for(additional) {
            alloc_failure::<T>(err);
        }
    }

    /// The last live element, or `None` if the buffer is empty.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Mutable access to the last live element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Pointer one past the last live element.
    ///
    /// Together with [`as_ptr`](Self::as_ptr) this bounds the live range.
    /// Returns a null pointer for the empty-marker.
    pub fn end(&self) -> *const T {
        self.raw.end_ptr()
    }

    /// Append `value`, growing the storage if needed.
    ///
    /// # Aborts
    ///
    /// Aborts the process if the allocation fails.
    pub fn push(&mut self, value: T) {
        self.grow_for(1);
        self.raw.push_within_capacity(value);
    }

    /// Fallible form of [`push`](Self::push). The value is handed back if
    /// the storage could not grow.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] holding the value and the allocation error.
    pub fn try_push(&mut self, value: T) -> Result<(), Rejected<T>> {
        if let Err(error) = self.try_grow_for(1) {
            return Err(Rejected { value, error });
        }
        self.raw.push_within_capacity(value);
        Ok(())
    }

    /// Append an element produced by `init`, writing it straight into the
    /// new slot, and return a reference to it.
    ///
    /// Storage is grown before `init` runs.
    pub fn emplace(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.grow_for(1);
        self.raw.push_within_capacity(init())
    }

    /// Remove and return the last element, or `None` if the buffer is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.raw.pop()
    }

    fn check_index(&self, index: usize) -> Result<(), BufferError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }

    /// Insert `value` at `index`, shifting `[index, len)` right by one.
    ///
    /// `index` must be strictly below `len()`; appending goes through
    /// [`push`](Self::push). A rejected value is dropped; use
    /// [`try_insert`](Self::try_insert) to get it back.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IndexOutOfBounds`] if `index >= len()`,
    /// including any index on the empty-marker. The buffer is unchanged.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), BufferError> {
        self.try_insert(index, value).map_err(Rejected::into_error)
    }

    /// Like [`insert`](Self::insert), but hands a rejected value back.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] with [`BufferError::IndexOutOfBounds`].
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), Rejected<T>> {
        if let Err(error) = self.check_index(index) {
            return Err(Rejected { value, error });
        }
        self.grow_for(1);
        self.raw.insert_within_capacity(index, value);
        Ok(())
    }

    /// Insert an element produced by `init` at `index`.
    ///
    /// `init` only runs once the index has been accepted.
    ///
    /// # Errors
    ///
    /// Same bounds policy as [`insert`](Self::insert).
    pub fn emplace_at(
        &mut self,
        index: usize,
        init: impl FnOnce() -> T,
    ) -> Result<&mut T, BufferError> {
        self.check_index(index)?;
        self.grow_for(1);
        Ok(self.raw.insert_within_capacity(index, init()))
    }

    /// Remove and return the element at `index`, shifting the tail left.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IndexOutOfBounds`] if `index >= len()`. The
    /// buffer is unchanged.
    pub fn remove(&mut self, index: usize) -> Result<T, BufferError> {
        self.check_index(index)?;
        Ok(self.raw.remove(index))
    }

    /// Drop `count` elements starting at `index`, shifting the tail left.
    ///
    /// A zero `count` at a valid index is an accepted no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::RangeOutOfBounds`] unless `index < len()` and
    /// `index + count <= len()`. The sum is computed without wraparound,
    /// so a `count` larger than the buffer is rejected too. The buffer is
    /// unchanged.
    pub fn erase(&mut self, index: usize, count: usize) -> Result<(), BufferError> {
        let len = self.len();
        let in_bounds = index < len && index.checked_add(count).is_some_and(|end| end <= len);
        if !in_bounds {
            return Err(BufferError::RangeOutOfBounds { index, count, len });
        }
        self.raw.erase(index, count);
        Ok(())
    }

    /// Drop every live element. Capacity and storage are retained.
    pub fn clear(&mut self) {
        self.raw.truncate(0);
    }

    /// Drop every element past the first `len`. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        self.raw.truncate(len);
    }

    /// Release the storage and every live element.
    ///
    /// Equivalent to dropping the buffer; a no-op on the empty-marker.
    pub fn free(self) {
        drop(self);
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.raw.as_slice()
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.raw.as_mut_slice()
    }

    /// Pointer to the first element. Dangling (but non-null and aligned)
    /// for the empty-marker.
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr()
    }

    /// Mutable pointer to the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.raw.as_mut_ptr()
    }

    /// Append clones of every element in `other`, growing once up front.
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        self.grow_for(other.len());
        for item in other {
            self.raw.push_within_capacity(item.clone());
        }
    }

    /// Memory held by the storage block, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.capacity() * mem::size_of::<T>()
    }
}

/// Single sink for the fatal allocation tier: log, then abort.
#[cold]
fn alloc_failure<T>(err: BufferError) -> ! {
    error!(%err, element_size = mem::size_of::<T>(), "growable buffer allocation failed");
    match err {
        BufferError::AllocationFailed { bytes } => {
            match Layout::from_size_align(bytes, mem::align_of::<T>()) {
                Ok(layout) => alloc::handle_alloc_error(layout),
                Err(_) => panic!("growable buffer: {err}"),
            }
        }
        _ => panic!("growable buffer: {err}"),
    }
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowableBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowableBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for GrowableBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for GrowableBuffer<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for GrowableBuffer<T> {
    fn clone(&self) -> Self {
        let mut buf = Self::with_capacity(self.len());
        buf.extend_from_slice(self.as_slice());
        buf
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowableBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowableBuffer<T> {}

impl<T: PartialEq> PartialEq<[T]> for GrowableBuffer<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for GrowableBuffer<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for GrowableBuffer<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for GrowableBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> Extend<T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for GrowableBuffer<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for GrowableBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T> From<Vec<T>> for GrowableBuffer<T> {
    fn from(items: Vec<T>) -> Self {
        let mut buf = Self::with_capacity(items.len());
        buf.extend(items);
        buf
    }
}

impl<T: Clone> From<&[T]> for GrowableBuffer<T> {
    fn from(items: &[T]) -> Self {
        let mut buf = Self::with_capacity(items.len());
        buf.extend_from_slice(items);
        buf
    }
}

impl<T, const N: usize> From<[T; N]> for GrowableBuffer<T> {
    fn from(items: [T; N]) -> Self {
        let mut buf = Self::with_capacity(N);
        buf.extend(items);
        buf
    }
}

impl<T> IntoIterator for GrowableBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.raw.into_iter())
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growbuf_test_utils::DropLedger;

    /// Built by single pushes so capacities follow the doubling policy.
    fn filled(n: u32) -> GrowableBuffer<u32> {
        let mut buf = GrowableBuffer::new();
        for i in 0..n {
            buf.push(i);
        }
        buf
    }

    #[test]
    fn new_buffer_is_the_empty_marker() {
        let buf = GrowableBuffer::<u32>::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
        assert!(buf.is_unallocated());
        assert!(buf.end().is_null());
        assert_eq!(buf.back(), None);
    }

    #[test]
    fn with_capacity_allocates_without_live_elements() {
        let buf = GrowableBuffer::<u64>::with_capacity(16);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.len(), 0);
        assert!(!buf.is_unallocated());
        assert_eq!(buf.memory_bytes(), 16 * 8);
        assert_eq!(buf.end(), buf.as_ptr());
    }

    #[test]
    fn with_zero_capacity_is_unallocated() {
        assert!(GrowableBuffer::<u8>::with_capacity(0).is_unallocated());
    }

    #[test]
    fn push_follows_doubling_policy() {
        let mut buf = GrowableBuffer::new();
        let mut seen = Vec::new();
        for i in 0..9u8 {
            buf.push(i);
            seen.push(buf.capacity());
        }
        assert_eq!(seen, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn push_then_pop_round_trips() {
        let mut buf = filled(3);
        buf.push(99);
        assert_eq!(buf.pop(), Some(99));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.back(), Some(&2));
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut buf = GrowableBuffer::<u8>::new();
        assert_eq!(buf.pop(), None);
        assert!(buf.is_unallocated());
    }

    #[test]
    fn insert_shifts_tail_right() {
        let mut buf = filled(4);
        buf.insert(1, 10).unwrap();
        assert_eq!(buf, [0, 10, 1, 2, 3]);
        buf.insert(0, 20).unwrap();
        assert_eq!(buf, [20, 0, 10, 1, 2, 3]);
    }

    #[test]
    fn insert_rejects_len_and_beyond() {
        let mut buf = filled(3);
        let cap = buf.capacity();
        assert_eq!(
            buf.insert(3, 7),
            Err(BufferError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert!(buf.insert(4, 7).is_err());
        assert_eq!(buf, [0, 1, 2]);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn insert_on_empty_marker_is_rejected_without_allocating() {
        let mut buf = GrowableBuffer::new();
        assert!(buf.insert(0, 1u8).is_err());
        assert!(buf.is_unallocated());
    }

    #[test]
    fn try_insert_hands_back_rejected_value() {
        let mut buf = GrowableBuffer::<String>::new();
        let rejected = buf.try_insert(0, "kept".to_owned()).unwrap_err();
        assert_eq!(rejected.value, "kept");
        assert!(!rejected.error.is_fatal());
    }

    #[test]
    fn insert_at_full_capacity_grows() {
        let mut buf = GrowableBuffer::with_capacity(2);
        buf.push(1);
        buf.push(3);
        buf.insert(1, 2).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn remove_shifts_tail_left() {
        let mut buf = filled(5);
        assert_eq!(buf.remove(1), Ok(1));
        assert_eq!(buf, [0, 2, 3, 4]);
        assert_eq!(buf.remove(3), Ok(4));
        assert_eq!(buf, [0, 2, 3]);
    }

    #[test]
    fn remove_out_of_bounds_is_noop() {
        let mut buf = filled(2);
        assert_eq!(
            buf.remove(2),
            Err(BufferError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(buf, [0, 1]);
        assert!(GrowableBuffer::<u8>::new().remove(0).is_err());
    }

    #[test]
    fn erase_closes_gap() {
        let mut buf = filled(8);
        buf.erase(2, 3).unwrap();
        assert_eq!(buf, [0, 1, 5, 6, 7]);
        buf.erase(3, 2).unwrap();
        assert_eq!(buf, [0, 1, 5]);
    }

    #[test]
    fn erase_rejects_overlong_ranges() {
        let mut buf = filled(4);
        let err = BufferError::RangeOutOfBounds {
            index: 2,
            count: 3,
            len: 4,
        };
        assert_eq!(buf.erase(2, 3), Err(err));
        // count alone exceeds len: must not wrap around.
        assert!(buf.erase(0, 5).is_err());
        assert!(buf.erase(1, usize::MAX).is_err());
        assert!(buf.erase(4, 0).is_err());
        assert_eq!(buf, [0, 1, 2, 3]);
        assert!(GrowableBuffer::<u8>::new().erase(0, 0).is_err());
    }

    #[test]
    fn erase_zero_count_is_accepted_noop() {
        let mut buf = filled(3);
        buf.erase(1, 0).unwrap();
        assert_eq!(buf, [0, 1, 2]);
    }

    #[test]
    fn erase_whole_buffer() {
        let mut buf = filled(3);
        buf.erase(0, 3).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn clear_keeps_storage() {
        let ledger = DropLedger::new();
        let mut buf: GrowableBuffer<_> = (0..5).map(|i| ledger.track(i)).collect();
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn clear_on_empty_marker_is_noop() {
        let mut buf = GrowableBuffer::<u8>::new();
        buf.clear();
        assert!(buf.is_unallocated());
    }

    #[test]
    fn resize_smaller_truncates_and_drops() {
        let ledger = DropLedger::new();
        let mut buf: GrowableBuffer<_> = (0..6).map(|i| ledger.track(i)).collect();
        buf.resize(2);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(ledger.live(), 2);
        let ids: Vec<u64> = buf.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn resize_larger_keeps_elements() {
        let mut buf = filled(3);
        buf.resize(100);
        assert_eq!(buf.capacity(), 100);
        assert_eq!(buf, [0, 1, 2]);
    }

    #[test]
    fn resize_to_zero_returns_to_empty_marker() {
        let mut buf = filled(3);
        buf.resize(0);
        assert!(buf.is_unallocated());
        assert!(buf.is_empty());
    }

    #[test]
    fn reserve_only_grows() {
        let mut buf = GrowableBuffer::<u16>::with_capacity(8);
        buf.reserve(4);
        assert_eq!(buf.capacity(), 8);
        buf.reserve(20);
        assert_eq!(buf.capacity(), 20);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_overflow_is_fatal() {
        GrowableBuffer::<u64>::new().reserve(usize::MAX);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn with_capacity_overflow_is_fatal() {
        let _ = GrowableBuffer::<u64>::with_capacity(usize::MAX);
    }

    #[test]
    fn truncate_drops_tail_and_keeps_capacity() {
        let ledger = DropLedger::new();
        let mut buf: GrowableBuffer<_> = (0..6).map(|i| ledger.track(i)).collect();
        let cap = buf.capacity();
        buf.truncate(2);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.capacity(), cap);
        assert_eq!(ledger.live(), 2);
        buf.truncate(10);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn back_mut_edits_last_element() {
        let mut buf = filled(3);
        *buf.back_mut().unwrap() = 9;
        assert_eq!(buf, [0, 1, 9]);
        assert_eq!(GrowableBuffer::<u8>::new().back_mut(), None);
    }

    #[test]
    fn as_mut_ptr_writes_through_to_elements() {
        let mut buf = filled(2);
        let ptr = buf.as_mut_ptr();
        assert_eq!(ptr.cast_const(), buf.as_ptr());
        buf.as_mut_slice()[1] = 5;
        assert_eq!(buf, [0, 5]);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut buf = GrowableBuffer::<u64>::new();
        let err = buf.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(err, BufferError::CapacityOverflow);
        assert!(err.is_fatal());
        assert!(buf.is_unallocated());
    }

    #[test]
    fn try_push_grows_like_push() {
        let mut buf = GrowableBuffer::<u64>::new();
        for i in 0..3 {
            buf.try_push(i).unwrap();
        }
        assert_eq!(buf, [0, 1, 2]);
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn shrink_to_fit_matches_len() {
        let mut buf = filled(5);
        assert_eq!(buf.capacity(), 8);
        buf.shrink_to_fit();
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn shrink_to_fit_on_cleared_buffer_releases_storage() {
        let mut buf = filled(5);
        buf.clear();
        buf.shrink_to_fit();
        assert!(buf.is_unallocated());

        let mut empty = GrowableBuffer::<u8>::new();
        empty.shrink_to_fit();
        assert!(empty.is_unallocated());
    }

    #[test]
    fn end_bounds_the_live_range() {
        let buf = filled(4);
        let span = buf.end() as usize - buf.as_ptr() as usize;
        assert_eq!(span, 4 * mem::size_of::<u32>());
    }

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn emplace_constructs_in_new_slot() {
        let mut buf = GrowableBuffer::new();
        let p = buf.emplace(|| Point { x: 1, y: 2 });
        p.y = 3;
        assert_eq!(buf.back(), Some(&Point { x: 1, y: 3 }));
    }

    #[test]
    fn emplace_at_runs_init_only_when_accepted() {
        let mut buf = GrowableBuffer::new();
        let mut calls = 0;
        let rejected = buf.emplace_at(0, || {
            calls += 1;
            Point { x: 0, y: 0 }
        });
        assert!(rejected.is_err());
        assert_eq!(calls, 0);

        buf.push(Point { x: 9, y: 9 });
        buf.emplace_at(0, || Point { x: 1, y: 1 }).unwrap();
        assert_eq!(buf[0], Point { x: 1, y: 1 });
        assert_eq!(buf[1], Point { x: 9, y: 9 });
    }

    #[test]
    fn free_releases_all_elements() {
        let ledger = DropLedger::new();
        let buf: GrowableBuffer<_> = (0..4).map(|i| ledger.track(i)).collect();
        buf.free();
        assert_eq!(ledger.live(), 0);
        GrowableBuffer::<u8>::new().free();
    }

    #[test]
    fn remove_hands_ownership_out() {
        let ledger = DropLedger::new();
        let mut buf: GrowableBuffer<_> = (0..3).map(|i| ledger.track(i)).collect();
        let removed = buf.remove(0).unwrap();
        assert_eq!(removed.id(), 0);
        assert_eq!(ledger.live(), 3);
        drop(removed);
        assert_eq!(ledger.live(), 2);
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let original = filled(3);
        let mut copy = original.clone();
        copy[0] = 42;
        assert_eq!(original, [0, 1, 2]);
        assert_eq!(copy, [42, 1, 2]);
        assert_ne!(original.as_ptr(), copy.as_ptr());
    }

    #[test]
    fn extend_from_slice_grows_once() {
        let mut buf = filled(2);
        buf.extend_from_slice(&[7, 8, 9, 10, 11]);
        assert_eq!(buf, [0, 1, 7, 8, 9, 10, 11]);
        assert_eq!(buf.capacity(), 7);
    }

    #[test]
    fn debug_prints_live_elements_only() {
        let mut buf = GrowableBuffer::with_capacity(10);
        buf.push(1);
        buf.push(2);
        assert_eq!(format!("{buf:?}"), "[1, 2]");
    }

    #[test]
    fn zero_sized_elements() {
        let mut buf = GrowableBuffer::new();
        for _ in 0..10 {
            buf.push(());
        }
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.memory_bytes(), 0);
        assert_eq!(buf.remove(3), Ok(()));
        buf.erase(0, 4).unwrap();
        assert_eq!(buf.len(), 5);
    }

    mod proptests {
        use super::*;
        use growbuf_test_utils::{ops, Op, ReferenceModel};
        use proptest::prelude::*;

        fn apply(buf: &mut GrowableBuffer<i32>, op: &Op) -> bool {
            match *op {
                Op::Push(v) => {
                    buf.push(v);
                    true
                }
                Op::Pop => buf.pop().is_some(),
                Op::Insert(i, v) => buf.insert(i, v).is_ok(),
                Op::Remove(i) => buf.remove(i).is_ok(),
                Op::Erase(i, n) => buf.erase(i, n).is_ok(),
                Op::Reserve(n) => {
                    buf.reserve(n);
                    true
                }
                Op::Resize(n) => {
                    buf.resize(n);
                    true
                }
                Op::ShrinkToFit => {
                    buf.shrink_to_fit();
                    true
                }
                Op::Clear => {
                    buf.clear();
                    true
                }
            }
        }

        proptest! {
            #[test]
            fn matches_reference_model(script in ops(64)) {
                let mut buf = GrowableBuffer::new();
                let mut model = ReferenceModel::new();
                for op in &script {
                    let accepted = apply(&mut buf, op);
                    let expected = model.apply(op);
                    prop_assert_eq!(accepted, expected, "op {:?}", op);
                    prop_assert!(buf.len() <= buf.capacity());
                    prop_assert_eq!(buf.as_slice(), model.as_slice());
                    if buf.capacity() == 0 {
                        prop_assert!(buf.end().is_null());
                    }
                }
            }

            #[test]
            fn insert_then_remove_is_identity(
                items in proptest::collection::vec(any::<i32>(), 1..40),
                pick in any::<prop::sample::Index>(),
                value in any::<i32>(),
            ) {
                let mut buf: GrowableBuffer<i32> = items.iter().copied().collect();
                let index = pick.index(items.len());
                buf.insert(index, value).unwrap();
                prop_assert_eq!(buf.remove(index), Ok(value));
                prop_assert_eq!(buf, items);
            }

            #[test]
            fn truncating_resize_keeps_prefix(
                items in proptest::collection::vec(any::<i32>(), 1..40),
                pick in any::<prop::sample::Index>(),
            ) {
                let mut buf: GrowableBuffer<i32> = items.iter().copied().collect();
                let k = pick.index(items.len());
                buf.resize(k);
                prop_assert_eq!(buf.len(), k);
                prop_assert_eq!(buf.as_slice(), &items[..k]);
            }
        }
    }
}
