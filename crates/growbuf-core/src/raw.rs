//! Low-level storage primitives for [`GrowableBuffer`](crate::GrowableBuffer).
//!
//! Every `unsafe` block in the crate lives here, each with a mandatory
//! `// SAFETY:` comment. The methods check their own preconditions with
//! `assert!`, so callers in `buffer.rs` only decide policy.
//!
//! Invariants maintained by [`RawBuf`]:
//! - `len <= cap`.
//! - Slots `[0, len)` are initialised, slots `[len, cap)` are not.
//! - `cap == 0` means no allocation and a dangling `ptr`.
//! - For zero-sized `T`, `cap` is tracked logically and nothing is
//!   ever allocated.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::slice;

use crate::error::BufferError;

/// Owned storage block plus live-element count.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawBuf uniquely owns its elements, like Box<[T]>.
unsafe impl<T: Send> Send for RawBuf<T> {}
// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// The empty-marker: no allocation.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            _owns: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    fn layout_for(cap: usize) -> Result<Layout, BufferError> {
        Layout::array::<T>(cap).map_err(|_| BufferError::CapacityOverflow)
    }

    /// Reallocate to exactly `new_cap` slots, dropping elements past it.
    ///
    /// On error the block and its live elements are left untouched, except
    /// that a shrinking request has already dropped the truncated tail.
    pub(crate) fn reallocate(&mut self, new_cap: usize) -> Result<(), BufferError> {
        self.truncate(new_cap);
        if new_cap == self.cap {
            return Ok(());
        }
        if Self::IS_ZST {
            self.cap = new_cap;
            return Ok(());
        }
        if new_cap == 0 {
            release(self.ptr, self.cap);
            self.ptr = NonNull::dangling();
            self.cap = 0;
            return Ok(());
        }

        let new_layout = Self::layout_for(new_cap)?;
        let block = if self.cap == 0 {
            // SAFETY: T is not zero-sized and new_cap > 0, so new_layout
            // has a non-zero size.
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout = Self::layout_for(self.cap)?;
            // SAFETY: ptr was allocated by the global allocator with
            // old_layout (cap != 0). new_layout.size() is non-zero and was
            // checked against isize::MAX by Layout::array.
            unsafe { alloc::realloc(self.ptr.as_ptr().cast(), old_layout, new_layout.size()) }
        };

        match NonNull::new(block.cast::<T>()) {
            Some(ptr) => {
                self.ptr = ptr;
                self.cap = new_cap;
                Ok(())
            }
            None => Err(BufferError::AllocationFailed {
                bytes: new_layout.size(),
            }),
        }
    }

    /// Append into spare capacity and return the new element.
    ///
    /// # Panics
    ///
    /// Panics if there is no spare slot.
    pub(crate) fn push_within_capacity(&mut self, value: T) -> &mut T {
        assert!(self.len < self.cap, "push past capacity");
        // SAFETY: len < cap, so slot `len` is inside the block and
        // uninitialised.
        unsafe {
            let slot = self.ptr.as_ptr().add(self.len);
            ptr::write(slot, value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Shift `[index, len)` right by one slot and write `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or there is no spare slot.
    pub(crate) fn insert_within_capacity(&mut self, index: usize, value: T) -> &mut T {
        assert!(index <= self.len, "insert index past end");
        assert!(self.len < self.cap, "insert past capacity");
        // SAFETY: index <= len < cap. The shifted range [index, len) moves
        // to [index + 1, len + 1), which ends within cap. ptr::copy
        // tolerates the overlap. Slot `index` is then logically
        // uninitialised and receives `value`.
        unsafe {
            let at = self.ptr.as_ptr().add(index);
            ptr::copy(at, at.add(1), self.len - index);
            ptr::write(at, value);
            self.len += 1;
            &mut *at
        }
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was the last initialised slot. Decrementing
        // len first hands ownership of it to the returned value.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Move out the element at `index`, closing the gap.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "remove index out of bounds");
        // SAFETY: index < len, so the slot is initialised. After the read
        // the slot is logically moved-from and is overwritten by shifting
        // (index, len) left by one.
        unsafe {
            let at = self.ptr.as_ptr().add(index);
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drop `[index, index + count)` and shift the tail left by `count`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past `len`.
    pub(crate) fn erase(&mut self, index: usize, count: usize) {
        assert!(
            count <= self.len && index <= self.len - count,
            "erase range out of bounds"
        );
        let end = index + count;
        let old_len = self.len;
        // A panicking Drop leaks the tail instead of double-dropping it.
        self.len = index;
        // SAFETY: [index, end) lies within the initialised prefix. len was
        // lowered first, so the dropped slots are never observed again.
        // The tail [end, old_len) then moves down to [index, ...), which
        // ptr::copy handles even when the ranges overlap.
        unsafe {
            let at = self.ptr.as_ptr().add(index);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(at, count));
            ptr::copy(at.add(count), at, old_len - end);
        }
        self.len = old_len - count;
    }

    /// Drop every element at or past `new_len`.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        self.len = new_len;
        // SAFETY: [new_len, new_len + tail) was initialised and len now
        // excludes it, so each element is dropped exactly once.
        unsafe {
            let at = self.ptr.as_ptr().add(new_len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(at, tail));
        }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is initialised. With len == 0 the dangling,
        // aligned pointer is valid for an empty slice.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for as_slice, and &mut self guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// One past the last live element, or null for the empty-marker.
    pub(crate) fn end_ptr(&self) -> *const T {
        if self.cap == 0 {
            return ptr::null();
        }
        // SAFETY: len <= cap, so the result is at most one past the end
        // of the block.
        unsafe { self.ptr.as_ptr().add(self.len) }
    }

    /// Hand the block and its elements over to a by-value iterator.
    pub(crate) fn into_iter(self) -> RawIntoIter<T> {
        let this = ManuallyDrop::new(self);
        RawIntoIter {
            ptr: this.ptr,
            cap: this.cap,
            start: 0,
            end: this.len,
            _owns: PhantomData,
        }
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        self.truncate(0);
        release(self.ptr, self.cap);
    }
}

/// Return a block of `cap` slots to the global allocator.
fn release<T>(ptr: NonNull<T>, cap: usize) {
    if mem::size_of::<T>() == 0 || cap == 0 {
        return;
    }
    if let Ok(layout) = Layout::array::<T>(cap) {
        // SAFETY: the block was allocated with exactly this layout; a
        // layout that could not be built could never have been allocated.
        unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
    }
}

/// By-value iteration state over a released [`RawBuf`].
///
/// Slots `[start, end)` are initialised; everything else has been moved
/// out or was never written.
pub(crate) struct RawIntoIter<T> {
    ptr: NonNull<T>,
    cap: usize,
    start: usize,
    end: usize,
    _owns: PhantomData<T>,
}

// SAFETY: same ownership model as RawBuf.
unsafe impl<T: Send> Send for RawIntoIter<T> {}
// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync> Sync for RawIntoIter<T> {}

impl<T> RawIntoIter<T> {
    pub(crate) fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: index was in [start, end), hence initialised, and is now
        // excluded from that range so it is read exactly once.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(index)) })
    }

    pub(crate) fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: as for next, from the back of the range.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.end)) })
    }

    pub(crate) fn remaining(&self) -> usize {
        self.end - self.start
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) is initialised and inside the block.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(self.start), self.remaining()) }
    }
}

impl<T> Drop for RawIntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.remaining();
        let start = self.start;
        self.start = self.end;
        // SAFETY: [start, start + remaining) holds the un-yielded elements.
        // The range was emptied first, so they are dropped exactly once.
        unsafe {
            let at = self.ptr.as_ptr().add(start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(at, remaining));
        }
        release(self.ptr, self.cap);
    }
}
