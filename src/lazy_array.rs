//! Scalar arrays initializable in constant time.
//!
//! A [`LazyArray`] behaves as if every one of its `D` slots held a default
//! value from the moment of construction, without writing `D` slots up front.
//!
//! # Layout
//!
//! Three parallel buffers of length `D`:
//! - `values`: element storage; a slot's contents are unspecified until the
//!   element's first touch.
//! - `order`: a stack of indices in first-touch order; only `order[0..top]`
//!   is live.
//! - `slot`: back-pointers into `order`; `slot[i]` is live only if `i` has
//!   been touched.
//!
//! # Validity
//!
//! Index `i` is in the written set iff `slot[i] < top && order[slot[i]] == i`.
//! No code path other than the first touch of `i` ever stores `i` into
//! `order`, so a stale `slot[i]` can never collide with a live stack entry
//! that names `i`. The check is therefore correct regardless of the initial
//! contents of `order` and `slot`.

use std::mem::MaybeUninit;

use crate::error::{Error, Result};

/// Reserve an uninitialized buffer of `len` slots, surfacing OOM as an error.
pub(crate) fn try_uninit<T>(len: usize) -> Result<Vec<MaybeUninit<T>>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { elements: len, source })?;
    // SAFETY: `MaybeUninit<T>` requires no initialization and `len` slots
    // were just reserved.
    unsafe { buf.set_len(len) };
    Ok(buf)
}

/// Reserve a zero-filled index buffer of `len` slots.
///
/// The validity check never trusts these entries until they are assigned, so
/// zero is an arbitrary sentinel; it just avoids handing out uninitialized
/// integers.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<usize>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { elements: len, source })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// An array of fixed capacity, logically pre-filled with a default value.
///
/// Reads and first-touch writes are O(1) worst case; memory is
/// `D * (size_of::<T>() + 2 * size_of::<usize>())` regardless of how many
/// elements are ever touched.
pub struct LazyArray<T> {
    /// Element storage; entry `i` is initialized iff `i` is in the written set.
    values: Vec<MaybeUninit<T>>,
    /// Validity stack: `order[0..top]` are the touched indices in touch order.
    order: Vec<usize>,
    /// Stack position of each touched index.
    slot: Vec<usize>,
    top: usize,
    init: T,
}

impl<T> std::fmt::Debug for LazyArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyArray")
            .field("len", &self.values.len())
            .field("written", &self.top)
            .finish()
    }
}

impl<T: Copy> LazyArray<T> {
    /// Create an array of `len` elements, all reading as `init`.
    ///
    /// Only buffer reservations are performed; no per-element work.
    pub fn new(len: usize, init: T) -> Result<Self> {
        Ok(Self {
            values: try_uninit(len)?,
            order: try_zeroed(len)?,
            slot: try_zeroed(len)?,
            top: 0,
            init,
        })
    }

    /// Return the number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the array has capacity 0.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of elements touched so far.
    pub fn written(&self) -> usize {
        self.top
    }

    /// Visit the touched indices in first-touch order.
    pub fn written_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order[..self.top].iter().copied()
    }

    /// Heap memory held by the three backing buffers, in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.values.len() * (std::mem::size_of::<T>() + 2 * std::mem::size_of::<usize>())
    }

    fn is_written(&self, i: usize) -> bool {
        let p = self.slot[i];
        p < self.top && self.order[p] == i
    }

    /// Return the value at `i`, or the default if `i` was never touched.
    ///
    /// Never mutates; reading an untouched element costs the same validity
    /// check as reading a touched one.
    pub fn get(&self, i: usize) -> Result<T> {
        if i >= self.values.len() {
            return Err(Error::IndexOutOfBounds(i));
        }
        if self.is_written(i) {
            // SAFETY: the validity check proves values[i] was assigned by a
            // previous first touch.
            Ok(unsafe { self.values[i].assume_init() })
        } else {
            Ok(self.init)
        }
    }

    /// Return a mutable slot for element `i`, touching it first if needed.
    ///
    /// On the first touch of `i` the slot is reset to the default value and
    /// `i` is pushed onto the validity stack; on every later call the slot
    /// keeps whatever was last assigned through it. The returned reference
    /// borrows the array, so it cannot outlive the next mutating call.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T> {
        if i >= self.values.len() {
            return Err(Error::IndexOutOfBounds(i));
        }
        if !self.is_written(i) {
            self.slot[i] = self.top;
            self.order[self.top] = i;
            self.top += 1;
            self.values[i].write(self.init);
        }
        // SAFETY: the slot was written just above, or the validity check
        // proved an earlier first touch.
        Ok(unsafe { self.values[i].assume_init_mut() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_before_any_write() {
        let arr = LazyArray::new(100, 7u32).unwrap();
        for i in 0..100 {
            assert_eq!(arr.get(i).unwrap(), 7);
        }
        assert_eq!(arr.written(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut arr = LazyArray::new(10, 0u32).unwrap();
        *arr.get_mut(3).unwrap() = 42;
        *arr.get_mut(7).unwrap() = 99;
        assert_eq!(arr.get(3).unwrap(), 42);
        assert_eq!(arr.get(7).unwrap(), 99);
        assert_eq!(arr.get(4).unwrap(), 0);
        assert_eq!(arr.written(), 2);
    }

    #[test]
    fn test_first_touch_resets_once() {
        let mut arr = LazyArray::new(4, 5u8).unwrap();
        *arr.get_mut(2).unwrap() = 200;
        // A re-touch must preserve the assigned value, not reset it.
        assert_eq!(*arr.get_mut(2).unwrap(), 200);
        assert_eq!(arr.get(2).unwrap(), 200);
    }

    #[test]
    fn test_reads_do_not_touch() {
        let mut arr = LazyArray::new(8, 1u64).unwrap();
        assert_eq!(arr.get(5).unwrap(), 1);
        assert_eq!(arr.written(), 0);
        *arr.get_mut(5).unwrap() = 2;
        assert_eq!(arr.written(), 1);
        assert_eq!(arr.get(6).unwrap(), 1);
        assert_eq!(arr.written(), 1);
    }

    #[test]
    fn test_written_order() {
        let mut arr = LazyArray::new(10, 0i32).unwrap();
        for &i in &[9, 0, 4] {
            *arr.get_mut(i).unwrap() = i as i32;
        }
        *arr.get_mut(9).unwrap() += 1; // re-touch, no new stack entry
        let order: Vec<usize> = arr.written_indices().collect();
        assert_eq!(order, vec![9, 0, 4]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut arr = LazyArray::new(10, 0u32).unwrap();
        assert!(matches!(arr.get(10), Err(Error::IndexOutOfBounds(10))));
        assert!(matches!(arr.get_mut(10), Err(Error::IndexOutOfBounds(10))));
        assert!(matches!(arr.get(usize::MAX), Err(Error::IndexOutOfBounds(_))));
    }

    #[test]
    fn test_zero_capacity() {
        let arr = LazyArray::new(0, 0u32).unwrap();
        assert!(arr.is_empty());
        assert!(matches!(arr.get(0), Err(Error::IndexOutOfBounds(0))));
    }

    #[test]
    fn test_footprint_is_capacity_shaped() {
        let mut arr = LazyArray::new(1000, 0u32).unwrap();
        *arr.get_mut(5).unwrap() = 0;
        *arr.get_mut(999).unwrap() = 0;
        assert_eq!(arr.get(5).unwrap(), 0);
        assert_eq!(arr.get(999).unwrap(), 0);
        assert_eq!(arr.get(6).unwrap(), 0);
        // Footprint depends on capacity, not on the two writes.
        let expected = 1000 * (4 + 2 * std::mem::size_of::<usize>());
        assert_eq!(arr.heap_bytes(), expected);
    }
}
