//! Lazy array with bookkeeping packed down to one bit per element.
//!
//! [`PackedLazyArray`] offers the same logical semantics as
//! [`crate::lazy_array::LazyArray`], but replaces the two per-element index
//! buffers with a per-64-element-block bitmask held in an internal
//! `LazyArray<u64>`. Bookkeeping drops from O(n) words to O(n/64) words, at
//! the cost of one extra O(1) indirection per access.
//!
//! The internal bitmask array defaults to 0, so an entirely untouched block
//! answers "nothing written here" without ever having been materialized.

use std::mem::MaybeUninit;

use crate::error::{Error, Result};
use crate::lazy_array::{try_uninit, LazyArray};

/// A lazily initialized array whose touch-tracking costs one bit per element.
pub struct PackedLazyArray<T> {
    /// Element storage; entry `i` is initialized iff its bit is set in the
    /// block bitmask.
    cells: Vec<MaybeUninit<T>>,
    /// One u64 bitmask per 64-element block, itself lazily initialized.
    touched: LazyArray<u64>,
    init: T,
}

impl<T> std::fmt::Debug for PackedLazyArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedLazyArray")
            .field("len", &self.cells.len())
            .field("written_blocks", &self.touched.written())
            .finish()
    }
}

impl<T: Copy> PackedLazyArray<T> {
    /// Create an array of `len` elements, all reading as `init`.
    pub fn new(len: usize, init: T) -> Result<Self> {
        Ok(Self {
            cells: try_uninit(len)?,
            touched: LazyArray::new(len.div_ceil(64), 0u64)?,
            init,
        })
    }

    /// Return the number of elements.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return true if the array has capacity 0.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the number of elements touched so far.
    pub fn written(&self) -> usize {
        self.touched
            .written_indices()
            .map(|block| {
                // Blocks on the stack were materialized, so this read is Ok.
                self.touched.get(block).unwrap_or(0).count_ones() as usize
            })
            .sum()
    }

    /// Heap memory held by the element storage plus the block bitmasks.
    pub fn heap_bytes(&self) -> usize {
        self.cells.len() * std::mem::size_of::<T>() + self.touched.heap_bytes()
    }

    /// Heap memory held by the touch-tracking alone, in bytes.
    pub fn bookkeeping_bytes(&self) -> usize {
        self.touched.heap_bytes()
    }

    /// Return the value at `i`, or the default if `i` was never touched.
    pub fn get(&self, i: usize) -> Result<T> {
        if i >= self.cells.len() {
            return Err(Error::IndexOutOfBounds(i));
        }
        let mask = self.touched.get(i / 64)?;
        if (mask >> (i % 64)) & 1 == 1 {
            // SAFETY: the block bitmask bit proves cells[i] was assigned by a
            // previous first touch.
            Ok(unsafe { self.cells[i].assume_init() })
        } else {
            Ok(self.init)
        }
    }

    /// Return a mutable slot for element `i`, touching it first if needed.
    ///
    /// First touch of an element in a fully untouched block also first-touches
    /// the block's bitmask word (materializing it as 0) before setting the
    /// element's bit. Only the element's own first touch resets its cell to
    /// the default.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut T> {
        if i >= self.cells.len() {
            return Err(Error::IndexOutOfBounds(i));
        }
        let mask = self.touched.get_mut(i / 64)?;
        let bit = 1u64 << (i % 64);
        if *mask & bit == 0 {
            *mask |= bit;
            self.cells[i].write(self.init);
        }
        // SAFETY: the cell was written just above, or its bitmask bit proved
        // an earlier first touch.
        Ok(unsafe { self.cells[i].assume_init_mut() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_before_any_write() {
        let arr = PackedLazyArray::new(200, 0xABu8).unwrap();
        for i in 0..200 {
            assert_eq!(arr.get(i).unwrap(), 0xAB);
        }
        assert_eq!(arr.written(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut arr = PackedLazyArray::new(130, -1i64).unwrap();
        *arr.get_mut(0).unwrap() = 10;
        *arr.get_mut(129).unwrap() = 20;
        assert_eq!(arr.get(0).unwrap(), 10);
        assert_eq!(arr.get(129).unwrap(), 20);
        assert_eq!(arr.get(64).unwrap(), -1);
        assert_eq!(arr.written(), 2);
    }

    #[test]
    fn test_block_neighbors_stay_default() {
        let mut arr = PackedLazyArray::new(128, 9u32).unwrap();
        // Touching one element must not mark the rest of its block.
        *arr.get_mut(70).unwrap() = 1;
        for i in 64..128 {
            if i != 70 {
                assert_eq!(arr.get(i).unwrap(), 9);
            }
        }
        assert_eq!(arr.get(70).unwrap(), 1);
    }

    #[test]
    fn test_first_touch_resets_once() {
        let mut arr = PackedLazyArray::new(64, 5u16).unwrap();
        *arr.get_mut(10).unwrap() = 777;
        // Re-touch of 10 and first touch of a block sibling both leave it be.
        assert_eq!(*arr.get_mut(10).unwrap(), 777);
        *arr.get_mut(11).unwrap() = 888;
        assert_eq!(arr.get(10).unwrap(), 777);
        assert_eq!(arr.get(11).unwrap(), 888);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut arr = PackedLazyArray::new(100, 0u8).unwrap();
        assert!(matches!(arr.get(100), Err(Error::IndexOutOfBounds(100))));
        assert!(matches!(arr.get_mut(100), Err(Error::IndexOutOfBounds(100))));
    }

    #[test]
    fn test_million_element_scenario() {
        let mut arr = PackedLazyArray::new(1_000_000, 0xFFu8).unwrap();
        *arr.get_mut(500_000).unwrap() = 7;
        assert_eq!(arr.get(500_000).unwrap(), 7);
        assert_eq!(arr.get(500_001).unwrap(), 0xFF);
        // Bookkeeping covers ceil(1e6 / 64) = 15625 words, independent of the
        // single write.
        let words = 1_000_000usize.div_ceil(64);
        assert_eq!(words, 15_625);
        assert_eq!(
            arr.bookkeeping_bytes(),
            words * (8 + 2 * std::mem::size_of::<usize>())
        );
        assert_eq!(arr.heap_bytes(), 1_000_000 + arr.bookkeeping_bytes());
    }
}
