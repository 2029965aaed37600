//! Word-granularity bitmap initializable in constant time.
//!
//! Same validity-stack mechanism as [`crate::lazy_array`], but the unit of
//! laziness is a 64-bit word: the stack tracks which words have been touched,
//! and every bit of an untouched word reads as the default bit value.
//!
//! # Layout
//!
//! `num_bits.div_ceil(64)` words of storage plus the `(order, slot, top)`
//! triple keyed by word index, so bookkeeping is two indices per word rather
//! than per bit.

use std::mem::MaybeUninit;

use crate::error::{Error, Result};
use crate::lazy_array::{try_uninit, try_zeroed};

/// A fixed-size bitmap whose bits all read as a default value until their
/// word is first touched.
pub struct LazyBitmap {
    /// Word storage; entry `w` is initialized iff word `w` has been touched.
    words: Vec<MaybeUninit<u64>>,
    /// Validity stack over word indices.
    order: Vec<usize>,
    slot: Vec<usize>,
    top: usize,
    /// Default value of every untouched bit.
    init: bool,
    num_bits: usize,
}

impl std::fmt::Debug for LazyBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyBitmap")
            .field("bits", &self.num_bits)
            .field("written_words", &self.top)
            .finish()
    }
}

impl LazyBitmap {
    /// Create a bitmap of `num_bits` bits, all reading as `init`.
    pub fn new(num_bits: usize, init: bool) -> Result<Self> {
        let num_words = num_bits.div_ceil(64);
        Ok(Self {
            words: try_uninit(num_words)?,
            order: try_zeroed(num_words)?,
            slot: try_zeroed(num_words)?,
            top: 0,
            init,
            num_bits,
        })
    }

    /// Return the number of addressable bits.
    pub fn len_bits(&self) -> usize {
        self.num_bits
    }

    /// Return the number of 64-bit words backing the bitmap.
    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    /// Return true if the bitmap has 0 bits.
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Return the number of words touched so far.
    pub fn written(&self) -> usize {
        self.top
    }

    /// Heap memory held by the word storage and its bookkeeping, in bytes.
    pub fn heap_bytes(&self) -> usize {
        3 * std::mem::size_of::<u64>() * self.words.len()
    }

    fn is_written(&self, w: usize) -> bool {
        let p = self.slot[w];
        p < self.top && self.order[p] == w
    }

    /// The word value holding 64 copies of the default bit.
    fn fill_word(&self) -> u64 {
        if self.init {
            !0
        } else {
            0
        }
    }

    /// Return word `w` of the bitmap.
    ///
    /// An untouched word reads as the uniform fill of the default bit, the
    /// same value a first touch materializes into it.
    pub fn word(&self, w: usize) -> Result<u64> {
        if w >= self.words.len() {
            return Err(Error::IndexOutOfBounds(w));
        }
        if self.is_written(w) {
            // SAFETY: the validity check proves words[w] was assigned by a
            // previous first touch.
            Ok(unsafe { self.words[w].assume_init() })
        } else {
            Ok(self.fill_word())
        }
    }

    /// Return the bit at `bit`.
    ///
    /// For a bit in an untouched word this returns `init` directly; no
    /// default word is ever materialized on the read path.
    pub fn get(&self, bit: usize) -> Result<bool> {
        if bit >= self.num_bits {
            return Err(Error::IndexOutOfBounds(bit));
        }
        let w = bit / 64;
        if self.is_written(w) {
            // SAFETY: same as in `word`.
            let word = unsafe { self.words[w].assume_init() };
            Ok((word >> (bit % 64)) & 1 == 1)
        } else {
            Ok(self.init)
        }
    }

    /// Return a mutable reference to word `w`, touching it first if needed.
    ///
    /// A first touch stores the uniform fill of the default bit, so every
    /// bit of the word keeps reading as the default until the caller ORs in
    /// or masks out bits through the returned reference.
    pub fn word_mut(&mut self, w: usize) -> Result<&mut u64> {
        if w >= self.words.len() {
            return Err(Error::IndexOutOfBounds(w));
        }
        if !self.is_written(w) {
            self.slot[w] = self.top;
            self.order[self.top] = w;
            self.top += 1;
            let fill = self.fill_word();
            self.words[w].write(fill);
        }
        // SAFETY: the word was written just above, or the validity check
        // proved an earlier first touch.
        Ok(unsafe { self.words[w].assume_init_mut() })
    }

    /// Set the bit at `bit` to 1.
    pub fn set(&mut self, bit: usize) -> Result<()> {
        if bit >= self.num_bits {
            return Err(Error::IndexOutOfBounds(bit));
        }
        *self.word_mut(bit / 64)? |= 1u64 << (bit % 64);
        Ok(())
    }

    /// Set the bit at `bit` to 0.
    pub fn clear(&mut self, bit: usize) -> Result<()> {
        if bit >= self.num_bits {
            return Err(Error::IndexOutOfBounds(bit));
        }
        *self.word_mut(bit / 64)? &= !(1u64 << (bit % 64));
        Ok(())
    }
}
