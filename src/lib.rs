//! # Constant-Time-Initializable Arrays
//!
//! *Arrays that are born cleared, without ever being cleared.*
//!
//! ## Intuition First
//!
//! Imagine a hotel with a million rooms. Before guests arrive, every room must
//! read "vacant." Walking the corridors to flip a million signs takes all
//! night. Instead, keep a guest ledger at the front desk: a room is occupied
//! only if the ledger says so *and* the room's key tag points back at the
//! right ledger line. Rooms never visited can contain anything at all (stale
//! signs, garbage) and it does not matter, because the ledger check exposes
//! them as vacant.
//!
//! ## The Problem
//!
//! Allocating an array is O(1) (the allocator hands back a block), but
//! *initializing* it is O(n). Compact data structures (k²-trees, graph
//! traversals, sparse accumulators) allocate arrays big, touch them sparsely,
//! and logically clear them often. Paying O(n) per clear dominates everything
//! else.
//!
//! ## Historical Context
//!
//! ```text
//! 1974  Aho-Hopcroft-Ullman  Exercise 2.12: the folklore O(1)-init array
//! 1986  Bentley              "Programming Pearls" popularizes the trick
//! 1993  Briggs-Torczon       Sparse sets for compiler liveness analysis
//! 2014  Navarro              Compact data structures adopt lazy arrays
//! 2017  Hagerup-Kammer       In-place initializable arrays, 1 extra bit
//! ```
//!
//! ## Mathematical Formulation
//!
//! Maintain a *written set* $W$ over indices $[0, D)$ with a stack `order`
//! (touched indices, in touch order) and back-pointers `slot`. Then
//!
//! $$ i \in W \iff slot[i] < top \land order[slot[i]] = i $$
//!
//! holds even when `slot` and `order` start as garbage: only the first touch
//! of $i$ ever stores $i$ into `order`, so a stale `slot[i]` cannot alias a
//! live stack entry naming $i$. Reads return `values[i]` for $i \in W$ and
//! the default otherwise; the first touch of $i$ pushes it onto the stack.
//!
//! ## Complexity Analysis
//!
//! - **Time**: O(1) worst case per read and per write; no resizing, no
//!   rehashing, no amortization needed.
//! - **Space**: [`LazyArray`] spends two extra index words per element;
//!   [`PackedLazyArray`] shrinks that to one bit per element by tracking
//!   64-element blocks through an internal `LazyArray<u64>` of bitmasks.
//!
//! ## What Could Go Wrong
//!
//! 1. **Trusting uninitialized memory**: the validity check is what makes
//!    garbage harmless; read the backing buffers directly and you get
//!    garbage.
//! 2. **Unchecked indexing**: an out-of-range index must fail, not warn and
//!    read past the buffer. Every access here is bounds-checked and returns
//!    [`Error::IndexOutOfBounds`].
//! 3. **Concurrent writers**: first touch is a read-check-then-mutate
//!    sequence. Taking `&mut self` on the mutators makes Rust enforce the
//!    single-writer requirement at compile time.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`LazyArray`]**: scalar lazy array, two index words of bookkeeping per
//!   element.
//! - **[`PackedLazyArray`]**: same semantics, bookkeeping packed to one bit
//!   per element.
//! - **[`LazyBitmap`]**: the mechanism specialized to 64-bit words with
//!   bit-level reads.
//!
//! ## References
//!
//! - Aho, A., Hopcroft, J., & Ullman, J. (1974). "The Design and Analysis of
//!   Computer Algorithms," exercise 2.12.
//! - Briggs, P., & Torczon, L. (1993). "An Efficient Representation for
//!   Sparse Sets."
//! - Navarro, G. (2014). "Compact Data Structures: A Practical Approach."
//! - Hagerup, T., & Kammer, F. (2017). "On-the-fly array initialization in
//!   less space."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitmap;
pub mod error;
pub mod lazy_array;
pub mod packed;

pub use bitmap::LazyBitmap;
pub use error::Error;
pub use lazy_array::LazyArray;
pub use packed::PackedLazyArray;
