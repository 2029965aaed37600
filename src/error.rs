//! Error types for lazily initialized structures.

use std::collections::TryReserveError;

use thiserror::Error;

/// Error variants for lazy array and bitmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was provided that is out of the structure's bounds.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// The backing buffers for the requested capacity could not be allocated.
    #[error("allocation of {elements} elements failed")]
    Allocation {
        /// Number of elements the failed reservation asked for.
        elements: usize,
        /// The underlying reservation failure.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized Result type for lazy structure operations.
pub type Result<T> = std::result::Result<T, Error>;
