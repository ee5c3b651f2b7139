//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error raised when an offset-addressed read does not fit the underlying buffer
#[derive(Error, Diagnostic, Debug)]
pub enum SpanError {
    /// The requested byte range ends past the end of the buffer
    #[error("range {offset:#x}+{len:#x} is out of bounds for a buffer of {available:#x} bytes")]
    OutOfBounds {
        /// Start of the requested range
        offset: usize,
        /// Length of the requested range
        len: usize,
        /// Bytes available in the buffer
        available: usize,
    },

    /// `count * size` does not fit in the address space
    #[error("{count} records of {size} bytes at {offset:#x} overflow the address space")]
    Overflow {
        /// Start of the requested array
        offset: usize,
        /// Number of records requested
        count: usize,
        /// Size of a single record
        size: usize,
    },

    /// A fixed-size record could not be decoded from its bytes
    #[error("unable to decode record at {offset:#x}")]
    Record {
        /// Start of the record
        offset: usize,
        /// Underlying parse failure
        #[source]
        source: binrw::Error,
    },
}

/// Error raised when building a [`crate::ResRef`] from a name that does not fit
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("resref of {0} bytes exceeds the 16 byte limit")]
pub struct ResRefTooLong(pub usize);

/// Generic result type with [`SpanError`] as its error variant
pub type Result<T> = core::result::Result<T, SpanError>;
