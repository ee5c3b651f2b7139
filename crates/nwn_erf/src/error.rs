//! Error types that can be emitted from this library

use miette::Diagnostic;
use nwn_common::{FourCC, ResRefTooLong, SpanError};
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`nwn_common::SpanError`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Span(#[from] SpanError),

    /// Transparent warpper for [`nwn_common::ResRefTooLong`]
    #[error(transparent)]
    ResRef(#[from] ResRefTooLong),

    /// file is not a supported erf version
    #[error("found {file_type} file with version {found}, expected version {expected}")]
    VersionMismatch {
        /// File type tag from the header
        file_type: FourCC,
        /// Version tag from the header
        found: FourCC,
        /// The only supported version
        expected: FourCC,
    },

    /// a resource entry points in front of the data block
    #[error("resource {index} starts at {offset:#x}, before the data block at {data_offset:#x}")]
    ResourceBeforeData {
        /// Position of the entry in the resource list
        index: usize,
        /// Stored offset of the resource
        offset: u32,
        /// Start of the data block
        data_offset: u32,
    },

    /// no resource at the requested position
    #[error("resource {index} is out of range for {count} entries")]
    IndexOutOfRange {
        /// The requested position
        index: usize,
        /// Resources in the archive
        count: usize,
    },

    /// archive grew past what a u32 offset can address
    #[error("{0} does not fit in a u32 offset")]
    TooLarge(&'static str),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
