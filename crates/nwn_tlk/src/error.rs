//! Error types that can be emitted from this library

use miette::Diagnostic;
use nwn_common::{FourCC, SpanError};
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

    /// file does not start with the expected type and version tags
    #[error("found {file_type} file with version {version}, expected TLK V3.0")]
    InvalidHeader {
        /// File type tag from the header
        file_type: FourCC,
        /// Version tag from the header
        version: FourCC,
    },

    /// the text of an entry does not lie inside the string block
    #[error("text of strref {index} at {offset:#x}+{size} is outside of the string block")]
    TextOutOfRange {
        /// Position of the entry in the string data table
        index: usize,
        /// Stored offset from the start of the string block
        offset: u32,
        /// Stored length of the text
        size: u32,
    },

    /// table grew past what a u32 offset can address
    #[error("{0} does not fit in a u32 offset")]
    TooLarge(&'static str),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
