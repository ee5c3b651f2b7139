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

    /// file does not start with the expected type and version tags
    #[error("found {file_type} file with version {version}, expected {expected_type} {expected_version}")]
    InvalidHeader {
        /// File type tag from the header
        file_type: FourCC,
        /// Version tag from the header
        version: FourCC,
        /// The only supported file type
        expected_type: FourCC,
        /// The only supported version
        expected_version: FourCC,
    },

    /// a filename of the file table does not lie inside the file
    #[error("filename of bif {index} at {offset:#x}+{len} is outside of the key file")]
    FilenameOutOfRange {
        /// Position of the entry in the file table
        index: usize,
        /// Stored offset of the filename
        offset: u32,
        /// Stored length of the filename
        len: u16,
    },

    /// a resource entry points in front of the data block
    #[error("resource {id:#x} starts at {offset:#x}, before the data block at {data_offset:#x}")]
    ResourceBeforeData {
        /// Stored resource id
        id: u32,
        /// Stored offset of the resource
        offset: u32,
        /// Start of the data block
        data_offset: u32,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
