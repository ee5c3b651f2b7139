//! Error types that can be emitted from this library

use miette::Diagnostic;
use nwn_common::{FourCC, SpanError};
use thiserror::Error;

use crate::types::FieldType;

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

    /// file is not a supported gff version
    #[error("found {file_type} file with version {found}, expected version {expected}")]
    VersionMismatch {
        /// File type tag from the header
        file_type: FourCC,
        /// Version tag from the header
        found: FourCC,
        /// The only supported version
        expected: FourCC,
    },

    /// two fields of one struct share a label
    #[error("struct {struct_index} has more than one field labelled {label:?}")]
    DuplicateLabel {
        /// Struct holding the fields
        struct_index: u32,
        /// The repeated label
        label: String,
    },

    /// a struct references itself through its fields
    #[error("struct {struct_index} is its own ancestor")]
    #[diagnostic(help("a struct or list field points back to a struct that is still being built"))]
    StructCycle {
        /// The struct that was reached twice
        struct_index: u32,
    },

    /// the tree nests deeper than allowed
    #[error("structs nest deeper than {max_depth} levels")]
    DepthExceeded {
        /// Configured limit, see [`crate::read::GffReadOptions`]
        max_depth: usize,
    },

    /// a record refers to an entry past the end of its table
    #[error("{table} index {index} is out of range for {count} entries")]
    IndexOutOfRange {
        /// Name of the referenced table
        table: &'static str,
        /// The offending index
        index: u32,
        /// Entries in the table
        count: usize,
    },

    /// stored resref length is larger than 16
    #[error("resref length {0} exceeds the 16 byte limit")]
    ResRefLength(usize),

    /// a field holds a different type than requested
    #[error("field {label:?} holds {found:?}, expected {expected:?}")]
    TypeMismatch {
        /// Label of the field
        label: String,
        /// The requested type
        expected: FieldType,
        /// The stored type
        found: FieldType,
    },

    /// label does not fit the 16 byte label record
    #[error("label {0:?} is longer than 16 bytes")]
    LabelTooLong(String),

    /// a stored label is not a valid field name
    #[error("label {index} is not valid UTF-8: {bytes:02X?}")]
    InvalidLabel {
        /// Index into the label array
        index: u32,
        /// The label bytes up to the first NUL
        bytes: Vec<u8>,
    },

    /// table grew past what a u32 offset can address
    #[error("{0} does not fit in a u32 offset")]
    TooLarge(&'static str),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
