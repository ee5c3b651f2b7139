//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`std::fmt::Error`]
    #[error(transparent)]
    FmtError(#[from] std::fmt::Error),

    /// first line is not `2DA V2.0`
    #[error("invalid 2da header {0:?}, expected \"2DA V2.0\"")]
    #[diagnostic(help("the first line of a 2da file must be `2DA V2.0`"))]
    InvalidHeader(String),

    /// a line could not be split into tokens
    #[error("unable to tokenize line {line}: {message}")]
    Tokenize {
        /// Zero based line number
        line: usize,
        /// Parser message
        message: String,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
