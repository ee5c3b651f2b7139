//! Building blocks shared by the Aurora engine file format crates.
//!
//! Every Aurora format is laid out the same way: a fixed header, one or more flat arrays of
//! fixed-size records, and a variable-length data block those records point into by byte or
//! array offset. This crate holds the pieces that idiom needs everywhere:
//!
//! - [`DataBlock`]: a read-only byte span that either borrows the caller's buffer, owns a
//!   buffer handed over to it, or shares a memory mapping of a file. Sub-views share the same
//!   backing.
//! - [`OffsetReader`]: bounds-checked reads of records and slices at byte offsets. A range that
//!   does not fit the buffer is reported as [`SpanError::OutOfBounds`] before anything is read.
//! - [`ResRef`], [`ResourceType`], [`StrRef`], [`FourCC`] and [`ExoString`]: the small value types
//!   all formats share.
//!
//! ## Value Types
//!
//! | Type             | On disk                              | Notes                                     |
//! |------------------|--------------------------------------|-------------------------------------------|
//! | [`FourCC`]       | 4 bytes                              | File type and version tags                |
//! | [`ResRef`]       | up to 16 bytes, NUL padded           | Case-insensitive resource name            |
//! | [`ResourceType`] | `u16`                                | Opaque resource type id                   |
//! | [`StrRef`]       | `u32`                                | String table index, `0xFFFFFFFF` is none  |
//! | [`ExoString`]    | `u32` length + bytes                 | Encoding is not mandated, bytes are kept  |
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod resref;
pub mod span;
pub mod types;

pub use error::{ResRefTooLong, SpanError};
pub use resref::ResRef;
pub use span::{DataBlock, FixedSize, OffsetReader, Storage};
pub use types::{ExoString, FourCC, ResourceType, StrRef};
