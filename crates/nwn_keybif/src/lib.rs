//! # KEY and BIF Format Documentation
//!
//! This crate reads the **KEY** and **BIF** files that bundle the base resources of Aurora engine
//! games such as *Neverwinter Nights*. A KEY file lists resources by name and type and points each
//! one at an entry of a BIF file, which holds the bytes.
//!
//! ## KEY File Structure
//!
//! | Offset (bytes) | Field                  | Description                                         |
//! |----------------|------------------------|-----------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: `"KEY "`                                   |
//! | 0x0004         | Version                | 4 bytes: `"V1  "`                                   |
//! | 0x0008         | BIF Count              | 4 bytes: Number of entries in the file table        |
//! | 0x000C         | Key Count              | 4 bytes: Number of entries in the key table         |
//! | 0x0010         | File Table Offset      | 4 bytes: Start of the file table                    |
//! | 0x0014         | Key Table Offset       | 4 bytes: Start of the key table                     |
//! | 0x0018         | Build Year             | 4 bytes: Years since 1900                           |
//! | 0x001C         | Build Day              | 4 bytes: Days since January 1st                     |
//! | 0x0020         | Reserved               | 32 bytes                                            |
//!
//! The file table holds 12 byte entries (file size, filename offset, 2 byte filename size, 2 byte
//! drive flags) followed by the filenames. The key table holds 22 byte entries: a 16 byte resref,
//! a 2 byte resource type and a 4 byte resource id.
//!
//! ### Resource Ids
//!
//! The top 12 bits of a resource id select the BIF in the file table. The bottom 20 bits are the
//! id inside that BIF, of which only the lowest 14 are significant.
//!
//! ## BIF File Structure
//!
//! | Offset (bytes) | Field                  | Description                                         |
//! |----------------|------------------------|-----------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: `"BIFF"`                                   |
//! | 0x0004         | Version                | 4 bytes: `"V1  "`                                   |
//! | 0x0008         | Variable Count         | 4 bytes: Number of variable resources               |
//! | 0x000C         | Fixed Count            | 4 bytes: Number of fixed resources                  |
//! | 0x0010         | Variable Table Offset  | 4 bytes: Start of the variable resource table       |
//!
//! Variable resources are 16 byte entries of id, offset from the start of the file, size and
//! type. Fixed resources follow them and are never used.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.key`, `.bif`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - Resource names are matched ASCII case-insensitively and are lowercased when read
//!

pub mod bif;
pub mod error;
pub mod key;
pub mod resolve;
pub mod types;

pub use bif::{Bif, BifResource, RawBif};
pub use key::{Key, KeyBifReference, KeyResource, RawKey, BIF_INDEX_SHIFT, BIF_RESOURCE_MASK};
pub use resolve::resolve;
pub use types::{BifHeader, KeyHeader};
