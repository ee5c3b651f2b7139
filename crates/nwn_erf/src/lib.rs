//! # ERF Format Documentation
//!
//! This crate reads and writes the **ERF** archives used by Aurora engine games such as
//! *Neverwinter Nights*. The same layout is used for generic archives (`.erf`), modules (`.mod`),
//! saved games (`.sav`) and hak paks (`.hak`); only the file type tag differs.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: `"ERF "`, `"MOD "`, `"SAV "` or `"HAK "`          |
//! | 0x0004         | Version                | 4 bytes: `"V1.0"`                                          |
//! | 0x0008         | Language Count         | 4 bytes: Number of localized descriptions                  |
//! | 0x000C         | Localized String Size  | 4 bytes: Size of the description list in bytes            |
//! | 0x0010         | Entry Count            | 4 bytes: Number of resources                               |
//! | 0x0014         | Description Offset     | 4 bytes: Start of the description list                     |
//! | 0x0018         | Key List Offset        | 4 bytes: Start of the key list                             |
//! | 0x001C         | Resource List Offset   | 4 bytes: Start of the resource list                        |
//! | 0x0020         | Build Year             | 4 bytes: Years since 1900                                  |
//! | 0x0024         | Build Day              | 4 bytes: Days since January 1st                            |
//! | 0x0028         | Description StrRef     | 4 bytes: String table entry describing the archive         |
//! | 0x002C         | Reserved               | 116 bytes                                                  |
//!
//! ### Description List
//!
//! `Language Count` entries of a 4 byte language id, a 4 byte length and the text bytes.
//!
//! ### Key List
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | ResRef                 | 16 bytes: NUL padded resource name                      |
//! | 0x0010         | Resource ID            | 4 bytes: Position of the resource                       |
//! | 0x0014         | Resource Type          | 2 bytes: Type of the resource                           |
//! | 0x0016         | Reserved               | 2 bytes                                                 |
//!
//! ### Resource List
//!
//! One entry per key, in the same order: a 4 byte offset from the start of the file and a 4 byte
//! size. The resource bytes follow the resource list.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.erf`, `.mod`, `.sav`, `.hak`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - Resource names are matched ASCII case-insensitively and are lowercased when read
//!

pub mod archive;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use archive::{Erf, ErfResource};
pub use read::RawErf;
pub use types::{ErfDescription, ErfHeader};
pub use write::{ErfWriter, ErfWriterOptions};
