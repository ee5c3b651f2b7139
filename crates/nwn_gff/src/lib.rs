//! This library handles reading from and creating **GFF** files used by *Aurora engine* games.
//!
//! # GFF Format Documentation
//!
//! The Generic File Format is a tree of structs, lists and typed fields used for most game data:
//! creatures (`UTC`), items (`UTI`), areas (`ARE`, `GIT`), dialogs (`DLG`), module info (`IFO`)
//! and many more. The file type tag tells them apart, the layout is always the same.
//!
//! ## File Structure
//!
//! A GFF file consists of a header followed by six tables. Records point into the other tables
//! by index or byte offset, so the tables can be stored in any order; writers of this crate store
//! them in the order of the header.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: Kind of data stored such as "UTC "                |
//! | 0x0004         | Version                | 4 bytes: Fixed value "V3.2"                                |
//! | 0x0008         | Struct Offset          | 4 bytes: Offset to the struct array                        |
//! | 0x000C         | Struct Count           | 4 bytes: Number of structs                                 |
//! | 0x0010         | Field Offset           | 4 bytes: Offset to the field array                         |
//! | 0x0014         | Field Count            | 4 bytes: Number of fields                                  |
//! | 0x0018         | Label Offset           | 4 bytes: Offset to the label array                         |
//! | 0x001C         | Label Count            | 4 bytes: Number of labels                                  |
//! | 0x0020         | Field Data Offset      | 4 bytes: Offset to the field data block                    |
//! | 0x0024         | Field Data Size        | 4 bytes: Size of the field data block in bytes             |
//! | 0x0028         | Field Indices Offset   | 4 bytes: Offset to the field indices array                 |
//! | 0x002C         | Field Indices Size     | 4 bytes: Size of the field indices array in bytes          |
//! | 0x0030         | List Indices Offset    | 4 bytes: Offset to the list indices block                  |
//! | 0x0034         | List Indices Size      | 4 bytes: Size of the list indices block in bytes           |
//!
//! ### Struct Array
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Type                   | 4 bytes: Opaque user type id                            |
//! | 0x0004         | Data Or Data Offset    | 4 bytes: Field index or field indices offset            |
//! | 0x0008         | Field Count            | 4 bytes: Number of fields                               |
//!
//! - A struct with a single field stores the index of that field.
//! - A struct with more fields stores a byte offset into the field indices array, where
//!   `Field Count` consecutive `u32` field indices start.
//! - A struct without fields stores `0xFFFFFFFF`.
//!
//! Struct 0 is the root of the tree.
//!
//! ### Field Array
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Type                   | 4 bytes: Field type, see below                          |
//! | 0x0004         | Label Index            | 4 bytes: Index into the label array                     |
//! | 0x0008         | Data Or Data Offset    | 4 bytes: Value, offset or index depending on the type   |
//!
//! | Type | Name          | Stored as                                                          |
//! |------|---------------|--------------------------------------------------------------------|
//! | 0    | BYTE          | inline `u8`                                                        |
//! | 1    | CHAR          | inline `i8`                                                        |
//! | 2    | WORD          | inline `u16`                                                       |
//! | 3    | SHORT         | inline `i16`                                                       |
//! | 4    | DWORD         | inline `u32`                                                       |
//! | 5    | INT           | inline `i32`                                                       |
//! | 6    | DWORD64       | field data: `u64`                                                  |
//! | 7    | INT64         | field data: `i64`                                                  |
//! | 8    | FLOAT         | inline `f32`                                                       |
//! | 9    | DOUBLE        | field data: `f64`                                                  |
//! | 10   | CExoString    | field data: `u32` length + bytes                                   |
//! | 11   | ResRef        | field data: `u8` length + up to 16 bytes                           |
//! | 12   | CExoLocString | field data: `u32` size, `u32` strref, `u32` count + substrings     |
//! | 13   | VOID          | field data: `u32` length + bytes                                   |
//! | 14   | Struct        | index into the struct array                                        |
//! | 15   | List          | byte offset into the list indices block                            |
//!
//! Inline values are stored little-endian in the low bytes of `Data Or Data Offset`. Every
//! substring of a CExoLocString is an `i32` id (`language * 2 + gender`), a `u32` length and the
//! bytes of the text.
//!
//! ### Label Array
//!
//! 16 byte names, NUL padded but not NUL terminated. A label is stored once and shared by every
//! field using that name. Fields of one struct never share a label.
//!
//! ### List Indices Block
//!
//! Every list is a `u32` element count followed by that many `u32` struct indices.
//!
//! ## Usage
//!
//! [`RawGff`] decodes the tables as stored and extracts single values with its `construct_*`
//! methods. [`Gff`] is the owned tree built from them, with fields looked up by name:
//!
//! ```
//! # fn doit() -> nwn_gff::error::Result<()> {
//! use nwn_common::{ExoString, FourCC};
//! use nwn_gff::{Gff, GffList, GffStruct};
//!
//! let mut gff = Gff::new(FourCC::new(b"UTC "));
//! gff.write_field("Tag", "my_tag");
//! gff.write_field("ClassList", GffList::from(vec![GffStruct::new(2)]));
//!
//! let bytes = gff.to_bytes()?;
//! let decoded = Gff::read(bytes.as_slice())?;
//!
//! assert_eq!(decoded.read_field::<ExoString>("Tag").unwrap(), "my_tag");
//! assert_eq!(decoded.read_field::<GffList>("ClassList").unwrap().len(), 1);
//! assert_eq!(decoded, gff);
//! # Ok(())
//! # }
//! # doit().unwrap();
//! ```
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.utc`, `.uti`, `.are`, `.git`, `.ifo`, `.dlg`, `.bic` and others
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod read;
pub mod tree;
pub mod types;
pub mod value;
pub mod write;

pub use read::{GffReadOptions, RawGff};
pub use tree::{Gff, GffList, GffStruct};
pub use types::FieldType;
pub use value::{FieldValue, FromField, LocString, LocSubString};
