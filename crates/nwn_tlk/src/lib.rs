//! # TLK Format Documentation
//!
//! This crate reads and writes the **TLK** talk tables of Aurora engine games such as
//! *Neverwinter Nights*. A talk table holds every user-visible string of the game for one
//! language; other files refer to them by index (a StrRef).
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | File Type              | 4 bytes: `"TLK "`                                          |
//! | 0x0004         | Version                | 4 bytes: `"V3.0"`                                          |
//! | 0x0008         | Language ID            | 4 bytes: Language of the strings                           |
//! | 0x000C         | String Count           | 4 bytes: Number of entries in the string data table        |
//! | 0x0010         | String Entries Offset  | 4 bytes: Start of the string block                         |
//!
//! ### String Data Table
//!
//! Follows the header directly, one entry per StrRef:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Flags                  | 4 bytes: `0x1` text, `0x2` sound, `0x4` sound length    |
//! | 0x0004         | Sound ResRef           | 16 bytes: NUL padded name of the voice-over             |
//! | 0x0014         | Volume Variance        | 4 bytes: Unused                                         |
//! | 0x0018         | Pitch Variance         | 4 bytes: Unused                                         |
//! | 0x001C         | Offset To String       | 4 bytes: Start of the text in the string block          |
//! | 0x0020         | String Size            | 4 bytes: Length of the text in bytes                    |
//! | 0x0024         | Sound Length           | 4 bytes: `f32` duration of the sound in seconds         |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tlk`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - Text is stored without a terminator or a mandated encoding
//!

pub mod error;
pub mod read;
pub mod table;
pub mod types;
pub mod write;

pub use read::RawTlk;
pub use table::{Tlk, TlkEntry};
pub use types::{TlkFlags, TlkHeader, TlkStringData};
