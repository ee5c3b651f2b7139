//! Base types for structure of ERF file.

use binrw::{BinRead, BinWrite};
use nwn_common::{ExoString, FixedSize, FourCC, ResourceType, StrRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ERF file header
///
/// A file type tag and a version, followed by the location of the description list, the key list
/// and the resource list. Both lists hold `entry_count` records.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ErfHeader {
    /// One of [`ErfHeader::ERF`], [`ErfHeader::MOD`], [`ErfHeader::SAV`] or [`ErfHeader::HAK`]
    pub file_type: FourCC,

    /// Format version, must be [`ErfHeader::VERSION`]
    pub file_version: FourCC,

    /// Number of localized descriptions
    pub language_count: u32,

    /// Size of the description list in bytes
    pub localized_string_size: u32,

    /// Number of archived resources
    pub entry_count: u32,

    /// Start of the description list
    pub offset_to_localized_string: u32,

    /// Start of the key list
    pub offset_to_key_list: u32,

    /// Start of the resource list
    pub offset_to_resource_list: u32,

    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,

    /// String table entry describing the archive
    pub description_str_ref: StrRef,

    /// Unused, zero when written
    pub reserved: [u8; 116],
}

impl ErfHeader {
    /// The only supported version
    pub const VERSION: FourCC = FourCC::new(b"V1.0");

    /// Generic archive
    pub const ERF: FourCC = FourCC::new(b"ERF ");

    /// Module
    pub const MOD: FourCC = FourCC::new(b"MOD ");

    /// Saved game
    pub const SAV: FourCC = FourCC::new(b"SAV ");

    /// Hak pak
    pub const HAK: FourCC = FourCC::new(b"HAK ");
}

impl Default for ErfHeader {
    fn default() -> Self {
        Self {
            file_type: Self::ERF,
            file_version: Self::VERSION,
            language_count: 0,
            localized_string_size: 0,
            entry_count: 0,
            offset_to_localized_string: Self::SIZE as u32,
            offset_to_key_list: Self::SIZE as u32,
            offset_to_resource_list: Self::SIZE as u32,
            build_year: 0,
            build_day: 0,
            description_str_ref: StrRef::NONE,
            reserved: [0; 116],
        }
    }
}

impl FixedSize for ErfHeader {
    const SIZE: usize = 160;
}

/// Name and type of one archived resource
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ErfKey {
    /// NUL padded resource name
    pub resref: [u8; 16],

    /// Position of the resource in the resource list
    pub res_id: u32,

    /// Type of the resource
    pub res_type: ResourceType,

    /// Unused, zero when written
    pub reserved: u16,
}

impl FixedSize for ErfKey {
    const SIZE: usize = 24;
}

/// Location of one archived resource
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct ErfResourceEntry {
    /// Start of the resource from the beginning of the file
    pub offset: u32,

    /// Size of the resource in bytes
    pub size: u32,
}

impl FixedSize for ErfResourceEntry {
    const SIZE: usize = 8;
}

/// One localized description of the archive
///
/// Stored as a `u32` language id followed by a `u32` length and the text bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErfDescription {
    /// Language of the text
    pub language_id: u32,

    /// The description
    pub text: ExoString,
}

impl ErfDescription {
    /// Bytes taken by this description in the description list
    pub fn stored_size(&self) -> usize {
        8 + self.text.len()
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use nwn_common::{FourCC, ResourceType, StrRef};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{ErfHeader, ErfKey, ErfResourceEntry};

    #[test]
    fn header_layout() -> Result<()> {
        let header = ErfHeader {
            file_type: ErfHeader::HAK,
            entry_count: 2,
            offset_to_key_list: 0xA0,
            offset_to_resource_list: 0xD0,
            build_year: 124,
            build_day: 45,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        #[rustfmt::skip]
        let expected_start: Vec<u8> = vec![
            0x48, 0x41, 0x4B, 0x20,
            0x56, 0x31, 0x2E, 0x30,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xD0, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00,
            0x2D, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,
        ];

        assert_eq!(actual.len(), 160);
        assert_eq!(&actual[..44], expected_start.as_slice());
        assert!(actual[44..].iter().all(|b| *b == 0));

        assert_eq!(ErfHeader::read(&mut Cursor::new(&actual))?, header);

        Ok(())
    }

    #[test]
    fn read_key() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x6D, 0x6F, 0x64, 0x75, 0x6C, 0x65, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0xDE, 0x07,
            0x00, 0x00,
        ]);

        let key = ErfKey::read(&mut input)?;
        assert_eq!(&key.resref[..7], b"module\0");
        assert_eq!(key.res_id, 3);
        assert_eq!(key.res_type, ResourceType(2014));
        assert_eq!(input.position(), 24);

        Ok(())
    }

    #[test]
    fn write_resource_entry() -> Result<()> {
        let entry = ErfResourceEntry {
            offset: 0x1234,
            size: 16,
        };

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x34, 0x12, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
        ];

        let mut actual = Vec::new();
        entry.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn default_header() {
        let header = ErfHeader::default();
        assert_eq!(header.file_type, FourCC::new(b"ERF "));
        assert_eq!(header.description_str_ref, StrRef::NONE);
    }
}
