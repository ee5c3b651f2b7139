//! Base types for structure of TLK file.

use std::ops::{BitOr, BitOrAssign};

use binrw::{BinRead, BinWrite};
use nwn_common::{FixedSize, FourCC};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// TLK file header
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TlkHeader {
    /// Must be [`TlkHeader::FILE_TYPE`]
    pub file_type: FourCC,

    /// Must be [`TlkHeader::VERSION`]
    pub file_version: FourCC,

    /// Language of the strings, 0 for English
    pub language_id: u32,

    /// Number of entries in the string data table
    pub string_count: u32,

    /// Start of the string block
    pub string_entries_offset: u32,
}

impl TlkHeader {
    /// The only supported file type
    pub const FILE_TYPE: FourCC = FourCC::new(b"TLK ");

    /// The only supported version
    pub const VERSION: FourCC = FourCC::new(b"V3.0");
}

impl Default for TlkHeader {
    fn default() -> Self {
        Self {
            file_type: Self::FILE_TYPE,
            file_version: Self::VERSION,
            language_id: 0,
            string_count: 0,
            string_entries_offset: Self::SIZE as u32,
        }
    }
}

impl FixedSize for TlkHeader {
    const SIZE: usize = 20;
}

/// Which parts of a [`TlkStringData`] entry are meaningful
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[brw(little)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TlkFlags(pub u32);

impl TlkFlags {
    /// The entry has text
    pub const TEXT_PRESENT: TlkFlags = TlkFlags(0x0001);

    /// The entry names a sound
    pub const SND_PRESENT: TlkFlags = TlkFlags(0x0002);

    /// The entry has a sound length
    pub const SNDLENGTH_PRESENT: TlkFlags = TlkFlags(0x0004);

    /// Whether every bit of `other` is set
    pub const fn contains(self, other: TlkFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TlkFlags {
    type Output = TlkFlags;

    fn bitor(self, rhs: TlkFlags) -> TlkFlags {
        TlkFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TlkFlags {
    fn bitor_assign(&mut self, rhs: TlkFlags) {
        self.0 |= rhs.0;
    }
}

/// One entry of the string data table, indexed by StrRef
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TlkStringData {
    /// Which of the following fields are meaningful
    pub flags: TlkFlags,

    /// NUL padded name of the voice-over sound
    pub sound_resref: [u8; 16],

    /// Unused
    pub volume_variance: u32,

    /// Unused
    pub pitch_variance: u32,

    /// Start of the text from the beginning of the string block
    pub offset_to_string: u32,

    /// Length of the text in bytes
    pub string_size: u32,

    /// Duration of the sound in seconds
    pub sound_length: f32,
}

impl FixedSize for TlkStringData {
    const SIZE: usize = 40;
}
