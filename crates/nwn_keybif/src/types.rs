//! Base types for structure of KEY and BIF files.

use binrw::{BinRead, BinWrite};
use nwn_common::{FixedSize, FourCC, ResourceType};

/// KEY file header
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct KeyHeader {
    /// Must be [`KeyHeader::FILE_TYPE`]
    pub file_type: FourCC,

    /// Must be [`KeyHeader::VERSION`]
    pub file_version: FourCC,

    /// Number of BIF files listed in the file table
    pub bif_count: u32,

    /// Number of resources across all listed BIF files
    pub key_count: u32,

    /// Start of the file table
    pub offset_to_file_table: u32,

    /// Start of the key table
    pub offset_to_key_table: u32,

    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,

    /// Unused
    pub reserved: [u8; 32],
}

impl KeyHeader {
    /// The only supported file type
    pub const FILE_TYPE: FourCC = FourCC::new(b"KEY ");

    /// The only supported version
    pub const VERSION: FourCC = FourCC::new(b"V1  ");
}

impl Default for KeyHeader {
    fn default() -> Self {
        Self {
            file_type: Self::FILE_TYPE,
            file_version: Self::VERSION,
            bif_count: 0,
            key_count: 0,
            offset_to_file_table: Self::SIZE as u32,
            offset_to_key_table: Self::SIZE as u32,
            build_year: 0,
            build_day: 0,
            reserved: [0; 32],
        }
    }
}

impl FixedSize for KeyHeader {
    const SIZE: usize = 64;
}

/// One BIF file listed by a KEY file
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct KeyFileEntry {
    /// Size of the BIF file in bytes
    pub file_size: u32,

    /// Start of the filename from the beginning of the KEY file
    pub filename_offset: u32,

    /// Length of the filename in bytes
    pub filename_size: u16,

    /// Bit flags of the drives holding the file, 0 for the install directory
    pub drives: u16,
}

impl FixedSize for KeyFileEntry {
    const SIZE: usize = 12;
}

/// One resource listed by a KEY file
///
/// Stored without padding between the type and the id.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct KeyEntry {
    /// NUL padded resource name
    pub resref: [u8; 16],

    /// Type of the resource
    pub res_type: ResourceType,

    /// BIF index in the top 12 bits, resource index in the bottom 20
    pub res_id: u32,
}

impl FixedSize for KeyEntry {
    const SIZE: usize = 22;
}

/// BIF file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct BifHeader {
    /// Must be [`BifHeader::FILE_TYPE`]
    pub file_type: FourCC,

    /// Must be [`BifHeader::VERSION`]
    pub file_version: FourCC,

    /// Number of entries in the variable resource table
    pub variable_count: u32,

    /// Number of entries in the fixed resource table
    pub fixed_count: u32,

    /// Start of the variable resource table
    pub variable_table_offset: u32,
}

impl BifHeader {
    /// The only supported file type
    pub const FILE_TYPE: FourCC = FourCC::new(b"BIFF");

    /// The only supported version
    pub const VERSION: FourCC = FourCC::new(b"V1  ");
}

impl FixedSize for BifHeader {
    const SIZE: usize = 20;
}

/// Location of one resource inside a BIF file
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct BifVariableResource {
    /// Resource id, matched against [`KeyEntry::res_id`]
    pub id: u32,

    /// Start of the resource from the beginning of the file
    pub offset: u32,

    /// Size of the resource in bytes
    pub file_size: u32,

    /// Type of the resource, widened to 32 bits
    pub res_type: u32,
}

impl FixedSize for BifVariableResource {
    const SIZE: usize = 16;
}

/// Fixed-size resource entry, read but never used by the engine
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct BifFixedResource {
    /// Resource id
    pub id: u32,

    /// Start of the resource from the beginning of the file
    pub offset: u32,

    /// Number of parts
    pub part_count: u32,

    /// Size of the resource in bytes
    pub file_size: u32,

    /// Type of the resource
    pub res_type: u32,
}

impl FixedSize for BifFixedResource {
    const SIZE: usize = 20;
}
