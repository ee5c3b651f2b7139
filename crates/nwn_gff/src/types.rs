//! Base types for structure of GFF file.

use binrw::{BinRead, BinWrite};
use nwn_common::{FixedSize, FourCC};
use std::{
    borrow::Cow,
    fmt::{self, Debug},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// GFF file header
///
/// A file type tag (`"UTC "`, `"ARE "`, ...) and a version tag, followed by the location of the
/// six tables. The `*_count` of the field data, field indices and list indices blocks are sizes in
/// bytes, the others are record counts.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffHeader {
    /// Advisory tag of the kind of data stored, never validated
    pub file_type: FourCC,

    /// Format version, must be [`GffHeader::VERSION`]
    pub file_version: FourCC,

    /// Start of the struct array
    pub struct_offset: u32,

    /// Number of struct records
    pub struct_count: u32,

    /// Start of the field array
    pub field_offset: u32,

    /// Number of field records
    pub field_count: u32,

    /// Start of the label array
    pub label_offset: u32,

    /// Number of labels
    pub label_count: u32,

    /// Start of the field data block
    pub field_data_offset: u32,

    /// Size of the field data block in bytes
    pub field_data_count: u32,

    /// Start of the field indices array
    pub field_indices_offset: u32,

    /// Size of the field indices array in bytes
    pub field_indices_count: u32,

    /// Start of the list indices block
    pub list_indices_offset: u32,

    /// Size of the list indices block in bytes
    pub list_indices_count: u32,
}

impl GffHeader {
    /// The only supported version
    pub const VERSION: FourCC = FourCC::new(b"V3.2");
}

impl Default for GffHeader {
    fn default() -> Self {
        Self {
            file_type: FourCC::new(b"GFF "),
            file_version: Self::VERSION,
            struct_offset: Self::SIZE as u32,
            struct_count: 0,
            field_offset: Self::SIZE as u32,
            field_count: 0,
            label_offset: Self::SIZE as u32,
            label_count: 0,
            field_data_offset: Self::SIZE as u32,
            field_data_count: 0,
            field_indices_offset: Self::SIZE as u32,
            field_indices_count: 0,
            list_indices_offset: Self::SIZE as u32,
            list_indices_count: 0,
        }
    }
}

impl FixedSize for GffHeader {
    const SIZE: usize = 56;
}

/// Type tag of a field
///
/// Tags outside of `0..=15` are rejected when the field array is decoded.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[brw(repr = u32)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldType {
    /// `u8`, inline
    #[default]
    Byte = 0,
    /// `i8`, inline
    Char = 1,
    /// `u16`, inline
    Word = 2,
    /// `i16`, inline
    Short = 3,
    /// `u32`, inline
    Dword = 4,
    /// `i32`, inline
    Int = 5,
    /// `u64` in the field data block
    Dword64 = 6,
    /// `i64` in the field data block
    Int64 = 7,
    /// `f32`, inline
    Float = 8,
    /// `f64` in the field data block
    Double = 9,
    /// Length-prefixed string in the field data block
    ExoString = 10,
    /// Resource name in the field data block
    ResRef = 11,
    /// Localized string in the field data block
    LocString = 12,
    /// Length-prefixed opaque bytes in the field data block
    Void = 13,
    /// Index into the struct array
    Struct = 14,
    /// Offset into the list indices block
    List = 15,
}

impl FieldType {
    /// Whether the value is stored directly in the field record
    pub const fn is_simple(&self) -> bool {
        matches!(
            self,
            FieldType::Byte
                | FieldType::Char
                | FieldType::Word
                | FieldType::Short
                | FieldType::Dword
                | FieldType::Int
                | FieldType::Float
        )
    }

    /// Whether the field record holds an offset into the field data block
    pub const fn is_complex(&self) -> bool {
        matches!(
            self,
            FieldType::Dword64
                | FieldType::Int64
                | FieldType::Double
                | FieldType::ExoString
                | FieldType::ResRef
                | FieldType::LocString
                | FieldType::Void
        )
    }
}

/// GFF struct record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffStructRecord {
    /// Opaque user type id, `0xFFFFFFFF` for the root struct by convention
    pub type_id: u32,

    /// A field index when `field_count == 1`, a byte offset into the field indices array when
    /// `field_count > 1`, unused otherwise
    pub data_or_data_offset: u32,

    /// Number of fields of this struct
    pub field_count: u32,
}

impl GffStructRecord {
    /// Offset stored for structs without fields
    pub const NO_FIELDS: u32 = 0xFFFF_FFFF;
}

impl FixedSize for GffStructRecord {
    const SIZE: usize = 12;
}

/// GFF field record
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct GffFieldRecord {
    /// The type of value stored
    pub field_type: FieldType,

    /// Index into the label array
    pub label_index: u32,

    /// The little-endian value for simple types, otherwise an offset or index, see [`FieldType`]
    pub data_or_data_offset: u32,
}

impl FixedSize for GffFieldRecord {
    const SIZE: usize = 12;
}

/// GFF label record, NUL-padded and not NUL-terminated
#[derive(BinRead, BinWrite, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct GffLabel(pub [u8; 16]);

impl GffLabel {
    /// Maximum label length in bytes
    pub const MAX_LEN: usize = 16;

    /// Create a label record from a field name
    pub fn new(name: &str) -> Result<GffLabel> {
        let bytes = name.as_bytes();
        if bytes.len() > Self::MAX_LEN {
            return Err(Error::LabelTooLong(name.to_owned()));
        }

        let mut label = [0u8; Self::MAX_LEN];
        label[..bytes.len()].copy_from_slice(bytes);
        Ok(GffLabel(label))
    }

    /// The label bytes up to the first NUL
    pub fn as_bytes(&self) -> &[u8] {
        let len = self
            .0
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(Self::MAX_LEN);
        &self.0[..len]
    }

    /// The label as a field name, `None` when the bytes are not UTF-8
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// The label for display, invalid UTF-8 replaced
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl Debug for GffLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GffLabel({:?})", self.name())
    }
}

impl FixedSize for GffLabel {
    const SIZE: usize = 16;
}
