//! Small value types shared by every format

use binrw::{BinRead, BinWrite};
use derive_more::derive::{Deref, Display, From, Into};
use std::{
    borrow::Cow,
    fmt::{self, Debug},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::FixedSize;

/// A four byte tag such as a file type (`"UTC "`) or version (`"V3.2"`)
#[derive(BinRead, BinWrite, Copy, Clone, PartialEq, Eq, Hash, Default, From, Into)]
#[brw(little)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create a tag from its bytes
    pub const fn new(tag: &[u8; 4]) -> Self {
        Self(*tag)
    }

    /// The tag bytes
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({:?})", self.to_string_lossy())
    }
}

impl PartialEq<[u8; 4]> for FourCC {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&[u8; 4]> for FourCC {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl FixedSize for FourCC {
    const SIZE: usize = 4;
}

/// A length-prefixed byte string as stored by the engine
///
/// The bytes are kept verbatim (the engine does not mandate an encoding), so decoding and
/// re-encoding never changes a string. Use [`ExoString::to_string_lossy`] for display.
#[derive(Clone, PartialEq, Eq, Hash, Default, Deref, From)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct ExoString(Vec<u8>);

impl ExoString {
    /// Create a string from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the string returning its raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The string as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl AsRef<[u8]> for ExoString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for ExoString {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for ExoString {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&[u8]> for ExoString {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<ExoString> for String {
    fn from(value: ExoString) -> Self {
        match String::from_utf8(value.0) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl PartialEq<str> for ExoString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for ExoString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for ExoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Debug for ExoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_string_lossy(), f)
    }
}

/// Numeric resource type of an archived resource
///
/// Kept opaque; `2027` is a creature blueprint, `2017` a 2DA table and so on.
#[derive(
    BinRead,
    BinWrite,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Debug,
    Display,
    From,
    Into,
)]
#[brw(little)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceType(pub u16);

impl ResourceType {
    /// Marker the engine uses for "no type"
    pub const INVALID: ResourceType = ResourceType(0xFFFF);
}

impl FixedSize for ResourceType {
    const SIZE: usize = 2;
}

/// Index into the string table
#[derive(
    BinRead, BinWrite, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, From, Into,
)]
#[brw(little)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StrRef(pub u32);

impl StrRef {
    /// The "no string" reference
    pub const NONE: StrRef = StrRef(0xFFFF_FFFF);

    /// Whether this is the "no string" reference
    pub const fn is_none(&self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for StrRef {
    fn default() -> Self {
        Self::NONE
    }
}

impl FixedSize for StrRef {
    const SIZE: usize = 4;
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::{ExoString, FourCC, ResourceType, StrRef};

    #[test]
    fn fourcc_display() {
        let tag = FourCC::new(b"UTC ");
        assert_eq!(tag.to_string(), "UTC ");
        assert_eq!(format!("{tag:?}"), "FourCC(\"UTC \")");
        assert_eq!(tag, b"UTC ");
    }

    #[test]
    fn read_write_newtypes() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let input = vec![
            0x56, 0x33, 0x2E, 0x32,
            0xEB, 0x07,
            0xFF, 0xFF, 0xFF, 0xFF,
        ];

        let mut cursor = Cursor::new(&input);
        let tag = FourCC::read(&mut cursor)?;
        let res_type = ResourceType::read(&mut cursor)?;
        let str_ref = StrRef::read(&mut cursor)?;

        assert_eq!(tag, FourCC::new(b"V3.2"));
        assert_eq!(res_type, ResourceType(2027));
        assert!(str_ref.is_none());

        let mut actual = Vec::new();
        let mut writer = Cursor::new(&mut actual);
        tag.write(&mut writer)?;
        res_type.write(&mut writer)?;
        str_ref.write(&mut writer)?;
        assert_eq!(actual, input);

        Ok(())
    }

    #[test]
    fn exo_string_keeps_bytes() {
        let raw = ExoString::new(vec![b'a', 0xE9, b'b']);
        assert_eq!(raw.as_bytes(), &[b'a', 0xE9, b'b']);
        assert_eq!(raw.to_string(), "a\u{FFFD}b");

        let text = ExoString::from("my_tag");
        assert_eq!(text, "my_tag");
        assert_eq!(String::from(text), "my_tag");
    }

    #[test]
    fn default_str_ref_is_none() {
        assert_eq!(StrRef::default(), StrRef::NONE);
        assert!(!StrRef(12).is_none());
    }
}
