//! Resource names

use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ResRefTooLong;

/// A resource name without extension, at most 16 bytes
///
/// Resource names are compared ASCII case-insensitively by the engine. A `ResRef` keeps the
/// bytes it was created from; use [`ResRef::to_ascii_lowercase`] for the canonical form.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ResRef {
    len: u8,
    bytes: [u8; ResRef::MAX_LEN],
}

impl ResRef {
    /// Maximum length of a resource name in bytes
    pub const MAX_LEN: usize = 16;

    /// Create a resource name from raw bytes
    pub fn new(name: impl AsRef<[u8]>) -> Result<ResRef, ResRefTooLong> {
        let name = name.as_ref();
        if name.len() > Self::MAX_LEN {
            return Err(ResRefTooLong(name.len()));
        }

        let mut bytes = [0u8; Self::MAX_LEN];
        bytes[..name.len()].copy_from_slice(name);
        Ok(ResRef {
            len: name.len() as u8,
            bytes,
        })
    }

    /// Read a NUL-padded on-disk name, stopping at the first NUL
    pub fn from_raw(raw: &[u8; ResRef::MAX_LEN]) -> ResRef {
        let len = raw.iter().position(|b| *b == 0).unwrap_or(Self::MAX_LEN);
        let mut bytes = [0u8; Self::MAX_LEN];
        bytes[..len].copy_from_slice(&raw[..len]);
        ResRef {
            len: len as u8,
            bytes,
        }
    }

    /// The NUL-padded on-disk form
    pub fn to_raw(&self) -> [u8; ResRef::MAX_LEN] {
        self.bytes
    }

    /// The name bytes without padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Length of the name in bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the name is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The name as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// The canonical lowercase form of this name
    pub fn to_ascii_lowercase(&self) -> ResRef {
        let mut lower = *self;
        lower.bytes.make_ascii_lowercase();
        lower
    }

    /// Compare two names the way the engine does
    pub fn eq_ignore_ascii_case(&self, other: impl AsRef<[u8]>) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_ref())
    }
}

impl AsRef<[u8]> for ResRef {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for ResRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Debug for ResRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResRef({:?})", self.to_string_lossy())
    }
}

impl TryFrom<&str> for ResRef {
    type Error = ResRefTooLong;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ResRef::new(value)
    }
}

impl TryFrom<String> for ResRef {
    type Error = ResRefTooLong;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResRef::new(value)
    }
}

impl From<ResRef> for String {
    fn from(value: ResRef) -> Self {
        value.to_string_lossy().into_owned()
    }
}
