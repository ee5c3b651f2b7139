//! Friendly view of TLK string tables

use std::{borrow::Cow, collections::BTreeMap};

use bon::Builder;
use nwn_common::{DataBlock, ExoString, ResRef, StrRef};
use tracing::instrument;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Result, read::RawTlk, types::TlkFlags};

/// One string of the table
///
/// ```
/// use nwn_common::ResRef;
/// use nwn_tlk::TlkEntry;
///
/// let entry = TlkEntry::builder()
///     .text("Well met.")
///     .sound_resref(ResRef::try_from("vs_wellmet").unwrap())
///     .sound_length(1.25)
///     .build();
///
/// assert_eq!(entry.text.unwrap(), "Well met.");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TlkEntry {
    /// The text, kept as stored
    #[builder(into)]
    pub text: Option<ExoString>,

    /// Voice-over sound
    pub sound_resref: Option<ResRef>,

    /// Duration of the voice-over in seconds
    pub sound_length: Option<f32>,
}

impl TlkEntry {
    /// Flags describing which parts of the entry are present
    pub fn flags(&self) -> TlkFlags {
        let mut flags = TlkFlags::default();
        if self.text.is_some() {
            flags |= TlkFlags::TEXT_PRESENT;
        }
        if self.sound_resref.is_some() {
            flags |= TlkFlags::SND_PRESENT;
        }
        if self.sound_length.is_some() {
            flags |= TlkFlags::SNDLENGTH_PRESENT;
        }
        flags
    }
}

/// A string table keyed by StrRef
///
/// Iterates in StrRef order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tlk {
    /// Language of the strings, 0 for English
    pub language_id: u32,

    /// Entries by StrRef
    pub entries: BTreeMap<StrRef, TlkEntry>,
}

impl Tlk {
    /// An empty table for a language
    pub fn new(language_id: u32) -> Self {
        Self {
            language_id,
            entries: BTreeMap::new(),
        }
    }

    /// Read a TLK file
    pub fn read<'a>(block: impl Into<DataBlock<'a>>) -> Result<Tlk> {
        Self::from_raw(&RawTlk::read(block)?)
    }

    /// Copy the entries of a raw table, keeping only the parts its flags mark present
    #[instrument(skip_all, err)]
    pub fn from_raw(raw: &RawTlk<'_>) -> Result<Tlk> {
        let mut entries = BTreeMap::new();

        for (index, data) in raw.string_data.iter().enumerate() {
            let entry = TlkEntry {
                text: raw.text(index)?.map(ExoString::from),
                sound_resref: data
                    .flags
                    .contains(TlkFlags::SND_PRESENT)
                    .then(|| ResRef::from_raw(&data.sound_resref)),
                sound_length: data
                    .flags
                    .contains(TlkFlags::SNDLENGTH_PRESENT)
                    .then_some(data.sound_length),
            };
            entries.insert(StrRef(index as u32), entry);
        }

        Ok(Tlk {
            language_id: raw.header.language_id,
            entries,
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The text of a StrRef, empty when the entry is missing or has no text
    pub fn get(&self, strref: StrRef) -> Cow<'_, str> {
        self.entries
            .get(&strref)
            .and_then(|entry| entry.text.as_ref())
            .map_or(Cow::Borrowed(""), ExoString::to_string_lossy)
    }

    /// The entry of a StrRef
    pub fn entry(&self, strref: StrRef) -> Option<&TlkEntry> {
        self.entries.get(&strref)
    }

    /// Replace the entry of a StrRef, returning the previous one
    pub fn set(&mut self, strref: StrRef, entry: TlkEntry) -> Option<TlkEntry> {
        self.entries.insert(strref, entry)
    }

    /// Iterate over the entries in StrRef order
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, StrRef, TlkEntry> {
        self.entries.iter()
    }
}

impl<'s> IntoIterator for &'s Tlk {
    type Item = (&'s StrRef, &'s TlkEntry);
    type IntoIter = std::collections::btree_map::Iter<'s, StrRef, TlkEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
