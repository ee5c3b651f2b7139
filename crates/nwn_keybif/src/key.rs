//! Reading KEY files

use nwn_common::{DataBlock, FixedSize, ResRef, ResourceType};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{KeyEntry, KeyFileEntry, KeyHeader},
};

/// Mask of the BIF-local part of a resource id
pub const BIF_RESOURCE_MASK: u32 = 0x0000_3FFF;

/// Bits the BIF index is shifted by inside a resource id
pub const BIF_INDEX_SHIFT: u32 = 20;

/// The tables of a KEY file as stored
#[derive(Debug, Clone, PartialEq)]
pub struct RawKey<'a> {
    /// The header as read
    pub header: KeyHeader,

    /// File table
    pub files: Vec<KeyFileEntry>,

    /// Filename block between the file table and the key table
    pub filenames: DataBlock<'a>,

    /// Key table
    pub entries: Vec<KeyEntry>,
}

impl<'a> RawKey<'a> {
    /// Decode the header and tables of a KEY file
    #[instrument(skip_all, err)]
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<RawKey<'a>> {
        let block = block.into();
        let reader = block.reader();

        let header: KeyHeader = reader.read(0)?;
        if header.file_type != KeyHeader::FILE_TYPE || header.file_version != KeyHeader::VERSION {
            return Err(Error::InvalidHeader {
                file_type: header.file_type,
                version: header.file_version,
                expected_type: KeyHeader::FILE_TYPE,
                expected_version: KeyHeader::VERSION,
            });
        }

        let files: Vec<KeyFileEntry> = reader.read_array(
            header.offset_to_file_table as usize,
            header.bif_count as usize,
        )?;
        let entries: Vec<KeyEntry> = reader.read_array(
            header.offset_to_key_table as usize,
            header.key_count as usize,
        )?;

        let filenames_start =
            header.offset_to_file_table as usize + files.len() * KeyFileEntry::SIZE;
        let filenames = block.slice(
            filenames_start,
            (header.offset_to_key_table as usize).saturating_sub(filenames_start),
        )?;

        debug!(
            bifs = files.len(),
            resources = entries.len(),
            "decoded key tables"
        );

        Ok(RawKey {
            header,
            files,
            filenames,
            entries,
        })
    }

    /// The stored name of the BIF at position `index` in the file table
    ///
    /// Trailing NULs are dropped. Positions past the file table have an empty name.
    pub fn filename(&self, index: usize) -> Result<&[u8]> {
        let Some(file) = self.files.get(index) else {
            return Ok(&[]);
        };

        let out_of_range = || Error::FilenameOutOfRange {
            index,
            offset: file.filename_offset,
            len: file.filename_size,
        };

        let filenames_start = self.header.offset_to_file_table as usize
            + self.files.len() * KeyFileEntry::SIZE;
        let start = (file.filename_offset as usize)
            .checked_sub(filenames_start)
            .ok_or_else(out_of_range)?;
        let name = self
            .filenames
            .get(start..start + file.filename_size as usize)
            .ok_or_else(out_of_range)?;

        let len = name.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
        Ok(&name[..len])
    }
}

/// A BIF file listed by a KEY file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyBifReference {
    /// Drives holding the file, 0 for the install directory
    pub drives: u16,

    /// Path of the file relative to its drive, as stored (usually with `\` separators)
    pub path: String,

    /// Size of the file in bytes
    pub file_size: u32,
}

/// A resource listed by a KEY file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyResource {
    /// Resource name, lowercased
    pub resref: ResRef,

    /// Type of the resource
    pub res_type: ResourceType,

    /// Resource id as stored
    pub res_id: u32,
}

impl KeyResource {
    /// Position of the holding BIF in [`Key::bifs`]
    pub const fn bif_index(&self) -> usize {
        (self.res_id >> BIF_INDEX_SHIFT) as usize
    }

    /// Id of the resource inside its BIF
    pub const fn bif_resource_id(&self) -> u32 {
        self.res_id & BIF_RESOURCE_MASK
    }
}

/// A KEY file as lists of BIF files and resources
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Key {
    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,

    /// BIF files in file table order
    pub bifs: Vec<KeyBifReference>,

    /// Resources in key table order
    pub resources: Vec<KeyResource>,
}

impl Key {
    /// Read a KEY file
    pub fn read<'a>(block: impl Into<DataBlock<'a>>) -> Result<Key> {
        Self::from_raw(&RawKey::read(block)?)
    }

    /// Resolve the filenames and lowercase the resource names of a raw KEY file
    pub fn from_raw(raw: &RawKey<'_>) -> Result<Key> {
        let bifs = raw
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                Ok(KeyBifReference {
                    drives: file.drives,
                    path: String::from_utf8_lossy(raw.filename(index)?).into_owned(),
                    file_size: file.file_size,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let resources = raw
            .entries
            .iter()
            .map(|entry| KeyResource {
                resref: ResRef::from_raw(&entry.resref).to_ascii_lowercase(),
                res_type: entry.res_type,
                res_id: entry.res_id,
            })
            .collect();

        Ok(Key {
            build_year: raw.header.build_year,
            build_day: raw.header.build_day,
            bifs,
            resources,
        })
    }

    /// Find a resource by name and type, ignoring ASCII case
    pub fn locate(&self, resref: impl AsRef<[u8]>, res_type: ResourceType) -> Option<&KeyResource> {
        let resref = resref.as_ref();
        self.resources
            .iter()
            .find(|resource| {
                resource.res_type == res_type && resource.resref.eq_ignore_ascii_case(resref)
            })
    }

    /// The BIF holding a resource
    pub fn bif(&self, resource: &KeyResource) -> Option<&KeyBifReference> {
        self.bifs.get(resource.bif_index())
    }
}
