//! Types for reading ERF archives
//!

use nwn_common::{DataBlock, ExoString, FixedSize};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    types::{ErfDescription, ErfHeader, ErfKey, ErfResourceEntry},
};

/// The tables of an ERF archive as stored
///
/// `keys` and `resources` are parallel: entry `i` of both describes the same resource.
#[derive(Debug, Clone, PartialEq)]
pub struct RawErf<'a> {
    /// The header as read
    pub header: ErfHeader,

    /// Localized descriptions
    pub descriptions: Vec<ErfDescription>,

    /// Key list
    pub keys: Vec<ErfKey>,

    /// Resource list
    pub resources: Vec<ErfResourceEntry>,

    /// Everything after the resource list
    pub data: DataBlock<'a>,
}

impl<'a> RawErf<'a> {
    /// Decode the header and tables of an ERF archive
    #[instrument(skip_all, err)]
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<RawErf<'a>> {
        let block = block.into();
        let reader = block.reader();

        let header: ErfHeader = reader.read(0)?;
        if header.file_version != ErfHeader::VERSION {
            return Err(Error::VersionMismatch {
                file_type: header.file_type,
                found: header.file_version,
                expected: ErfHeader::VERSION,
            });
        }

        let mut descriptions = Vec::with_capacity(header.language_count.min(64) as usize);
        let mut offset = header.offset_to_localized_string as usize;
        for _ in 0..header.language_count {
            let language_id = reader.read_u32(offset)?;
            let (text, next) = reader.read_sized_u32(offset + 4)?;
            descriptions.push(ErfDescription {
                language_id,
                text: ExoString::from(text),
            });
            offset = next;
        }

        let entries = header.entry_count as usize;
        let keys = reader.read_array(header.offset_to_key_list as usize, entries)?;
        let resources = reader.read_array(header.offset_to_resource_list as usize, entries)?;

        let data_offset = header.offset_to_resource_list as usize + entries * ErfResourceEntry::SIZE;
        let data = block.slice_from(data_offset)?;

        debug!(
            file_type = %header.file_type,
            descriptions = descriptions.len(),
            entries,
            data = data.len(),
            "decoded erf tables"
        );

        Ok(RawErf {
            header,
            descriptions,
            keys,
            resources,
            data,
        })
    }

    /// Start of [`RawErf::data`] from the beginning of the file
    pub fn data_offset(&self) -> u32 {
        self.header.offset_to_resource_list.saturating_add(
            self.header
                .entry_count
                .saturating_mul(ErfResourceEntry::SIZE as u32),
        )
    }

    /// The bytes of the resource at position `index`
    ///
    /// The returned block shares the archive's backing.
    pub fn resource_data(&self, index: usize) -> Result<DataBlock<'a>> {
        let entry = self
            .resources
            .get(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.resources.len(),
            })?;

        let data_offset = self.data_offset();
        let relative = entry
            .offset
            .checked_sub(data_offset)
            .ok_or(Error::ResourceBeforeData {
                index,
                offset: entry.offset,
                data_offset,
            })?;

        Ok(self.data.slice(relative as usize, entry.size as usize)?)
    }

    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> RawErf<'static> {
        RawErf {
            header: self.header,
            descriptions: self.descriptions,
            keys: self.keys,
            resources: self.resources,
            data: self.data.into_owned(),
        }
    }
}
