//! Reading BIF files

use std::collections::{btree_map::Entry, BTreeMap};

use nwn_common::{DataBlock, FixedSize, ResourceType};
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    key::BIF_RESOURCE_MASK,
    types::{BifFixedResource, BifHeader, BifVariableResource},
};

/// The tables of a BIF file as stored
#[derive(Debug, Clone, PartialEq)]
pub struct RawBif<'a> {
    /// The header as read
    pub header: BifHeader,

    /// Variable resource table
    pub variable: Vec<BifVariableResource>,

    /// Fixed resource table, following the variable one
    pub fixed: Vec<BifFixedResource>,

    /// Everything after the resource tables
    pub data: DataBlock<'a>,
}

impl<'a> RawBif<'a> {
    /// Decode the header and tables of a BIF file
    #[instrument(skip_all, err)]
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<RawBif<'a>> {
        let block = block.into();
        let reader = block.reader();

        let header: BifHeader = reader.read(0)?;
        if header.file_type != BifHeader::FILE_TYPE || header.file_version != BifHeader::VERSION {
            return Err(Error::InvalidHeader {
                file_type: header.file_type,
                version: header.file_version,
                expected_type: BifHeader::FILE_TYPE,
                expected_version: BifHeader::VERSION,
            });
        }

        let variable_start = header.variable_table_offset as usize;
        let variable: Vec<BifVariableResource> =
            reader.read_array(variable_start, header.variable_count as usize)?;

        let fixed_start = variable_start + variable.len() * BifVariableResource::SIZE;
        let fixed: Vec<BifFixedResource> =
            reader.read_array(fixed_start, header.fixed_count as usize)?;

        let data = block.slice_from(fixed_start + fixed.len() * BifFixedResource::SIZE)?;

        debug!(
            variable = variable.len(),
            fixed = fixed.len(),
            data = data.len(),
            "decoded bif tables"
        );

        Ok(RawBif {
            header,
            variable,
            fixed,
            data,
        })
    }

    /// Start of [`RawBif::data`] from the beginning of the file
    pub fn data_offset(&self) -> u32 {
        let tables = self.variable.len() * BifVariableResource::SIZE
            + self.fixed.len() * BifFixedResource::SIZE;
        self.header
            .variable_table_offset
            .saturating_add(u32::try_from(tables).unwrap_or(u32::MAX))
    }

    /// The bytes of a variable resource
    ///
    /// The returned block shares the file's backing.
    pub fn variable_data(&self, entry: &BifVariableResource) -> Result<DataBlock<'a>> {
        let data_offset = self.data_offset();
        let relative = entry
            .offset
            .checked_sub(data_offset)
            .ok_or(Error::ResourceBeforeData {
                id: entry.id,
                offset: entry.offset,
                data_offset,
            })?;

        Ok(self.data.slice(relative as usize, entry.file_size as usize)?)
    }
}

/// One resource stored in a BIF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BifResource<'a> {
    /// Resource id as stored, including the BIF index bits
    pub res_id: u32,

    /// Type of the resource
    pub res_type: ResourceType,

    /// The resource bytes
    pub data: DataBlock<'a>,
}

impl BifResource<'_> {
    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> BifResource<'static> {
        BifResource {
            res_id: self.res_id,
            res_type: self.res_type,
            data: self.data.into_owned(),
        }
    }
}

/// A BIF file as resources keyed by their BIF-local id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bif<'a> {
    /// Resources keyed by `res_id & 0x3FFF`
    pub resources: BTreeMap<u32, BifResource<'a>>,
}

impl<'a> Bif<'a> {
    /// Read a BIF file
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<Bif<'a>> {
        Self::from_raw(&RawBif::read(block)?)
    }

    /// Key the variable resources of a raw BIF file by their masked id
    ///
    /// Fixed resources are never used by the engine and are skipped. When two entries share a
    /// masked id the first one is kept.
    #[instrument(skip_all, err)]
    pub fn from_raw(raw: &RawBif<'a>) -> Result<Bif<'a>> {
        if !raw.fixed.is_empty() {
            debug!(count = raw.fixed.len(), "skipping fixed resources");
        }

        let mut resources: BTreeMap<u32, BifResource<'a>> = BTreeMap::new();
        for entry in &raw.variable {
            // the table stores 32 bits but resource types are 16 bits everywhere else
            let res_type = u16::try_from(entry.res_type).map_or_else(
                |_| {
                    trace!(id = entry.id, res_type = entry.res_type, "resource type out of range");
                    ResourceType::INVALID
                },
                ResourceType,
            );
            let resource = BifResource {
                res_id: entry.id,
                res_type,
                data: raw.variable_data(entry)?,
            };

            match resources.entry(entry.id & BIF_RESOURCE_MASK) {
                Entry::Vacant(slot) => {
                    slot.insert(resource);
                }
                Entry::Occupied(slot) => {
                    trace!(id = entry.id, masked = *slot.key(), "duplicate resource id");
                }
            }
        }

        Ok(Bif { resources })
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the file holds no resources
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Find a resource by id, ignoring the BIF index bits
    pub fn get(&self, res_id: u32) -> Option<&BifResource<'a>> {
        self.resources.get(&(res_id & BIF_RESOURCE_MASK))
    }

    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> Bif<'static> {
        Bif {
            resources: self
                .resources
                .into_iter()
                .map(|(id, resource)| (id, resource.into_owned()))
                .collect(),
        }
    }
}
