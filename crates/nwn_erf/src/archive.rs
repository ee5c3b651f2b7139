//! Friendly view of ERF archives

use nwn_common::{DataBlock, FourCC, ResRef, ResourceType, StrRef};
use tracing::{instrument, trace};

use crate::{
    error::Result,
    read::RawErf,
    types::{ErfDescription, ErfHeader},
};

/// One archived resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErfResource<'a> {
    /// Resource name, lowercased when read from an archive
    pub resref: ResRef,

    /// Type of the resource
    pub res_type: ResourceType,

    /// Resource id as stored, normally its position in the archive
    pub res_id: u32,

    /// The resource bytes
    pub data: DataBlock<'a>,
}

impl ErfResource<'_> {
    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> ErfResource<'static> {
        ErfResource {
            resref: self.resref,
            res_type: self.res_type,
            res_id: self.res_id,
            data: self.data.into_owned(),
        }
    }
}

/// An ERF, MOD, SAV or HAK archive as a flat list of resources
///
/// ```
/// # fn doit() -> nwn_erf::error::Result<()> {
/// use nwn_common::{ResRef, ResourceType};
/// use nwn_erf::{Erf, ErfHeader};
///
/// let mut hak = Erf::new(ErfHeader::HAK);
/// hak.push(ResRef::try_from("Cloak_001")?, ResourceType(2027), b"payload".to_vec());
/// let bytes = hak.to_bytes()?;
///
/// let read = Erf::read(bytes.as_slice())?;
/// let cloak = read.resource("CLOAK_001", ResourceType(2027)).unwrap();
/// assert_eq!(&*cloak.data, b"payload");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erf<'a> {
    /// File type tag, see [`ErfHeader::ERF`] and friends
    pub file_type: FourCC,

    /// Years since 1900
    pub build_year: u32,

    /// Days since January 1st
    pub build_day: u32,

    /// String table entry describing the archive
    pub description_str_ref: StrRef,

    /// Localized descriptions
    pub descriptions: Vec<ErfDescription>,

    /// Resources in stored order
    pub resources: Vec<ErfResource<'a>>,
}

impl Default for Erf<'_> {
    fn default() -> Self {
        Self::new(ErfHeader::ERF)
    }
}

impl<'a> Erf<'a> {
    /// An empty archive
    pub fn new(file_type: FourCC) -> Self {
        Self {
            file_type,
            build_year: 0,
            build_day: 0,
            description_str_ref: StrRef::NONE,
            descriptions: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Read an archive
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<Erf<'a>> {
        Self::from_raw(&RawErf::read(block)?)
    }

    /// Pair up the key and resource lists of a raw archive
    ///
    /// Resource bytes stay views of the raw archive's backing.
    #[instrument(skip_all, err)]
    pub fn from_raw(raw: &RawErf<'a>) -> Result<Erf<'a>> {
        let resources = raw
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                if key.res_id as usize != index {
                    trace!(index, res_id = key.res_id, "resource id does not match position");
                }

                Ok(ErfResource {
                    resref: ResRef::from_raw(&key.resref).to_ascii_lowercase(),
                    res_type: key.res_type,
                    res_id: key.res_id,
                    data: raw.resource_data(index)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Erf {
            file_type: raw.header.file_type,
            build_year: raw.header.build_year,
            build_day: raw.header.build_day,
            description_str_ref: raw.header.description_str_ref,
            descriptions: raw.descriptions.clone(),
            resources,
        })
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the archive holds no resources
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate over the resources in stored order
    pub fn iter(&self) -> std::slice::Iter<'_, ErfResource<'a>> {
        self.resources.iter()
    }

    /// Find a resource by name and type, ignoring ASCII case
    pub fn resource(
        &self,
        resref: impl AsRef<[u8]>,
        res_type: ResourceType,
    ) -> Option<&ErfResource<'a>> {
        let resref = resref.as_ref();
        self.resources
            .iter()
            .find(|resource| {
                resource.res_type == res_type && resource.resref.eq_ignore_ascii_case(resref)
            })
    }

    /// Append a resource, numbering it after the last one
    pub fn push(
        &mut self,
        resref: ResRef,
        res_type: ResourceType,
        data: impl Into<DataBlock<'a>>,
    ) -> &mut ErfResource<'a> {
        let res_id = self.resources.len() as u32;
        self.resources.push(ErfResource {
            resref,
            res_type,
            res_id,
            data: data.into(),
        });
        let last = self.resources.len() - 1;
        &mut self.resources[last]
    }

    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> Erf<'static> {
        Erf {
            file_type: self.file_type,
            build_year: self.build_year,
            build_day: self.build_day,
            description_str_ref: self.description_str_ref,
            descriptions: self.descriptions,
            resources: self
                .resources
                .into_iter()
                .map(ErfResource::into_owned)
                .collect(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s Erf<'a> {
    type Item = &'s ErfResource<'a>;
    type IntoIter = std::slice::Iter<'s, ErfResource<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
