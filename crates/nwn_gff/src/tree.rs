//! Owned, navigable GFF trees
//!

use derive_more::derive::{Deref, DerefMut, From, IntoIterator};
use indexmap::IndexMap;
use nwn_common::{DataBlock, FourCC};
use tracing::{debug, instrument, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    read::{GffReadOptions, RawGff},
    types::{FieldType, GffFieldRecord, GffStructRecord},
    value::{FieldValue, FromField},
};

/// A struct of a GFF tree: named fields in stored order plus an opaque type id
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GffStruct {
    type_id: u32,
    fields: IndexMap<String, FieldValue>,
}

impl GffStruct {
    /// Create an empty struct
    pub fn new(type_id: u32) -> Self {
        Self {
            type_id,
            fields: IndexMap::new(),
        }
    }

    /// The user type id
    pub const fn type_id(&self) -> u32 {
        self.type_id
    }

    /// Replace the user type id
    pub fn set_type_id(&mut self, type_id: u32) {
        self.type_id = type_id;
    }

    /// All fields in stored order
    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    /// Iterate over `(name, value)` pairs in stored order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the struct has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The value of a field, whatever its type
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Mutable access to the value of a field
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(name)
    }

    /// Borrow a field as `T`
    ///
    /// Returns `None` when there is no field with this name.
    ///
    /// # Panics
    ///
    /// When the field exists but holds a different type than `T`. Use
    /// [`GffStruct::try_read_field`] where the type is not known up front.
    ///
    /// ```
    /// use nwn_common::ExoString;
    /// use nwn_gff::GffStruct;
    ///
    /// let mut root = GffStruct::new(0xFFFF_FFFF);
    /// root.write_field("Tag", "my_tag");
    /// root.write_field("Gold", 150u32);
    ///
    /// assert_eq!(root.read_field::<ExoString>("Tag").unwrap(), "my_tag");
    /// assert_eq!(root.read_field::<u32>("Gold"), Some(&150));
    /// assert_eq!(root.read_field::<u32>("Nope"), None);
    /// ```
    pub fn read_field<T: FromField>(&self, name: &str) -> Option<&T> {
        self.fields.get(name).map(|value| {
            T::from_field(value).unwrap_or_else(|| {
                panic!(
                    "field {name:?} holds {:?}, requested {:?}",
                    value.field_type(),
                    T::TYPE
                )
            })
        })
    }

    /// Borrow a field as `T`, reporting a type mismatch as [`Error::TypeMismatch`]
    pub fn try_read_field<T: FromField>(&self, name: &str) -> Result<Option<&T>> {
        let Some(value) = self.fields.get(name) else {
            return Ok(None);
        };

        T::from_field(value)
            .map(Some)
            .ok_or_else(|| Error::TypeMismatch {
                label: name.to_owned(),
                expected: T::TYPE,
                found: value.field_type(),
            })
    }

    /// Mutably borrow a field as `T`, reporting a type mismatch as [`Error::TypeMismatch`]
    pub fn try_read_field_mut<T: FromField>(&mut self, name: &str) -> Result<Option<&mut T>> {
        let Some(value) = self.fields.get_mut(name) else {
            return Ok(None);
        };

        let found = value.field_type();
        T::from_field_mut(value)
            .map(Some)
            .ok_or_else(|| Error::TypeMismatch {
                label: name.to_owned(),
                expected: T::TYPE,
                found,
            })
    }

    /// Insert or replace a field, returning the previous value
    ///
    /// A replaced field keeps its position, new fields are appended.
    pub fn write_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field keeping the order of the others
    ///
    /// Returns whether the field existed.
    pub fn delete_field(&mut self, name: &str) -> bool {
        self.fields.shift_remove(name).is_some()
    }
}

impl<'a> IntoIterator for &'a GffStruct {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A list of structs
#[derive(Debug, Clone, PartialEq, Default, Deref, DerefMut, From, IntoIterator)]
#[into_iterator(owned, ref, ref_mut)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GffList(Vec<GffStruct>);

impl GffList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromIterator<GffStruct> for GffList {
    fn from_iter<T: IntoIterator<Item = GffStruct>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A decoded GFF file
///
/// Dereferences to its root struct.
///
/// ```no_run
/// use nwn_common::{DataBlock, ExoString};
/// use nwn_gff::Gff;
///
/// fn creature_tag(path: &str) -> nwn_gff::error::Result<()> {
///     let file = std::fs::File::open(path)?;
///     let mut gff = Gff::read(DataBlock::map(&file)?)?;
///
///     if let Some(tag) = gff.read_field::<ExoString>("Tag") {
///         println!("{}: {}", gff.file_type, tag);
///     }
///
///     gff.write_field("Tag", "renamed");
///     std::fs::write(path, gff.to_bytes()?)?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deref, DerefMut)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gff {
    /// Tag of the kind of data stored such as `"UTC "`
    pub file_type: FourCC,

    /// The root struct
    #[deref]
    #[deref_mut]
    pub root: GffStruct,
}

impl Gff {
    /// The type id the root struct is stored with
    pub const ROOT_TYPE_ID: u32 = 0xFFFF_FFFF;

    /// Create an empty tree
    pub fn new(file_type: FourCC) -> Self {
        Self {
            file_type,
            root: GffStruct::new(Self::ROOT_TYPE_ID),
        }
    }

    /// Decode and build a tree with default options
    pub fn read<'a>(block: impl Into<DataBlock<'a>>) -> Result<Gff> {
        Self::read_with_options(block, GffReadOptions::default())
    }

    /// Decode and build a tree
    pub fn read_with_options<'a>(
        block: impl Into<DataBlock<'a>>,
        options: GffReadOptions,
    ) -> Result<Gff> {
        let raw = RawGff::read_with_options(block, options)?;
        Self::from_raw_with_options(&raw, options)
    }

    /// Build a tree from decoded tables with default options
    pub fn from_raw(raw: &RawGff<'_>) -> Result<Gff> {
        Self::from_raw_with_options(raw, GffReadOptions::default())
    }

    /// Build a tree from decoded tables, starting at struct 0
    #[instrument(skip_all, err)]
    pub fn from_raw_with_options(raw: &RawGff<'_>, options: GffReadOptions) -> Result<Gff> {
        let mut builder = TreeBuilder {
            raw,
            max_depth: options.max_depth,
            depth: 0,
            on_path: vec![false; raw.structs.len()],
        };

        let root = builder.build_struct(0, raw.struct_record(0)?)?;
        debug!(fields = root.len(), "built gff tree");

        Ok(Gff {
            file_type: raw.header.file_type,
            root,
        })
    }
}

struct TreeBuilder<'r, 'a> {
    raw: &'r RawGff<'a>,
    max_depth: usize,
    depth: usize,
    on_path: Vec<bool>,
}

impl TreeBuilder<'_, '_> {
    fn build_struct(&mut self, index: u32, record: GffStructRecord) -> Result<GffStruct> {
        if self.on_path[index as usize] {
            return Err(Error::StructCycle {
                struct_index: index,
            });
        }

        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        self.on_path[index as usize] = true;
        self.depth += 1;
        let result = self.build_fields(index, &record);
        self.depth -= 1;
        self.on_path[index as usize] = false;

        result
    }

    fn build_fields(&mut self, index: u32, record: &GffStructRecord) -> Result<GffStruct> {
        let raw = self.raw;
        let records = raw.struct_fields(record)?;
        let mut fields = IndexMap::with_capacity(records.len());

        for field in records {
            let label = raw.label_name(field.label_index)?.to_owned();
            if fields.contains_key(&label) {
                return Err(Error::DuplicateLabel {
                    struct_index: index,
                    label,
                });
            }

            trace!(struct_index = index, %label, field_type = ?field.field_type);
            let value = self.build_value(field)?;
            fields.insert(label, value);
        }

        Ok(GffStruct {
            type_id: record.type_id,
            fields,
        })
    }

    fn build_value(&mut self, field: &GffFieldRecord) -> Result<FieldValue> {
        let raw = self.raw;

        Ok(match field.field_type {
            FieldType::Byte => FieldValue::Byte(raw.construct_byte(field)),
            FieldType::Char => FieldValue::Char(raw.construct_char(field)),
            FieldType::Word => FieldValue::Word(raw.construct_word(field)),
            FieldType::Short => FieldValue::Short(raw.construct_short(field)),
            FieldType::Dword => FieldValue::Dword(raw.construct_dword(field)),
            FieldType::Int => FieldValue::Int(raw.construct_int(field)),
            FieldType::Dword64 => FieldValue::Dword64(raw.construct_dword64(field)?),
            FieldType::Int64 => FieldValue::Int64(raw.construct_int64(field)?),
            FieldType::Float => FieldValue::Float(raw.construct_float(field)),
            FieldType::Double => FieldValue::Double(raw.construct_double(field)?),
            FieldType::ExoString => FieldValue::String(raw.construct_exo_string(field)?),
            FieldType::ResRef => FieldValue::ResRef(raw.construct_resref(field)?),
            FieldType::LocString => FieldValue::LocString(raw.construct_loc_string(field)?),
            FieldType::Void => FieldValue::Void(raw.construct_void(field)?.to_vec()),
            FieldType::Struct => {
                let record = raw.construct_struct(field)?;
                FieldValue::Struct(self.build_struct(field.data_or_data_offset, record)?)
            }
            FieldType::List => {
                let elements = raw.construct_list(field)?;
                let mut list = Vec::with_capacity(elements.len());
                for element in elements {
                    let record = raw.struct_record(element)?;
                    list.push(self.build_struct(element, record)?);
                }
                FieldValue::List(GffList(list))
            }
        })
    }
}
