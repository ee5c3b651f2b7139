//! Types for reading the raw tables of GFF files
//!

use bon::Builder;
use nwn_common::{DataBlock, ExoString, OffsetReader, ResRef, StrRef};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    types::{FieldType, GffFieldRecord, GffHeader, GffLabel, GffStructRecord},
    value::{LocString, LocSubString},
};

/// Options for how a GFF file should be decoded
#[derive(Debug, Clone, Copy, Builder)]
pub struct GffReadOptions {
    /// Check every cross-table reference while decoding instead of when it is followed
    #[builder(default)]
    pub strict: bool,

    /// Maximum nesting of structs when building a tree
    #[builder(default = 128)]
    pub max_depth: usize,
}

impl Default for GffReadOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The six tables of a GFF file as stored
///
/// Records are decoded into owned vectors, the field data and list indices blocks stay views of
/// the source buffer. Offsets stored in records are only followed by the `construct_*` methods.
///
/// ```
/// # fn doit() -> nwn_gff::error::Result<()> {
/// use nwn_gff::{Gff, RawGff};
///
/// let mut gff = Gff::new(nwn_common::FourCC::new(b"UTC "));
/// gff.write_field("Tag", "my_tag");
/// let bytes = gff.to_bytes()?;
///
/// let raw = RawGff::read(bytes.as_slice())?;
/// let root = raw.struct_record(0)?;
/// let field = raw.struct_fields(&root)?[0];
///
/// assert_eq!(raw.label_name(field.label_index)?, "Tag");
/// assert_eq!(raw.construct_exo_string(field)?, "my_tag");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawGff<'a> {
    /// The header as read
    pub header: GffHeader,

    /// Struct array
    pub structs: Vec<GffStructRecord>,

    /// Field array
    pub fields: Vec<GffFieldRecord>,

    /// Label array
    pub labels: Vec<GffLabel>,

    /// Field data block
    pub field_data: DataBlock<'a>,

    /// Field indices array
    pub field_indices: Vec<u32>,

    /// List indices block
    pub list_indices: DataBlock<'a>,
}

impl<'a> RawGff<'a> {
    /// Decode the header and tables of a GFF file
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<RawGff<'a>> {
        Self::read_with_options(block, GffReadOptions::default())
    }

    /// Decode the header and tables of a GFF file
    ///
    /// With [`GffReadOptions::strict`] every reference is checked through [`RawGff::validate`].
    #[instrument(skip_all, err)]
    pub fn read_with_options(
        block: impl Into<DataBlock<'a>>,
        options: GffReadOptions,
    ) -> Result<RawGff<'a>> {
        let block = block.into();
        let reader = block.reader();

        let header: GffHeader = reader.read(0)?;
        if header.file_version != GffHeader::VERSION {
            return Err(Error::VersionMismatch {
                file_type: header.file_type,
                found: header.file_version,
                expected: GffHeader::VERSION,
            });
        }

        let raw = RawGff {
            structs: reader.read_array(
                header.struct_offset as usize,
                header.struct_count as usize,
            )?,
            fields: reader.read_array(header.field_offset as usize, header.field_count as usize)?,
            labels: reader.read_array(header.label_offset as usize, header.label_count as usize)?,
            field_data: block.slice(
                header.field_data_offset as usize,
                header.field_data_count as usize,
            )?,
            field_indices: reader.read_array(
                header.field_indices_offset as usize,
                header.field_indices_count as usize / 4,
            )?,
            list_indices: block.slice(
                header.list_indices_offset as usize,
                header.list_indices_count as usize,
            )?,
            header,
        };

        debug!(
            file_type = %header.file_type,
            structs = raw.structs.len(),
            fields = raw.fields.len(),
            labels = raw.labels.len(),
            field_data = raw.field_data.len(),
            "decoded gff tables"
        );

        if options.strict {
            raw.validate()?;
        }

        Ok(raw)
    }

    /// Detach the tables from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> RawGff<'static> {
        RawGff {
            header: self.header,
            structs: self.structs,
            fields: self.fields,
            labels: self.labels,
            field_data: self.field_data.into_owned(),
            field_indices: self.field_indices,
            list_indices: self.list_indices.into_owned(),
        }
    }

    /// The struct record at `index`
    pub fn struct_record(&self, index: u32) -> Result<GffStructRecord> {
        self.structs
            .get(index as usize)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                table: "struct",
                index,
                count: self.structs.len(),
            })
    }

    /// The field record at `index`
    pub fn field(&self, index: u32) -> Result<&GffFieldRecord> {
        self.fields.get(index as usize).ok_or(Error::IndexOutOfRange {
            table: "field",
            index,
            count: self.fields.len(),
        })
    }

    /// The label at `index`
    pub fn label(&self, index: u32) -> Result<&GffLabel> {
        self.labels.get(index as usize).ok_or(Error::IndexOutOfRange {
            table: "label",
            index,
            count: self.labels.len(),
        })
    }

    /// The field name stored at `index` of the label array
    pub fn label_name(&self, index: u32) -> Result<&str> {
        let label = self.label(index)?;
        label.to_str().ok_or_else(|| Error::InvalidLabel {
            index,
            bytes: label.as_bytes().to_vec(),
        })
    }

    /// The field records of a struct in stored order
    ///
    /// A struct with a field count but `0xFFFFFFFF` as its offset is treated as empty.
    pub fn struct_fields(&self, record: &GffStructRecord) -> Result<Vec<&GffFieldRecord>> {
        match record.field_count {
            0 => Ok(Vec::new()),
            _ if record.data_or_data_offset == GffStructRecord::NO_FIELDS => {
                debug!(
                    field_count = record.field_count,
                    "struct without field offset, treating as empty"
                );
                Ok(Vec::new())
            }
            1 => Ok(vec![self.field(record.data_or_data_offset)?]),
            count => {
                let start = record.data_or_data_offset as usize / 4;
                let indices = start
                    .checked_add(count as usize)
                    .and_then(|end| self.field_indices.get(start..end))
                    .ok_or(Error::IndexOutOfRange {
                        table: "field indices",
                        index: record.data_or_data_offset,
                        count: self.field_indices.len(),
                    })?;

                indices.iter().map(|index| self.field(*index)).collect()
            }
        }
    }

    /// Check that every reference in the tables can be followed
    ///
    /// Type tags are checked when the field array is decoded; this covers labels, field index
    /// runs, struct and list references and field data offsets.
    #[instrument(skip(self), err)]
    pub fn validate(&self) -> Result<()> {
        for record in &self.structs {
            self.struct_fields(record)?;
        }

        for field in &self.fields {
            self.label_name(field.label_index)?;

            match field.field_type {
                FieldType::Dword64 => self.construct_dword64(field).map(drop)?,
                FieldType::Int64 => self.construct_int64(field).map(drop)?,
                FieldType::Double => self.construct_double(field).map(drop)?,
                FieldType::ExoString => self.construct_exo_string(field).map(drop)?,
                FieldType::ResRef => self.construct_resref(field).map(drop)?,
                FieldType::LocString => self.construct_loc_string(field).map(drop)?,
                FieldType::Void => self.construct_void(field).map(drop)?,
                FieldType::Struct => self.construct_struct(field).map(drop)?,
                FieldType::List => {
                    for element in self.construct_list(field)? {
                        self.struct_record(element)?;
                    }
                }
                _ => (),
            }
        }

        Ok(())
    }

    fn data_reader(&self) -> OffsetReader<'_> {
        self.field_data.reader()
    }

    /// Read a [`FieldType::Byte`] field
    pub fn construct_byte(&self, field: &GffFieldRecord) -> u8 {
        inline_bytes(field, FieldType::Byte)[0]
    }

    /// Read a [`FieldType::Char`] field
    pub fn construct_char(&self, field: &GffFieldRecord) -> i8 {
        inline_bytes(field, FieldType::Char)[0] as i8
    }

    /// Read a [`FieldType::Word`] field
    pub fn construct_word(&self, field: &GffFieldRecord) -> u16 {
        let [lo, hi, ..] = inline_bytes(field, FieldType::Word);
        u16::from_le_bytes([lo, hi])
    }

    /// Read a [`FieldType::Short`] field
    pub fn construct_short(&self, field: &GffFieldRecord) -> i16 {
        let [lo, hi, ..] = inline_bytes(field, FieldType::Short);
        i16::from_le_bytes([lo, hi])
    }

    /// Read a [`FieldType::Dword`] field
    pub fn construct_dword(&self, field: &GffFieldRecord) -> u32 {
        u32::from_le_bytes(inline_bytes(field, FieldType::Dword))
    }

    /// Read a [`FieldType::Int`] field
    pub fn construct_int(&self, field: &GffFieldRecord) -> i32 {
        i32::from_le_bytes(inline_bytes(field, FieldType::Int))
    }

    /// Read a [`FieldType::Float`] field
    pub fn construct_float(&self, field: &GffFieldRecord) -> f32 {
        f32::from_le_bytes(inline_bytes(field, FieldType::Float))
    }

    /// Read a [`FieldType::Dword64`] field from the field data block
    pub fn construct_dword64(&self, field: &GffFieldRecord) -> Result<u64> {
        let offset = data_offset(field, FieldType::Dword64);
        Ok(self.data_reader().read_u64(offset)?)
    }

    /// Read a [`FieldType::Int64`] field from the field data block
    pub fn construct_int64(&self, field: &GffFieldRecord) -> Result<i64> {
        let offset = data_offset(field, FieldType::Int64);
        Ok(self.data_reader().read_i64(offset)?)
    }

    /// Read a [`FieldType::Double`] field from the field data block
    pub fn construct_double(&self, field: &GffFieldRecord) -> Result<f64> {
        let offset = data_offset(field, FieldType::Double);
        Ok(self.data_reader().read_f64(offset)?)
    }

    /// Read a [`FieldType::ExoString`] field from the field data block
    pub fn construct_exo_string(&self, field: &GffFieldRecord) -> Result<ExoString> {
        let offset = data_offset(field, FieldType::ExoString);
        let (bytes, _) = self.data_reader().read_sized_u32(offset)?;
        Ok(ExoString::from(bytes))
    }

    /// Read a [`FieldType::ResRef`] field from the field data block
    pub fn construct_resref(&self, field: &GffFieldRecord) -> Result<ResRef> {
        let offset = data_offset(field, FieldType::ResRef);
        let reader = self.data_reader();

        let len = reader.read_u8(offset)? as usize;
        if len > ResRef::MAX_LEN {
            return Err(Error::ResRefLength(len));
        }

        let bytes = reader.read_bytes(offset + 1, len)?;
        ResRef::new(bytes).map_err(|err| Error::ResRefLength(err.0))
    }

    /// Read a [`FieldType::LocString`] field from the field data block
    ///
    /// Substrings are read from within the stored total size only.
    pub fn construct_loc_string(&self, field: &GffFieldRecord) -> Result<LocString> {
        let offset = data_offset(field, FieldType::LocString);
        let (payload, _) = self.data_reader().read_sized_u32(offset)?;
        let reader = OffsetReader::new(payload);

        let str_ref = StrRef(reader.read_u32(0)?);
        let count = reader.read_u32(4)?;

        let mut position = 8;
        let mut substrings = Vec::with_capacity((count as usize).min(payload.len() / 8));
        for _ in 0..count {
            let id = reader.read_i32(position)?;
            let (bytes, next) = reader.read_sized_u32(position + 4)?;
            substrings.push(LocSubString {
                id,
                string: ExoString::from(bytes),
            });
            position = next;
        }

        Ok(LocString {
            str_ref,
            substrings,
        })
    }

    /// Read a [`FieldType::Void`] field as a view of the field data block
    pub fn construct_void(&self, field: &GffFieldRecord) -> Result<DataBlock<'a>> {
        let offset = data_offset(field, FieldType::Void);
        let len = self.data_reader().read_u32(offset)? as usize;
        Ok(self.field_data.slice(offset + 4, len)?)
    }

    /// Read a [`FieldType::Struct`] field, one level deep
    pub fn construct_struct(&self, field: &GffFieldRecord) -> Result<GffStructRecord> {
        expect_type(field, FieldType::Struct);
        self.struct_record(field.data_or_data_offset)
    }

    /// Read a [`FieldType::List`] field as the struct indices of its elements
    pub fn construct_list(&self, field: &GffFieldRecord) -> Result<Vec<u32>> {
        expect_type(field, FieldType::List);

        let offset = field.data_or_data_offset as usize;
        let reader = self.list_indices.reader();
        let count = reader.read_u32(offset)?;
        Ok(reader.read_array(offset + 4, count as usize)?)
    }
}

fn expect_type(field: &GffFieldRecord, expected: FieldType) {
    assert_eq!(
        field.field_type, expected,
        "requested a {expected:?} from a {:?} field",
        field.field_type
    );
}

fn inline_bytes(field: &GffFieldRecord, expected: FieldType) -> [u8; 4] {
    expect_type(field, expected);
    field.data_or_data_offset.to_le_bytes()
}

fn data_offset(field: &GffFieldRecord, expected: FieldType) -> usize {
    expect_type(field, expected);
    field.data_or_data_offset as usize
}
