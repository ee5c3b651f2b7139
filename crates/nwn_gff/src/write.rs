//! Types for writing GFF files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use nwn_common::{DataBlock, FixedSize, FourCC};
use std::io::{Cursor, Seek, Write};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    read::RawGff,
    tree::{Gff, GffStruct},
    types::{GffFieldRecord, GffHeader, GffLabel, GffStructRecord},
    value::{FieldValue, LocString},
};

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(what))
}

/// Compute a header for tables stored back to back in fixed order
///
/// header, structs, fields, labels, field data, field indices, list indices
fn layout(
    file_type: FourCC,
    structs: usize,
    fields: usize,
    labels: usize,
    field_data: usize,
    field_indices: usize,
    list_indices: usize,
) -> Result<GffHeader> {
    let struct_offset = GffHeader::SIZE;
    let field_offset = struct_offset + structs * GffStructRecord::SIZE;
    let label_offset = field_offset + fields * GffFieldRecord::SIZE;
    let field_data_offset = label_offset + labels * GffLabel::SIZE;
    let field_indices_offset = field_data_offset + field_data;
    let list_indices_offset = field_indices_offset + field_indices * 4;
    to_u32(list_indices_offset + list_indices, "gff file")?;

    Ok(GffHeader {
        file_type,
        file_version: GffHeader::VERSION,
        struct_offset: struct_offset as u32,
        struct_count: to_u32(structs, "struct array")?,
        field_offset: field_offset as u32,
        field_count: to_u32(fields, "field array")?,
        label_offset: label_offset as u32,
        label_count: to_u32(labels, "label array")?,
        field_data_offset: field_data_offset as u32,
        field_data_count: to_u32(field_data, "field data block")?,
        field_indices_offset: field_indices_offset as u32,
        field_indices_count: to_u32(field_indices * 4, "field indices array")?,
        list_indices_offset: list_indices_offset as u32,
        list_indices_count: to_u32(list_indices, "list indices block")?,
    })
}

impl RawGff<'_> {
    /// Write the tables back to back, recomputing the header offsets
    ///
    /// The file type is kept from [`RawGff::header`], the version is always `"V3.2"`.
    #[instrument(skip_all, err)]
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let header = layout(
            self.header.file_type,
            self.structs.len(),
            self.fields.len(),
            self.labels.len(),
            self.field_data.len(),
            self.field_indices.len(),
            self.list_indices.len(),
        )?;

        header.write(writer)?;
        self.structs.write(writer)?;
        self.fields.write(writer)?;
        self.labels.write(writer)?;
        writer.write_all(&self.field_data)?;
        self.field_indices.write_le(writer)?;
        writer.write_all(&self.list_indices)?;

        Ok(())
    }

    /// Serialize the tables into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// Flattens a tree into fresh tables
///
/// Structs are numbered depth first with the root at index 0. Labels are shared by every struct
/// using them.
#[derive(Debug, Default)]
struct TreeEncoder {
    labels: IndexSet<String>,
    structs: Vec<GffStructRecord>,
    fields: Vec<GffFieldRecord>,
    field_data: Vec<u8>,
    field_indices: Vec<u32>,
    list_indices: Vec<u8>,
}

impl TreeEncoder {
    fn label(&mut self, name: &str) -> Result<u32> {
        if let Some(index) = self.labels.get_index_of(name) {
            return Ok(index as u32);
        }

        if name.len() > GffLabel::MAX_LEN {
            return Err(Error::LabelTooLong(name.to_owned()));
        }

        let (index, _) = self.labels.insert_full(name.to_owned());
        to_u32(index, "label array")
    }

    fn encode_struct(&mut self, value: &GffStruct) -> Result<u32> {
        let struct_index = to_u32(self.structs.len(), "struct array")?;
        let field_count = to_u32(value.len(), "struct")?;
        self.structs.push(GffStructRecord {
            type_id: value.type_id(),
            data_or_data_offset: GffStructRecord::NO_FIELDS,
            field_count,
        });

        // field slots and the field index run of one struct are reserved before its children
        let first_field = self.fields.len();
        self.fields
            .resize(first_field + value.len(), GffFieldRecord::default());

        let data_or_data_offset = match value.len() {
            0 => GffStructRecord::NO_FIELDS,
            1 => to_u32(first_field, "field array")?,
            count => {
                let offset = to_u32(self.field_indices.len() * 4, "field indices array")?;
                for index in first_field..first_field + count {
                    self.field_indices.push(to_u32(index, "field array")?);
                }
                offset
            }
        };
        self.structs[struct_index as usize].data_or_data_offset = data_or_data_offset;

        for (slot, (name, field)) in value.iter().enumerate() {
            let record = self.encode_field(name, field)?;
            self.fields[first_field + slot] = record;
        }

        Ok(struct_index)
    }

    fn encode_field(&mut self, name: &str, value: &FieldValue) -> Result<GffFieldRecord> {
        let label_index = self.label(name)?;

        let data_or_data_offset = match value {
            FieldValue::Byte(v) => *v as u32,
            FieldValue::Char(v) => *v as u8 as u32,
            FieldValue::Word(v) => *v as u32,
            FieldValue::Short(v) => *v as u16 as u32,
            FieldValue::Dword(v) => *v,
            FieldValue::Int(v) => *v as u32,
            FieldValue::Float(v) => v.to_bits(),
            FieldValue::Dword64(v) => self.append_data(|data| data.write_u64::<LittleEndian>(*v))?,
            FieldValue::Int64(v) => self.append_data(|data| data.write_i64::<LittleEndian>(*v))?,
            FieldValue::Double(v) => self.append_data(|data| data.write_f64::<LittleEndian>(*v))?,
            FieldValue::String(v) => {
                let len = to_u32(v.len(), "string")?;
                self.append_data(|data| {
                    data.write_u32::<LittleEndian>(len)?;
                    data.write_all(v)
                })?
            }
            FieldValue::ResRef(v) => self.append_data(|data| {
                data.write_u8(v.len() as u8)?;
                data.write_all(&v.to_raw())
            })?,
            FieldValue::LocString(v) => {
                let total = loc_string_size(v)?;
                self.append_data(|data| {
                    data.write_u32::<LittleEndian>(total)?;
                    data.write_u32::<LittleEndian>(v.str_ref.0)?;
                    data.write_u32::<LittleEndian>(v.substrings.len() as u32)?;
                    for entry in &v.substrings {
                        data.write_i32::<LittleEndian>(entry.id)?;
                        data.write_u32::<LittleEndian>(entry.string.len() as u32)?;
                        data.write_all(&entry.string)?;
                    }
                    Ok(())
                })?
            }
            FieldValue::Void(v) => {
                let len = to_u32(v.len(), "void")?;
                self.append_data(|data| {
                    data.write_u32::<LittleEndian>(len)?;
                    data.write_all(v)
                })?
            }
            FieldValue::Struct(v) => self.encode_struct(v)?,
            FieldValue::List(v) => {
                let mut elements = Vec::with_capacity(v.len());
                for element in v.iter() {
                    elements.push(self.encode_struct(element)?);
                }

                let offset = to_u32(self.list_indices.len(), "list indices block")?;
                self.list_indices
                    .write_u32::<LittleEndian>(to_u32(elements.len(), "list")?)?;
                for element in elements {
                    self.list_indices.write_u32::<LittleEndian>(element)?;
                }
                offset
            }
        };

        Ok(GffFieldRecord {
            field_type: value.field_type(),
            label_index,
            data_or_data_offset,
        })
    }

    /// Append to the end of the field data block, returning where the value starts
    fn append_data(
        &mut self,
        write: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    ) -> Result<u32> {
        let offset = to_u32(self.field_data.len(), "field data block")?;
        write(&mut self.field_data)?;
        Ok(offset)
    }

    fn finish(self, file_type: FourCC) -> Result<RawGff<'static>> {
        let header = layout(
            file_type,
            self.structs.len(),
            self.fields.len(),
            self.labels.len(),
            self.field_data.len(),
            self.field_indices.len(),
            self.list_indices.len(),
        )?;

        let labels = self
            .labels
            .iter()
            .map(|name| GffLabel::new(name))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            structs = self.structs.len(),
            fields = self.fields.len(),
            labels = labels.len(),
            field_data = self.field_data.len(),
            "encoded gff tables"
        );

        Ok(RawGff {
            header,
            structs: self.structs,
            fields: self.fields,
            labels,
            field_data: DataBlock::from(self.field_data),
            field_indices: self.field_indices,
            list_indices: DataBlock::from(self.list_indices),
        })
    }
}

/// Bytes following the size field of a stored localized string
fn loc_string_size(value: &LocString) -> Result<u32> {
    let size = value
        .substrings
        .iter()
        .fold(8usize, |size, entry| size + 8 + entry.string.len());
    to_u32(size, "localized string")
}

impl Gff {
    /// Flatten the tree into fresh tables
    ///
    /// Struct 0 is the root, labels are deduplicated across the whole tree.
    #[instrument(skip(self), err)]
    pub fn to_raw(&self) -> Result<RawGff<'static>> {
        let mut encoder = TreeEncoder::default();
        encoder.encode_struct(&self.root)?;
        encoder.finish(self.file_type)
    }

    /// Serialize the tree into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_raw()?.to_bytes()
    }

    /// Serialize the tree into `writer`
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        self.to_raw()?.write(writer)
    }
}

#[cfg(test)]
mod test {
    use nwn_common::{ExoString, FourCC, ResRef, StrRef};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::tree::{Gff, GffList, GffStruct};
    use crate::types::{FieldType, GffStructRecord};
    use crate::value::{LocString, LocSubString};

    #[traced_test]
    #[test]
    fn single_tag_layout() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x55, 0x54, 0x43, 0x20, 0x56, 0x33, 0x2E, 0x32,
            0x38, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x44, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x50, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x60, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x6A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            b'T', b'a', b'g', 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x06, 0x00, 0x00, 0x00, b'm', b'y', b'_', b't', b'a', b'g',
        ];

        let mut gff = Gff::new(FourCC::new(b"UTC "));
        gff.write_field("Tag", "my_tag");

        assert_eq!(gff.to_bytes()?, expected);

        Ok(())
    }

    #[test]
    fn many_fields_use_field_indices() -> Result<()> {
        let mut gff = Gff::new(FourCC::new(b"UTC "));
        gff.write_field("A", 1u8);
        gff.write_field("B", -2i16);
        gff.write_field("C", 3u32);

        let raw = gff.to_raw()?;

        assert_eq!(raw.structs.len(), 1);
        assert_eq!(raw.structs[0].field_count, 3);
        assert_eq!(raw.structs[0].data_or_data_offset, 0);
        assert_eq!(raw.field_indices, vec![0, 1, 2]);
        assert_eq!(raw.header.field_indices_count, 12);

        let labels: Vec<_> = raw
            .struct_fields(&raw.structs[0])?
            .iter()
            .map(|field| raw.labels[field.label_index as usize].name().into_owned())
            .collect();
        assert_eq!(labels, vec!["A", "B", "C"]);

        Ok(())
    }

    #[test]
    fn parent_field_indices_precede_children() -> Result<()> {
        let mut child = GffStruct::new(1);
        child.write_field("X", 1u8);
        child.write_field("Y", 2u8);

        let mut gff = Gff::new(FourCC::new(b"GFF "));
        gff.write_field("Child", child);
        gff.write_field("Z", 3u8);

        let raw = gff.to_raw()?;

        assert_eq!(raw.structs.len(), 2);
        assert_eq!(raw.structs[0].data_or_data_offset, 0);
        assert_eq!(raw.structs[1].data_or_data_offset, 8);
        assert_eq!(raw.field_indices, vec![0, 1, 2, 3]);
        assert_eq!(Gff::from_raw(&raw)?, gff);

        Ok(())
    }

    #[test]
    fn empty_struct_uses_sentinel() -> Result<()> {
        let gff = Gff::new(FourCC::new(b"IFO "));
        let raw = gff.to_raw()?;

        assert_eq!(
            raw.structs,
            vec![GffStructRecord {
                type_id: Gff::ROOT_TYPE_ID,
                data_or_data_offset: GffStructRecord::NO_FIELDS,
                field_count: 0
            }]
        );
        assert!(Gff::from_raw(&raw)?.is_empty());

        Ok(())
    }

    #[test]
    fn labels_are_shared() -> Result<()> {
        let mut gff = Gff::new(FourCC::new(b"GIT "));
        let list: GffList = (0..5)
            .map(|i| {
                let mut element = GffStruct::new(i);
                element.write_field("Name", format!("creature_{i}"));
                element
            })
            .collect();
        gff.write_field("Creatures", list);

        let raw = gff.to_raw()?;
        assert_eq!(raw.labels.len(), 2);
        assert_eq!(raw.structs.len(), 6);

        let decoded = Gff::from_raw(&raw)?;
        let creatures = decoded.read_field::<GffList>("Creatures").unwrap();
        for (i, creature) in creatures.iter().enumerate() {
            assert_eq!(creature.type_id(), i as u32);
            assert_eq!(
                creature.read_field::<ExoString>("Name").unwrap().to_string(),
                format!("creature_{i}")
            );
        }

        Ok(())
    }

    #[test]
    fn list_indices_layout() -> Result<()> {
        let mut gff = Gff::new(FourCC::new(b"UTI "));
        gff.write_field(
            "Props",
            GffList::from(vec![GffStruct::new(7), GffStruct::new(8)]),
        );

        let raw = gff.to_raw()?;
        #[rustfmt::skip]
        let expected = [
            0x02, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
        ];
        assert_eq!(&*raw.list_indices, &expected);
        assert_eq!(raw.fields[0].field_type, FieldType::List);
        assert_eq!(raw.fields[0].data_or_data_offset, 0);

        Ok(())
    }

    #[test]
    fn wide_field_data_layout() -> Result<()> {
        let mut gff = Gff::new(FourCC::new(b"UTI "));
        gff.write_field("Ref", ResRef::try_from("abc").unwrap());
        gff.write_field(
            "Name",
            LocString {
                str_ref: StrRef(3),
                substrings: vec![LocSubString::new(0, false, "hi")],
            },
        );

        let raw = gff.to_raw()?;

        #[rustfmt::skip]
        let expected = [
            0x03, b'a', b'b', b'c', 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00,
            0x12, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, b'h', b'i',
        ];
        assert_eq!(&*raw.field_data, &expected);
        assert_eq!(raw.fields[1].data_or_data_offset, 17);

        Ok(())
    }

    #[test]
    fn long_labels_are_rejected() {
        let mut gff = Gff::new(FourCC::new(b"UTC "));
        gff.write_field("ThisLabelIsTooLong", 1u8);

        assert!(matches!(gff.to_raw(), Err(Error::LabelTooLong(_))));
    }

    #[test]
    fn raw_write_recomputes_offsets() -> Result<()> {
        let mut gff = Gff::new(FourCC::new(b"UTC "));
        gff.write_field("Tag", "my_tag");

        let mut raw = gff.to_raw()?;
        raw.header.struct_offset = 0x1000;

        let bytes = raw.to_bytes()?;
        assert_eq!(bytes, gff.to_bytes()?);

        Ok(())
    }
}
