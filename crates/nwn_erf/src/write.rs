//! Types for writing ERF archives
//!

use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use nwn_common::{ExoString, FixedSize, FourCC, ResRef, ResourceType, StrRef};
use std::io::{self, Cursor, Seek, Write};
use tracing::{debug, instrument, Level};

use crate::{
    archive::Erf,
    error::{Error, Result},
    types::{ErfDescription, ErfHeader, ErfKey, ErfResourceEntry},
};

/// Options for how the ERF file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct ErfWriterOptions {
    /// File type tag of the archive
    #[builder(default = ErfHeader::ERF)]
    pub file_type: FourCC,

    /// Years since 1900
    #[builder(default)]
    pub build_year: u32,

    /// Days since January 1st
    #[builder(default)]
    pub build_day: u32,

    /// String table entry describing the archive
    #[builder(default = StrRef::NONE)]
    pub description_str_ref: StrRef,
}

impl Default for ErfWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(what))
}

/// ERF archive generator
///
/// Resource bytes are collected until [`ErfWriter::finish`], which lays out the header, the
/// description list, the key list, the resource list and the data in that order.
///
/// ```
/// # fn doit() -> nwn_erf::error::Result<()>
/// # {
/// use nwn_common::{ResRef, ResourceType};
/// use nwn_erf::{ErfHeader, ErfWriter, ErfWriterOptions};
/// use std::io::Write;
///
/// let mut erf = ErfWriter::new(
///     std::io::Cursor::new(Vec::new()),
///     ErfWriterOptions::builder().file_type(ErfHeader::HAK).build(),
/// );
///
/// erf.start_file(ResRef::try_from("hello")?, ResourceType(10))?;
/// erf.write_all(b"Hello, World!")?;
///
/// let bytes = erf.finish()?.into_inner();
/// assert_eq!(&bytes[..4], b"HAK ");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct ErfWriter<W: Write + Seek> {
    inner: W,
    header: ErfHeader,
    descriptions: Vec<ErfDescription>,
    keys: Vec<ErfKey>,
    resources: Vec<ErfResourceEntry>,
    data_block: Vec<u8>,
    current_start: Option<usize>,
}

impl<W: Write + Seek> ErfWriter<W> {
    /// Initializes the archive.
    ///
    /// Before writing to this object, the [`ErfWriter::start_file`] function should be called.
    pub fn new(inner: W, options: ErfWriterOptions) -> ErfWriter<W> {
        ErfWriter {
            inner,
            header: ErfHeader {
                file_type: options.file_type,
                build_year: options.build_year,
                build_day: options.build_day,
                description_str_ref: options.description_str_ref,
                ..Default::default()
            },
            descriptions: Vec::new(),
            keys: Vec::new(),
            resources: Vec::new(),
            data_block: Vec::new(),
            current_start: None,
        }
    }

    /// Returns true if a file is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.current_start.is_some()
    }

    /// Add a localized description of the archive
    pub fn add_description(&mut self, language_id: u32, text: impl Into<ExoString>) {
        self.descriptions.push(ErfDescription {
            language_id,
            text: text.into(),
        });
    }

    /// Start a new resource, finishing the previous one
    #[instrument(skip(self), err)]
    pub fn start_file(&mut self, resref: ResRef, res_type: ResourceType) -> Result<()> {
        if self.is_writing_file() {
            self.finish_file()?;
        }

        self.keys.push(ErfKey {
            resref: resref.to_raw(),
            res_id: to_u32(self.keys.len(), "key list")?,
            res_type,
            reserved: 0,
        });
        self.resources.push(ErfResourceEntry {
            offset: to_u32(self.data_block.len(), "resource data")?,
            size: 0,
        });
        self.current_start = Some(self.data_block.len());

        Ok(())
    }

    fn finish_file(&mut self) -> Result<()> {
        if let (Some(start), Some(entry)) = (self.current_start.take(), self.resources.last_mut())
        {
            entry.size = to_u32(self.data_block.len() - start, "resource")?;
        }

        Ok(())
    }

    /// Finish the last file and write all other ERF file structures
    ///
    /// This will return the writer, but one should normally not append any data to the end of the file.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        self.finish_file()?;

        let entries = self.keys.len();
        let localized_string_size: usize =
            self.descriptions.iter().map(ErfDescription::stored_size).sum();

        let header_end = ErfHeader::SIZE;
        let key_list = header_end + localized_string_size;
        let resource_list = key_list + entries * ErfKey::SIZE;
        let data_start = to_u32(resource_list + entries * ErfResourceEntry::SIZE, "resource list")?;

        self.header.language_count = to_u32(self.descriptions.len(), "description list")?;
        self.header.localized_string_size = to_u32(localized_string_size, "description list")?;
        self.header.entry_count = to_u32(entries, "key list")?;
        self.header.offset_to_localized_string = to_u32(header_end, "description list")?;
        self.header.offset_to_key_list = to_u32(key_list, "key list")?;
        self.header.offset_to_resource_list = to_u32(resource_list, "resource list")?;

        self.header.write(&mut self.inner)?;

        for description in &self.descriptions {
            self.inner.write_u32::<LittleEndian>(description.language_id)?;
            self.inner
                .write_u32::<LittleEndian>(to_u32(description.text.len(), "description")?)?;
            self.inner.write_all(description.text.as_bytes())?;
        }

        for key in &self.keys {
            key.write(&mut self.inner)?;
        }

        for entry in &self.resources {
            let offset = data_start
                .checked_add(entry.offset)
                .ok_or(Error::TooLarge("resource data"))?;
            ErfResourceEntry {
                offset,
                size: entry.size,
            }
            .write(&mut self.inner)?;
        }

        self.inner.write_all(&self.data_block)?;

        debug!(
            file_type = %self.header.file_type,
            entries,
            data = self.data_block.len(),
            "wrote erf archive"
        );

        Ok(self.inner)
    }
}

impl<W: Write + Seek> Write for ErfWriter<W> {
    #[instrument(skip_all, err, ret(level = Level::TRACE), fields(size=buf.len()))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.is_writing_file() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            ));
        }
        Write::write(&mut self.data_block, buf)
    }

    #[instrument(skip(self), err)]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Erf<'_> {
    /// Write the archive, recomputing every offset
    pub fn write<W: Write + Seek>(&self, inner: W) -> Result<W> {
        let mut writer = ErfWriter::new(
            inner,
            ErfWriterOptions::builder()
                .file_type(self.file_type)
                .build_year(self.build_year)
                .build_day(self.build_day)
                .description_str_ref(self.description_str_ref)
                .build(),
        );

        for description in &self.descriptions {
            writer.add_description(description.language_id, description.text.clone());
        }

        for resource in &self.resources {
            writer.start_file(resource.resref, resource.res_type)?;
            writer.write_all(&resource.data)?;
        }

        writer.finish()
    }

    /// Write the archive to a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write(Cursor::new(Vec::new()))?.into_inner())
    }
}

#[cfg(test)]
mod test {
    use nwn_common::{ResRef, ResourceType, StrRef};
    use pretty_assertions::assert_str_eq;
    use std::io::{Cursor, Write};
    use tracing_test::traced_test;

    use crate::error::Result;
    use crate::types::ErfHeader;
    use crate::write::{ErfWriter, ErfWriterOptions};

    #[traced_test]
    #[test]
    fn empty_write() -> Result<()> {
        let mut expected = vec![0u8; 160];
        expected[..8].copy_from_slice(b"ERF V1.0");
        expected[20..32].copy_from_slice(&[0xA0, 0, 0, 0, 0xA0, 0, 0, 0, 0xA0, 0, 0, 0]);
        expected[40..44].copy_from_slice(&[0xFF; 4]);

        let writer = ErfWriter::new(Cursor::new(Vec::new()), ErfWriterOptions::default());
        let result = writer.finish()?;

        assert_str_eq!(
            format!("{:02X?}", *result.get_ref()),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn single_resource_write() -> Result<()> {
        #[rustfmt::skip]
        let expected_tail: Vec<u8> = vec![
            // Description
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x68, 0x69,
            // Key
            0x61, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x0A, 0x00,
            0x00, 0x00,
            // Resource
            0xCA, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            // Data
            0x31, 0x32, 0x33,
        ];

        let mut writer = ErfWriter::new(
            Cursor::new(Vec::new()),
            ErfWriterOptions::builder()
                .build_year(124)
                .description_str_ref(StrRef(7))
                .build(),
        );
        writer.add_description(0, "hi");
        writer.start_file(ResRef::try_from("a")?, ResourceType(10))?;
        writer.write_all(b"123")?;

        let bytes = writer.finish()?.into_inner();

        #[rustfmt::skip]
        let header_counts: Vec<u8> = vec![
            0x01, 0x00, 0x00, 0x00,
            0x0A, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xA0, 0x00, 0x00, 0x00,
            0xAA, 0x00, 0x00, 0x00,
            0xC2, 0x00, 0x00, 0x00,
            0x7C, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x00, 0x00,
        ];

        assert_eq!(&bytes[8..44], header_counts.as_slice());
        assert_str_eq!(
            format!("{:02X?}", &bytes[160..]),
            format!("{:02X?}", expected_tail)
        );

        Ok(())
    }

    #[test]
    fn write_without_file() {
        let mut writer = ErfWriter::new(Cursor::new(Vec::new()), ErfWriterOptions::default());
        assert!(writer.write_all(b"orphan").is_err());
    }

    #[test]
    fn empty_resources_keep_their_slot() -> Result<()> {
        let mut writer = ErfWriter::new(
            Cursor::new(Vec::new()),
            ErfWriterOptions::builder().file_type(ErfHeader::SAV).build(),
        );
        writer.start_file(ResRef::try_from("empty")?, ResourceType(1))?;
        writer.start_file(ResRef::try_from("full")?, ResourceType(1))?;
        writer.write_all(b"x")?;

        let bytes = writer.finish()?.into_inner();
        let raw = crate::read::RawErf::read(bytes.as_slice())?;

        assert_eq!(raw.resources[0].size, 0);
        assert_eq!(raw.resources[0].offset, raw.resources[1].offset);
        assert_eq!(&*raw.resource_data(1)?, b"x");

        Ok(())
    }
}
