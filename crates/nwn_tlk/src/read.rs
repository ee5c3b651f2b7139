//! Types for reading TLK files
//!

use nwn_common::{DataBlock, FixedSize};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    types::{TlkFlags, TlkHeader, TlkStringData},
};

/// The tables of a TLK file as stored
#[derive(Debug, Clone, PartialEq)]
pub struct RawTlk<'a> {
    /// The header as read
    pub header: TlkHeader,

    /// String data table, one entry per StrRef
    pub string_data: Vec<TlkStringData>,

    /// Everything from the start of the string block
    pub strings: DataBlock<'a>,
}

impl<'a> RawTlk<'a> {
    /// Decode the header and string data table of a TLK file
    #[instrument(skip_all, err)]
    pub fn read(block: impl Into<DataBlock<'a>>) -> Result<RawTlk<'a>> {
        let block = block.into();
        let reader = block.reader();

        let header: TlkHeader = reader.read(0)?;
        if header.file_type != TlkHeader::FILE_TYPE || header.file_version != TlkHeader::VERSION {
            return Err(Error::InvalidHeader {
                file_type: header.file_type,
                version: header.file_version,
            });
        }

        let string_data: Vec<TlkStringData> =
            reader.read_array(TlkHeader::SIZE, header.string_count as usize)?;
        let strings = block.slice_from(header.string_entries_offset as usize)?;

        debug!(
            language = header.language_id,
            entries = string_data.len(),
            strings = strings.len(),
            "decoded tlk tables"
        );

        Ok(RawTlk {
            header,
            string_data,
            strings,
        })
    }

    /// The text bytes of the entry at position `index`
    ///
    /// `None` when the entry has no text or `index` is past the table.
    pub fn text(&self, index: usize) -> Result<Option<&[u8]>> {
        let Some(data) = self.string_data.get(index) else {
            return Ok(None);
        };
        if !data.flags.contains(TlkFlags::TEXT_PRESENT) {
            return Ok(None);
        }

        let start = data.offset_to_string as usize;
        self.strings
            .get(start..start + data.string_size as usize)
            .map(Some)
            .ok_or(Error::TextOutOfRange {
                index,
                offset: data.offset_to_string,
                size: data.string_size,
            })
    }

    /// Detach from the lifetime of a borrowed buffer
    pub fn into_owned(self) -> RawTlk<'static> {
        RawTlk {
            header: self.header,
            string_data: self.string_data,
            strings: self.strings.into_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use nwn_common::FixedSize;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::RawTlk;
    use crate::{
        error::{Error, Result},
        types::{TlkFlags, TlkHeader, TlkStringData},
    };

    #[rustfmt::skip]
    fn two_entries() -> Vec<u8> {
        let mut bytes = vec![
            // Header
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x33, 0x2E, 0x30,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x64, 0x00, 0x00, 0x00,
            // Entry 0: text "Yes"
            0x01, 0x00, 0x00, 0x00,
        ];
        bytes.resize(TlkHeader::SIZE + 28, 0);
        bytes.extend([
            0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Entry 1: nothing
        ]);
        bytes.resize(TlkHeader::SIZE + 2 * TlkStringData::SIZE, 0);
        bytes.extend(b"Yes");
        bytes
    }

    #[traced_test]
    #[test]
    fn read_tables() -> Result<()> {
        let bytes = two_entries();
        let raw = RawTlk::read(bytes.as_slice())?;

        assert_eq!(raw.string_data.len(), 2);
        assert_eq!(raw.string_data[0].flags, TlkFlags::TEXT_PRESENT);
        assert_eq!(raw.text(0)?, Some(&b"Yes"[..]));
        assert_eq!(raw.text(1)?, None);
        assert_eq!(raw.text(2)?, None);

        Ok(())
    }

    #[test]
    fn text_outside_of_block() -> Result<()> {
        let mut bytes = two_entries();
        bytes[0x34] = 0x04;

        let raw = RawTlk::read(bytes.as_slice())?;
        assert!(matches!(
            raw.text(0),
            Err(Error::TextOutOfRange { index: 0, size: 4, .. })
        ));

        Ok(())
    }

    #[test]
    fn rejects_other_versions() {
        let mut bytes = two_entries();
        bytes[4..8].copy_from_slice(b"V4.0");

        assert!(matches!(
            RawTlk::read(bytes.as_slice()),
            Err(Error::InvalidHeader { .. })
        ));
    }

    #[test]
    fn truncated_string_data() {
        let bytes = two_entries();

        assert!(matches!(
            RawTlk::read(&bytes[..0x30]),
            Err(Error::Span(_))
        ));
    }
}
