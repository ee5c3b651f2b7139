//! Writing TLK files

use std::io::{Cursor, Seek, Write};

use binrw::BinWrite;
use nwn_common::{FixedSize, StrRef};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    table::{Tlk, TlkEntry},
    types::{TlkHeader, TlkStringData},
};

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(what))
}

impl Tlk {
    /// Write the table, one string data entry per StrRef from 0 up to the highest one
    ///
    /// StrRefs missing from [`Tlk::entries`] are written as entries without text.
    #[instrument(skip_all, err)]
    pub fn write<W: Write + Seek>(&self, mut inner: W) -> Result<W> {
        let count = self
            .entries
            .last_key_value()
            .map_or(0, |(strref, _)| strref.0 as usize + 1);
        let empty = TlkEntry::default();

        let mut string_data = Vec::with_capacity(count);
        let mut strings = Vec::new();
        for index in 0..count {
            let strref = StrRef(index as u32);
            let entry = self.entries.get(&strref).unwrap_or(&empty);

            let mut data = TlkStringData {
                flags: entry.flags(),
                sound_length: entry.sound_length.unwrap_or_default(),
                ..Default::default()
            };
            if let Some(text) = &entry.text {
                data.offset_to_string = to_u32(strings.len(), "string block")?;
                data.string_size = to_u32(text.len(), "text")?;
                strings.extend_from_slice(text.as_bytes());
            }
            if let Some(sound) = &entry.sound_resref {
                data.sound_resref = sound.to_raw();
            }
            string_data.push(data);
        }

        let string_entries_offset = TlkHeader::SIZE + count * TlkStringData::SIZE;
        TlkHeader {
            language_id: self.language_id,
            string_count: to_u32(count, "string data table")?,
            string_entries_offset: to_u32(string_entries_offset, "string data table")?,
            ..Default::default()
        }
        .write(&mut inner)?;

        for data in &string_data {
            data.write(&mut inner)?;
        }
        inner.write_all(&strings)?;

        debug!(
            language = self.language_id,
            entries = count,
            strings = strings.len(),
            "wrote tlk table"
        );

        Ok(inner)
    }

    /// Write the table to a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write(Cursor::new(Vec::new()))?.into_inner())
    }
}

#[cfg(test)]
mod test {
    use nwn_common::StrRef;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use tracing_test::traced_test;

    use crate::{
        error::Result,
        read::RawTlk,
        table::{Tlk, TlkEntry},
        types::TlkFlags,
    };

    #[traced_test]
    #[test]
    fn empty_write() -> Result<()> {
        let bytes = Tlk::new(1).to_bytes()?;

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x54, 0x4C, 0x4B, 0x20,
            0x56, 0x33, 0x2E, 0x30,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00,
        ];
        assert_str_eq!(format!("{:02X?}", bytes), format!("{:02X?}", expected));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn gaps_become_empty_entries() -> Result<()> {
        let mut tlk = Tlk::new(0);
        tlk.set(StrRef(0), TlkEntry::builder().text("zero").build());
        tlk.set(StrRef(3), TlkEntry::builder().text("three").build());

        let bytes = tlk.to_bytes()?;
        let raw = RawTlk::read(bytes.as_slice())?;

        assert_eq!(raw.header.string_count, 4);
        assert_eq!(raw.header.string_entries_offset, 20 + 4 * 40);
        assert_eq!(raw.string_data[1].flags, TlkFlags(0));
        assert_eq!(raw.string_data[2].flags, TlkFlags(0));
        assert_eq!(raw.string_data[3].offset_to_string, 4);
        assert_eq!(&*raw.strings, b"zerothree");

        let read = Tlk::read(bytes.as_slice())?;
        assert_eq!(read.len(), 4);
        assert_eq!(read.get(StrRef(3)), "three");
        assert_eq!(read.entry(StrRef(2)), Some(&TlkEntry::default()));

        Ok(())
    }

    #[test]
    fn empty_text_is_kept() -> Result<()> {
        let mut tlk = Tlk::new(0);
        tlk.set(StrRef(0), TlkEntry::builder().text("").build());

        let read = Tlk::read(tlk.to_bytes()?.as_slice())?;
        assert_eq!(read, tlk);

        Ok(())
    }
}
