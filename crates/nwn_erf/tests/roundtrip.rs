use std::io::Write;

use nwn_common::{DataBlock, ResRef, ResourceType, StrRef};
use nwn_erf::{error::Result, Erf, ErfHeader, RawErf};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn hak() -> Result<Erf<'static>> {
    let mut erf = Erf::new(ErfHeader::HAK);
    erf.build_year = 124;
    erf.build_day = 200;
    erf.description_str_ref = StrRef(16_777_300);
    erf.descriptions.push(nwn_erf::ErfDescription {
        language_id: 0,
        text: "Custom content".into(),
    });
    erf.descriptions.push(nwn_erf::ErfDescription {
        language_id: 2,
        text: "Contenu".into(),
    });

    erf.push(ResRef::try_from("cloak_001")?, ResourceType(2027), vec![1u8, 2, 3]);
    erf.push(ResRef::try_from("appearance")?, ResourceType(2017), b"2DA V2.0\n".to_vec());
    erf.push(ResRef::try_from("empty")?, ResourceType(10), Vec::<u8>::new());
    Ok(erf)
}

#[traced_test]
#[test]
fn archive_survives_encoding() -> Result<()> {
    let erf = hak()?;

    let bytes = erf.to_bytes()?;
    let decoded = Erf::read(bytes.as_slice())?;

    assert_eq!(decoded, erf);

    Ok(())
}

#[test]
fn encoding_is_stable() -> Result<()> {
    let bytes = hak()?.to_bytes()?;
    let again = Erf::read(bytes.as_slice())?.to_bytes()?;

    assert_eq!(again, bytes);

    Ok(())
}

#[test]
fn raw_offsets_are_recomputed() -> Result<()> {
    let bytes = hak()?.to_bytes()?;
    let raw = RawErf::read(bytes.as_slice())?;

    assert_eq!(raw.header.language_count, 2);
    assert_eq!(raw.header.localized_string_size, (8 + 14) + (8 + 7));
    assert_eq!(raw.header.offset_to_localized_string, 160);
    assert_eq!(raw.header.offset_to_key_list, 160 + 37);
    assert_eq!(raw.header.offset_to_resource_list, 160 + 37 + 3 * 24);
    assert_eq!(raw.data_offset(), 160 + 37 + 3 * 24 + 3 * 8);
    assert_eq!(
        raw.keys.iter().map(|key| key.res_id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let mut offset = raw.data_offset();
    for entry in &raw.resources {
        assert_eq!(entry.offset, offset);
        offset += entry.size;
    }
    assert_eq!(offset as usize, bytes.len());

    Ok(())
}

#[test]
fn mapped_archive() -> Result<()> {
    let path = std::env::temp_dir().join(format!("nwn_erf_mapped_{}.hak", std::process::id()));
    std::fs::File::create(&path)?.write_all(&hak()?.to_bytes()?)?;

    let file = std::fs::File::open(&path)?;
    let erf = Erf::read(DataBlock::map(&file)?)?;
    let appearance = erf.resource("Appearance", ResourceType(2017)).unwrap();
    assert_eq!(&*appearance.data, b"2DA V2.0\n");
    assert_eq!(appearance.data.storage(), nwn_common::Storage::Mapped);

    drop(erf);
    std::fs::remove_file(&path)?;

    Ok(())
}
