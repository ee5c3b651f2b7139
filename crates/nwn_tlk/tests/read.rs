use std::path::PathBuf;

use nwn_common::{DataBlock, ResRef, StrRef};
use nwn_tlk::{error::Result, RawTlk, Tlk, TlkEntry};
use pretty_assertions::{assert_eq, assert_str_eq};
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{name}", env!("CARGO_MANIFEST_DIR")))
}

#[traced_test]
#[test]
fn read_sample_table() -> Result<()> {
    let bytes = std::fs::read(resource("sample.tlk"))?;
    let tlk = Tlk::read(bytes.as_slice())?;

    assert_eq!(tlk.language_id, 0);
    assert_eq!(tlk.len(), 3);
    assert_eq!(tlk.get(StrRef(0)), "Bad Strref");
    assert_eq!(tlk.get(StrRef(1)), "");
    assert_eq!(tlk.get(StrRef(2)), "Hello");
    assert_eq!(tlk.get(StrRef(3)), "");

    let expected = TlkEntry::builder()
        .text("Hello")
        .sound_resref(ResRef::try_from("vs_hello").unwrap())
        .sound_length(1.5)
        .build();
    assert_eq!(tlk.entry(StrRef(2)), Some(&expected));
    assert_eq!(tlk.entry(StrRef(1)), Some(&TlkEntry::default()));

    Ok(())
}

#[test]
fn read_from_file_handle() -> Result<()> {
    let file = std::fs::File::open(resource("sample.tlk"))?;
    let raw = RawTlk::read(DataBlock::map(&file)?)?;

    assert_eq!(raw.header.string_count, 3);
    assert_eq!(raw.text(2)?, Some(&b"Hello"[..]));

    Ok(())
}

#[traced_test]
#[test]
fn rewrite_is_identical() -> Result<()> {
    let bytes = std::fs::read(resource("sample.tlk"))?;
    let tlk = Tlk::read(bytes.as_slice())?;

    assert_str_eq!(
        format!("{:02X?}", tlk.to_bytes()?),
        format!("{:02X?}", bytes)
    );

    Ok(())
}

#[test]
fn serde_json_roundtrip() -> Result<()> {
    let bytes = std::fs::read(resource("sample.tlk"))?;
    let tlk = Tlk::read(bytes.as_slice())?;

    let json = serde_json::to_string(&tlk).unwrap();
    let parsed: Tlk = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, tlk);

    Ok(())
}
