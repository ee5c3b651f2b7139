use nwn_common::{ExoString, FourCC, ResRef, StrRef};
use nwn_gff::{
    error::Result, FieldValue, Gff, GffList, GffStruct, LocString, LocSubString, RawGff,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn item() -> Gff {
    let mut gff = Gff::new(FourCC::new(b"UTI "));
    gff.write_field("BaseItem", 16i32);
    gff.write_field("Charges", 50u8);
    gff.write_field("Cost", 1200u32);
    gff.write_field("StackSize", 1u16);
    gff.write_field("AddCost", -300i16);
    gff.write_field("Identified", -1i8);
    gff.write_field("Seed", 0xDEAD_BEEF_0000_0001u64);
    gff.write_field("Offset", i64::MIN);
    gff.write_field("Weight", 2.5f32);
    gff.write_field("Precise", std::f64::consts::PI);
    gff.write_field("Tag", "nw_wswls001");
    gff.write_field("TemplateResRef", ResRef::try_from("nw_wswls001").unwrap());
    gff.write_field(
        "LocalizedName",
        LocString {
            str_ref: StrRef(12_345),
            substrings: vec![
                LocSubString::new(0, false, "Longsword"),
                LocSubString::new(2, false, "Epée longue"),
            ],
        },
    );
    gff.write_field("Blob", vec![0u8, 1, 2, 3, 255]);

    let mut property = GffStruct::new(0);
    property.write_field("PropertyName", 6u16);
    property.write_field("CostValue", 3u16);
    let mut second = GffStruct::new(0);
    second.write_field("PropertyName", 15u16);
    gff.write_field("PropertiesList", GffList::from(vec![property, second]));

    let mut nested = GffStruct::new(44);
    nested.write_field("Empty", GffStruct::new(45));
    nested.write_field("EmptyList", GffList::new());
    gff.write_field("Extra", nested);

    gff
}

#[traced_test]
#[test]
fn tree_survives_encoding() -> Result<()> {
    let gff = item();

    let bytes = gff.to_bytes()?;
    let decoded = Gff::from_raw(&RawGff::read(bytes.as_slice())?)?;

    assert_eq!(decoded, gff);

    let names: Vec<_> = decoded.fields().keys().cloned().collect();
    let expected: Vec<_> = gff.fields().keys().cloned().collect();
    assert_eq!(names, expected);

    let extra = decoded.read_field::<GffStruct>("Extra").unwrap();
    assert_eq!(extra.type_id(), 44);
    assert_eq!(extra.read_field::<GffStruct>("Empty").unwrap().type_id(), 45);
    assert!(extra.read_field::<GffList>("EmptyList").unwrap().is_empty());

    Ok(())
}

#[test]
fn encoding_is_stable() -> Result<()> {
    let bytes = item().to_bytes()?;
    let again = Gff::read(bytes.as_slice())?.to_bytes()?;

    assert_eq!(again, bytes);

    Ok(())
}

#[test]
fn float_bit_patterns_survive() -> Result<()> {
    let quiet_nan = f32::from_bits(0x7FC0_1234);
    let double_nan = f64::from_bits(0x7FF8_0000_0000_BEEF);

    let mut gff = Gff::new(FourCC::new(b"GFF "));
    gff.write_field("NaN", quiet_nan);
    gff.write_field("Inf", f32::INFINITY);
    gff.write_field("NegInf", f32::NEG_INFINITY);
    gff.write_field("NegZero", -0.0f32);
    gff.write_field("DoubleNaN", double_nan);

    let decoded = Gff::read(gff.to_bytes()?.as_slice())?;

    assert_eq!(decoded.read_field::<f32>("NaN").unwrap().to_bits(), 0x7FC0_1234);
    assert_eq!(decoded.read_field::<f32>("Inf"), Some(&f32::INFINITY));
    assert_eq!(decoded.read_field::<f32>("NegInf"), Some(&f32::NEG_INFINITY));
    assert_eq!(
        decoded.read_field::<f32>("NegZero").unwrap().to_bits(),
        (-0.0f32).to_bits()
    );
    assert_eq!(
        decoded.read_field::<f64>("DoubleNaN").unwrap().to_bits(),
        0x7FF8_0000_0000_BEEF
    );

    Ok(())
}

#[test]
fn negative_inline_values_survive() -> Result<()> {
    let mut gff = Gff::new(FourCC::new(b"GFF "));
    gff.write_field("Char", i8::MIN);
    gff.write_field("Short", i16::MIN);
    gff.write_field("Int", i32::MIN);

    let raw = gff.to_raw()?;
    assert_eq!(raw.fields[0].data_or_data_offset, 0x80);
    assert_eq!(raw.fields[1].data_or_data_offset, 0x8000);
    assert_eq!(raw.fields[2].data_or_data_offset, 0x8000_0000);

    let decoded = Gff::from_raw(&raw)?;
    assert_eq!(decoded.read_field::<i8>("Char"), Some(&i8::MIN));
    assert_eq!(decoded.read_field::<i16>("Short"), Some(&i16::MIN));
    assert_eq!(decoded.read_field::<i32>("Int"), Some(&i32::MIN));

    Ok(())
}

#[test]
fn non_utf8_strings_keep_their_bytes() -> Result<()> {
    let latin1 = ExoString::new(vec![b'E', b'p', 0xE9, b'e']);

    let mut gff = Gff::new(FourCC::new(b"GFF "));
    gff.write_field("Name", latin1.clone());

    let decoded = Gff::read(gff.to_bytes()?.as_slice())?;
    assert_eq!(decoded.read_field::<ExoString>("Name"), Some(&latin1));

    Ok(())
}

#[test]
fn mutate_then_encode() -> Result<()> {
    let mut gff = Gff::read(item().to_bytes()?.as_slice())?;

    gff.write_field("Tag", "renamed");
    assert!(gff.delete_field("Blob"));
    if let Some(FieldValue::List(properties)) = gff.get_mut("PropertiesList") {
        properties.pop();
    }

    let decoded = Gff::read(gff.to_bytes()?.as_slice())?;
    assert_eq!(decoded.read_field::<ExoString>("Tag").unwrap(), "renamed");
    assert!(decoded.get("Blob").is_none());
    assert_eq!(decoded.read_field::<GffList>("PropertiesList").unwrap().len(), 1);
    assert_eq!(decoded, gff);

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serde_json_roundtrip() -> Result<()> {
    let gff = item();

    let json = serde_json::to_string(&gff).unwrap();
    let parsed: Gff = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, gff);

    Ok(())
}
