//! Typed field values of a GFF tree

use nwn_common::{ExoString, ResRef, StrRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    tree::{GffList, GffStruct},
    types::FieldType,
};

/// One entry of a [`LocString`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocSubString {
    /// `language * 2 + gender`
    pub id: i32,

    /// The localized text
    pub string: ExoString,
}

impl LocSubString {
    /// Create an entry for a language and gender
    pub fn new(language: i32, feminine: bool, string: impl Into<ExoString>) -> Self {
        Self {
            id: language * 2 + feminine as i32,
            string: string.into(),
        }
    }

    /// The language of this entry
    pub const fn language(&self) -> i32 {
        self.id / 2
    }

    /// Whether this is the feminine form of the text
    pub const fn is_feminine(&self) -> bool {
        self.id % 2 == 1
    }
}

/// A localized string: a string table reference plus optional inline translations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocString {
    /// Reference into the string table, [`StrRef::NONE`] when unused
    pub str_ref: StrRef,

    /// Inline translations in stored order
    pub substrings: Vec<LocSubString>,
}

impl LocString {
    /// A localized string that only refers to the string table
    pub fn from_str_ref(str_ref: StrRef) -> Self {
        Self {
            str_ref,
            substrings: Vec::new(),
        }
    }

    /// The inline text for a language id, if any
    pub fn get(&self, id: i32) -> Option<&ExoString> {
        self.substrings
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.string)
    }
}

/// Value of a field, one variant per field type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldValue {
    Byte(u8),
    Char(i8),
    Word(u16),
    Short(i16),
    Dword(u32),
    Int(i32),
    Dword64(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(ExoString),
    ResRef(ResRef),
    LocString(LocString),
    Void(Vec<u8>),
    Struct(GffStruct),
    List(GffList),
}

impl FieldValue {
    /// The on-disk type tag of this value
    pub const fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Byte(_) => FieldType::Byte,
            FieldValue::Char(_) => FieldType::Char,
            FieldValue::Word(_) => FieldType::Word,
            FieldValue::Short(_) => FieldType::Short,
            FieldValue::Dword(_) => FieldType::Dword,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Dword64(_) => FieldType::Dword64,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::String(_) => FieldType::ExoString,
            FieldValue::ResRef(_) => FieldType::ResRef,
            FieldValue::LocString(_) => FieldType::LocString,
            FieldValue::Void(_) => FieldType::Void,
            FieldValue::Struct(_) => FieldType::Struct,
            FieldValue::List(_) => FieldType::List,
        }
    }
}

/// Types that can be borrowed out of a [`FieldValue`]
///
/// Implemented for the Rust type of every field type, see [`GffStruct::read_field`].
pub trait FromField: Sized {
    /// The field type holding `Self`
    const TYPE: FieldType;

    /// Borrow the value if it holds `Self`
    fn from_field(value: &FieldValue) -> Option<&Self>;

    /// Mutably borrow the value if it holds `Self`
    fn from_field_mut(value: &mut FieldValue) -> Option<&mut Self>;
}

macro_rules! field_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromField for $ty {
                const TYPE: FieldType = FieldType::$variant;

                fn from_field(value: &FieldValue) -> Option<&Self> {
                    match value {
                        FieldValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_field_mut(value: &mut FieldValue) -> Option<&mut Self> {
                    match value {
                        FieldValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

field_conversions! {
    u8 => Byte,
    i8 => Char,
    u16 => Word,
    i16 => Short,
    u32 => Dword,
    i32 => Int,
    u64 => Dword64,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    ResRef => ResRef,
    LocString => LocString,
    Vec<u8> => Void,
    GffStruct => Struct,
    GffList => List,
}

// `FieldType::ExoString` is carried by the `String` variant
impl FromField for ExoString {
    const TYPE: FieldType = FieldType::ExoString;

    fn from_field(value: &FieldValue) -> Option<&Self> {
        match value {
            FieldValue::String(inner) => Some(inner),
            _ => None,
        }
    }

    fn from_field_mut(value: &mut FieldValue) -> Option<&mut Self> {
        match value {
            FieldValue::String(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<ExoString> for FieldValue {
    fn from(value: ExoString) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value.into())
    }
}

#[cfg(test)]
mod test {
    use nwn_common::{ExoString, ResRef, StrRef};
    use pretty_assertions::assert_eq;

    use super::{FieldValue, FromField, LocString, LocSubString};
    use crate::types::FieldType;

    #[test]
    fn conversions_pick_the_matching_variant() {
        assert_eq!(FieldValue::from(7u8), FieldValue::Byte(7));
        assert_eq!(FieldValue::from(-7i8), FieldValue::Char(-7));
        assert_eq!(FieldValue::from(-7i32).field_type(), FieldType::Int);
        assert_eq!(FieldValue::from("x").field_type(), FieldType::ExoString);
        assert_eq!(FieldValue::from(vec![1u8, 2]).field_type(), FieldType::Void);

        let resref = ResRef::try_from("nw_it_gold001").unwrap();
        assert_eq!(FieldValue::from(resref).field_type(), FieldType::ResRef);
    }

    #[test]
    fn borrow_only_the_stored_type() {
        let value = FieldValue::from(3.5f32);
        assert_eq!(f32::from_field(&value), Some(&3.5));
        assert_eq!(f64::from_field(&value), None);
        assert_eq!(u32::from_field(&value), None);

        let mut text = FieldValue::from("abc");
        ExoString::from_field_mut(&mut text).unwrap().clone_from(&"xyz".into());
        assert_eq!(text, FieldValue::String("xyz".into()));
    }

    #[test]
    fn loc_sub_string_ids() {
        let entry = LocSubString::new(4, true, "Hallo");
        assert_eq!(entry.id, 9);
        assert_eq!(entry.language(), 4);
        assert!(entry.is_feminine());

        let loc = LocString {
            str_ref: StrRef(12),
            substrings: vec![LocSubString::new(0, false, "Hello"), entry],
        };
        assert_eq!(loc.get(0).map(|s| s.to_string()), Some("Hello".to_owned()));
        assert_eq!(loc.get(2), None);
        assert!(LocString::default().str_ref.is_none());
    }
}
