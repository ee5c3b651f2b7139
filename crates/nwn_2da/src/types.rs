//! Friendly view of 2DA tables

use derive_more::derive::{Deref, Index, IntoIterator};
use nwn_common::DataBlock;
use std::str::FromStr;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    read::RawTwoDA,
};

/// Marker for a cell without a value
pub const EMPTY_CELL: &str = "****";

/// Addresses a column by position or by case-insensitive name
pub trait Column {
    /// Position of the column within `columns`
    fn position(&self, columns: &[String]) -> Option<usize>;
}

impl Column for usize {
    fn position(&self, columns: &[String]) -> Option<usize> {
        (*self < columns.len()).then_some(*self)
    }
}

impl Column for &str {
    fn position(&self, columns: &[String]) -> Option<usize> {
        columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(self))
    }
}

impl Column for &String {
    fn position(&self, columns: &[String]) -> Option<usize> {
        self.as_str().position(columns)
    }
}

/// One data row
///
/// `None` marks a `****` cell or a missing trailing token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref, Index, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoDARow {
    /// The row number as written in the file
    pub row_id: u32,

    /// One entry per column
    #[deref]
    #[index]
    #[into_iterator(owned, ref)]
    pub entries: Vec<Option<String>>,
}

impl TwoDARow {
    /// A row with every cell empty
    pub fn empty(row_id: u32, columns: usize) -> Self {
        Self {
            row_id,
            entries: vec![None; columns],
        }
    }

    /// The value of a cell by position
    pub fn get(&self, column: usize) -> Option<&str> {
        self.entries.get(column).and_then(|entry| entry.as_deref())
    }
}

/// A 2DA table
///
/// Rows are addressed by position, which matches the written row numbers of well-formed files.
/// Lookups return `None` when there is no value, so the zero value of a cell is
/// `table.as_int(row, column).unwrap_or_default()`.
///
/// ```
/// let table: nwn_2da::TwoDA = "2DA V2.0\n\n   Name  Count Ratio\n0  foo   ****  3.5\n"
///     .parse()
///     .unwrap();
///
/// assert_eq!(table.as_str(0, "Name"), Some("foo"));
/// assert!(table.is_empty(0, "Count"));
/// assert_eq!(table.as_int(0, "Count").unwrap_or_default(), 0);
/// assert_eq!(table.as_float(0, "ratio"), Some(3.5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoDA {
    /// Column names in stored order
    pub columns: Vec<String>,

    /// Data rows in stored order
    pub rows: Vec<TwoDARow>,

    /// Value of the `DEFAULT:` line, returned for cells that do not exist
    pub default: Option<String>,
}

impl TwoDA {
    /// An empty table with the given columns
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            default: None,
        }
    }

    /// Read and interpret a 2DA file
    pub fn read<'a>(block: impl Into<DataBlock<'a>>) -> Result<TwoDA> {
        Ok(Self::from_raw(&RawTwoDA::read(block)?))
    }

    /// Interpret tokenized lines
    ///
    /// Line 1 may hold `DEFAULT: <value>`. The first non-empty line after that names the
    /// columns; later lines are rows when their first token is a row number and are skipped
    /// otherwise.
    pub fn from_raw(raw: &RawTwoDA) -> TwoDA {
        let mut lines = raw.lines.iter().enumerate().skip(1).peekable();

        let default = match lines.peek() {
            Some((_, tokens)) if tokens.first().map(String::as_str) == Some("DEFAULT:") => {
                let default = tokens
                    .get(1)
                    .filter(|token| token.as_str() != EMPTY_CELL)
                    .cloned();
                lines.next();
                default
            }
            _ => None,
        };

        let columns = lines
            .by_ref()
            .map(|(_, tokens)| tokens)
            .find(|tokens| !tokens.is_empty())
            .cloned()
            .unwrap_or_default();

        let mut rows = Vec::new();
        for (number, tokens) in lines {
            let Some(first) = tokens.first() else {
                continue;
            };

            let Ok(row_id) = first.parse::<u32>() else {
                trace!(line = number, token = %first, "skipping line without row number");
                continue;
            };

            let entries = (1..=columns.len())
                .map(|column| {
                    tokens
                        .get(column)
                        .filter(|token| token.as_str() != EMPTY_CELL)
                        .cloned()
                })
                .collect();

            rows.push(TwoDARow { row_id, entries });
        }

        debug!(columns = columns.len(), rows = rows.len(), "read 2da table");

        TwoDA {
            columns,
            rows,
            default,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column
    pub fn column(&self, column: impl Column) -> Option<usize> {
        column.position(&self.columns)
    }

    /// A row by position
    pub fn row(&self, row: usize) -> Option<&TwoDARow> {
        self.rows.get(row)
    }

    /// A row by position, appending rows of `****` up to it when the table is shorter
    pub fn row_mut(&mut self, row: usize) -> &mut TwoDARow {
        let columns = self.columns.len();
        while self.rows.len() <= row {
            let row_id = self.rows.len() as u32;
            self.rows.push(TwoDARow::empty(row_id, columns));
        }
        &mut self.rows[row]
    }

    fn lookup(&self, row: usize, column: impl Column) -> Option<Option<&str>> {
        let column = self.column(column)?;
        let row = self.rows.get(row)?;
        Some(row.entries.get(column).and_then(|entry| entry.as_deref()))
    }

    /// The text of a cell
    ///
    /// `None` for `****` cells. Cells outside of the table fall back to the `DEFAULT:` value.
    pub fn as_str(&self, row: usize, column: impl Column) -> Option<&str> {
        match self.lookup(row, column) {
            Some(cell) => cell,
            None => self.default.as_deref(),
        }
    }

    /// A cell as a decimal or `0x` prefixed hexadecimal integer
    pub fn as_int(&self, row: usize, column: impl Column) -> Option<i32> {
        parse_int(self.as_str(row, column)?)
    }

    /// A cell as a floating point number
    pub fn as_float(&self, row: usize, column: impl Column) -> Option<f32> {
        self.as_str(row, column)?.parse().ok()
    }

    /// Whether a cell holds no value
    ///
    /// True for `****`, for missing trailing tokens and for cells outside of the table.
    pub fn is_empty(&self, row: usize, column: impl Column) -> bool {
        !matches!(self.lookup(row, column), Some(Some(_)))
    }

    /// Set a cell, appending rows when `row` is past the end
    ///
    /// Returns `false` without changing the table when the column does not exist.
    pub fn set(&mut self, row: usize, column: impl Column, value: Option<String>) -> bool {
        let Some(column) = self.column(column) else {
            return false;
        };

        let columns = self.columns.len();
        let entries = &mut self.row_mut(row).entries;
        if entries.len() < columns {
            entries.resize(columns, None);
        }
        entries[column] = value;
        true
    }

    /// Append a row numbered after the last one
    pub fn push_row(&mut self, entries: Vec<Option<String>>) -> &mut TwoDARow {
        let row_id = self.rows.len() as u32;
        self.rows.push(TwoDARow { row_id, entries });
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }
}

impl FromStr for TwoDA {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_raw(&RawTwoDA::parse(s)?))
    }
}

fn parse_int(text: &str) -> Option<i32> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.starts_with(['+', '-']) {
        return None;
    }

    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok()? as i32,
        None => {
            let magnitude = digits.parse::<u32>().ok()?;
            match i32::try_from(magnitude) {
                Ok(value) => value,
                // i32::MIN has no positive counterpart
                Err(_) if negative && magnitude == 0x8000_0000 => i32::MIN,
                Err(_) => return None,
            }
        }
    };

    Some(if negative { value.wrapping_neg() } else { value })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{parse_int, TwoDA, TwoDARow};
    use crate::error::Result;

    const WEAPONS: &str = "2DA V2.0

     Name        Count  Ratio
0    dagger      1      0.5
1    \"long sword\" 2     1.0
2    ****        ****   ****
3    foo         ****   3.5
";

    #[traced_test]
    #[test]
    fn cells_by_name_and_index() -> Result<()> {
        let table: TwoDA = WEAPONS.parse()?;

        assert_eq!(table.columns, vec!["Name", "Count", "Ratio"]);
        assert_eq!(table.row_count(), 4);

        assert_eq!(table.as_str(3, "Name"), Some("foo"));
        assert!(table.is_empty(3, "Count"));
        assert_eq!(table.as_int(3, "Count").unwrap_or_default(), 0);
        assert_eq!(table.as_float(3, "Ratio"), Some(3.5));

        assert_eq!(table.as_str(1, 0), Some("long sword"));
        assert_eq!(table.as_int(1, "COUNT"), Some(2));
        assert!(table.is_empty(2, 0));
        assert!(!table.is_empty(0, 0));

        Ok(())
    }

    #[test]
    fn missing_cells_without_default() -> Result<()> {
        let table: TwoDA = WEAPONS.parse()?;

        assert_eq!(table.as_str(10, "Name"), None);
        assert_eq!(table.as_str(0, "Nope"), None);
        assert_eq!(table.as_str(0, 3), None);
        assert!(table.is_empty(10, "Name"));

        Ok(())
    }

    #[test]
    fn default_line_fills_missing_cells() -> Result<()> {
        let table: TwoDA = "2DA V2.0\nDEFAULT: 7\nA B\n0 1 ****\n".parse()?;

        assert_eq!(table.default.as_deref(), Some("7"));
        assert_eq!(table.as_int(0, "A"), Some(1));
        assert_eq!(table.as_int(0, "B"), None);
        assert_eq!(table.as_int(5, "A"), Some(7));
        assert_eq!(table.as_int(0, "C"), Some(7));

        Ok(())
    }

    #[test]
    fn short_rows_and_junk_lines() -> Result<()> {
        let table: TwoDA = "2DA V2.0\n\n\nA B C\n\nA B C\n0 x\n1 y z w extra\n".parse()?;

        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(
            table.rows,
            vec![
                TwoDARow {
                    row_id: 0,
                    entries: vec![Some("x".into()), None, None],
                },
                TwoDARow {
                    row_id: 1,
                    entries: vec![Some("y".into()), Some("z".into()), Some("w".into())],
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn row_mut_extends_the_table() -> Result<()> {
        let mut table: TwoDA = WEAPONS.parse()?;

        table.row_mut(6).entries[0] = Some("new".into());
        assert_eq!(table.row_count(), 7);
        assert_eq!(table.rows[5], TwoDARow::empty(5, 3));
        assert_eq!(table.as_str(6, "Name"), Some("new"));

        assert!(table.set(8, "Ratio", Some("2.0".into())));
        assert!(!table.set(8, "Nope", Some("2.0".into())));
        assert_eq!(table.as_float(8, "Ratio"), Some(2.0));
        assert_eq!(table.row_count(), 9);

        Ok(())
    }

    #[test]
    fn integers() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0xFFFFFFFF"), Some(-1));
        assert_eq!(parse_int("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_int("2147483648"), None);
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
    }
}
