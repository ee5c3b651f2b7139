//! Writing 2DA files

use std::fmt::{self, Display, Write as _};
use tracing::instrument;

use crate::{
    error::Result,
    types::{TwoDA, EMPTY_CELL},
};

fn quote(token: &str) -> std::borrow::Cow<'_, str> {
    if token.is_empty() || token.contains([' ', '\t']) {
        format!("\"{token}\"").into()
    } else {
        token.into()
    }
}

fn end_line(f: &mut fmt::Formatter<'_>, line: &mut String) -> fmt::Result {
    writeln!(f, "{}", line.trim_end())?;
    line.clear();
    Ok(())
}

impl Display for TwoDA {
    /// Formats the table as a `2DA V2.0` file
    ///
    /// Rows are renumbered from 0 and every column is padded to its widest token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_ids: Vec<String> = (0..self.rows.len()).map(|i| i.to_string()).collect();
        let cells: Vec<Vec<_>> = self
            .rows
            .iter()
            .map(|row| {
                (0..self.columns.len())
                    .map(|column| match row.entries.get(column) {
                        Some(Some(value)) => quote(value),
                        _ => EMPTY_CELL.into(),
                    })
                    .collect()
            })
            .collect();

        let id_width = row_ids.iter().map(String::len).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain([quote(name).len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        writeln!(f, "2DA V2.0")?;
        match &self.default {
            Some(default) => writeln!(f, "DEFAULT: {}", quote(default))?,
            None => writeln!(f)?,
        }

        let mut line = String::new();
        write!(line, "{:id_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(line, " {:width$}", quote(name))?;
        }
        end_line(f, &mut line)?;

        for (id, row) in row_ids.iter().zip(&cells) {
            write!(line, "{id:id_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(line, " {cell:width$}")?;
            }
            end_line(f, &mut line)?;
        }

        Ok(())
    }
}

impl TwoDA {
    /// Write the table as a `2DA V2.0` file
    #[instrument(skip_all, err)]
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{self}")?;
        Ok(())
    }
}
