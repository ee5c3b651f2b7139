//! # 2DA Format Documentation
//!
//! This crate reads and writes the **2DA** tables used by Aurora engine games such as
//! *Neverwinter Nights*. A 2DA file is a whitespace separated text table that maps row numbers
//! and column names to string values. The engine uses them for rules data (classes, feats,
//! appearances and so on). 2DA files are identified with the `.2da` extension.
//!
//! ## File Structure
//!
//! | Line | Content                 | Description                                                 |
//! |------|-------------------------|-------------------------------------------------------------|
//! | 0    | `2DA V2.0`              | Header, the only supported version                          |
//! | 1    | blank or `DEFAULT: v`   | Optional value returned for cells outside of the table      |
//! | 2    | column names            | Space separated, read case-insensitively                    |
//! | 3..  | `<row> <value>...`      | Row number followed by one token per column                 |
//!
//! ### Tokens
//!
//! - Tokens are separated by any run of spaces or tabs.
//! - A token that starts with `"` runs until the next `"` and may contain spaces.
//! - `****` marks a cell without a value. Rows shorter than the column list have empty trailing
//!   cells, and extra tokens are ignored.
//! - Lines whose first token is not a row number are skipped.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.2da`
//! - **Encoding**: Single byte text, read as lossy UTF-8
//! - **Line Endings**: `\n` or `\r\n`
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::RawTwoDA;
pub use types::{Column, TwoDA, TwoDARow, EMPTY_CELL};
