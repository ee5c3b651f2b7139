//! Types for reading 2DA files
//!

use nwn_common::DataBlock;
use tracing::{debug, instrument};
use winnow::{
    ascii::space0,
    combinator::{alt, delimited, opt, preceded, repeat, terminated},
    token::take_till,
    PResult, Parser,
};

use crate::error::{Error, Result};

fn quoted<'s>(input: &mut &'s str) -> PResult<&'s str> {
    delimited('"', take_till(0.., '"'), opt('"')).parse_next(input)
}

fn bare<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_till(1.., ' ').parse_next(input)
}

fn line_tokens<'s>(input: &mut &'s str) -> PResult<Vec<&'s str>> {
    preceded(space0, repeat(0.., terminated(alt((quoted, bare)), space0))).parse_next(input)
}

/// Split one line into tokens
///
/// Tokens are separated by spaces; a token starting with `"` runs until the next `"` and may
/// contain spaces. The quotes are not part of the token.
///
/// ```
/// let tokens = nwn_2da::read::tokenize("0   \"Short Sword\"  ****  1.5").unwrap();
/// assert_eq!(tokens, vec!["0", "Short Sword", "****", "1.5"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<&str>> {
    line_tokens.parse(line).map_err(|err| Error::Tokenize {
        line: 0,
        message: err.to_string(),
    })
}

/// The lines of a 2DA file as tokens
///
/// Only the first line is interpreted; [`crate::TwoDA`] gives the rest meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTwoDA {
    /// One entry per line, including empty lines
    pub lines: Vec<Vec<String>>,
}

impl RawTwoDA {
    /// The only supported header
    pub const HEADER: [&'static str; 2] = ["2DA", "V2.0"];

    /// Read a 2DA file, replacing invalid UTF-8
    pub fn read<'a>(block: impl Into<DataBlock<'a>>) -> Result<RawTwoDA> {
        let block = block.into();
        Self::parse(&String::from_utf8_lossy(&block))
    }

    /// Tokenize a 2DA file and check its header
    ///
    /// Lines are split on `\n`; `\r` is dropped and tabs count as spaces.
    #[instrument(skip_all, err)]
    pub fn parse(text: &str) -> Result<RawTwoDA> {
        let lines = text
            .split('\n')
            .enumerate()
            .map(|(number, line)| {
                let line: String = line
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\t' { ' ' } else { c })
                    .collect();

                let tokens = line_tokens.parse(line.as_str()).map_err(|err| Error::Tokenize {
                    line: number,
                    message: err.to_string(),
                })?;
                Ok(tokens.into_iter().map(str::to_owned).collect())
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        match lines.first() {
            Some(header) if header.as_slice() == Self::HEADER => {}
            Some(header) => return Err(Error::InvalidHeader(header.join(" "))),
            None => return Err(Error::InvalidHeader(String::new())),
        }

        debug!(lines = lines.len(), "tokenized 2da");

        Ok(RawTwoDA { lines })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{tokenize, RawTwoDA};
    use crate::error::{Error, Result};

    #[test]
    fn tokens_split_on_spaces() -> Result<()> {
        assert_eq!(tokenize("  a  bb ccc   ")?, vec!["a", "bb", "ccc"]);
        assert_eq!(tokenize("")?, Vec::<&str>::new());
        assert_eq!(tokenize("    ")?, Vec::<&str>::new());

        Ok(())
    }

    #[test]
    fn quoted_tokens_keep_spaces() -> Result<()> {
        assert_eq!(
            tokenize("12 \"Two Handed\" ****")?,
            vec!["12", "Two Handed", "****"]
        );
        assert_eq!(tokenize("\"\" x")?, vec!["", "x"]);
        assert_eq!(tokenize("\"unterminated quote")?, vec!["unterminated quote"]);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn lines_are_normalized() -> Result<()> {
        let raw = RawTwoDA::parse("2DA V2.0\r\n\r\n\tLabel\tValue\r\n0\tfoo\t\"a b\"\r\n")?;

        assert_eq!(
            raw.lines,
            vec![
                vec!["2DA".to_owned(), "V2.0".to_owned()],
                vec![],
                vec!["Label".to_owned(), "Value".to_owned()],
                vec!["0".to_owned(), "foo".to_owned(), "a b".to_owned()],
                vec![],
            ]
        );

        Ok(())
    }

    #[test]
    fn header_is_checked() {
        assert!(matches!(
            RawTwoDA::parse("2DA V1.0\n\nA\n"),
            Err(Error::InvalidHeader(found)) if found == "2DA V1.0"
        ));
        assert!(matches!(
            RawTwoDA::parse(""),
            Err(Error::InvalidHeader(_))
        ));
        assert!(RawTwoDA::parse("2DA\tV2.0").is_ok());
    }

    #[test]
    fn read_lossy_bytes() -> Result<()> {
        let raw = RawTwoDA::read(b"2DA V2.0\n\nName\n0 caf\xE9\n".as_slice())?;
        assert_eq!(raw.lines[3][1], "caf\u{FFFD}");

        Ok(())
    }
}
