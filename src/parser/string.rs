//! Length-prefixed UTF-8 strings

use super::primitives::{take, u32_le};
use parsicomb::{ByteCursor, CodeLoc, Cursor, Parser, ParsicombError};
use std::borrow::Cow;

/// Parse a u32 length-prefixed UTF-8 string (keys, values and tensor names)
pub fn parse_string<'a>()
-> impl Parser<'a, Cursor = ByteCursor<'a>, Output = &'a str, Error = ParsicombError<'a>> {
    StringParser
}

struct StringParser;

impl<'a> Parser<'a> for StringParser {
    type Cursor = ByteCursor<'a>;
    type Output = &'a str;
    type Error = ParsicombError<'a>;

    fn parse(&self, cursor: Self::Cursor) -> Result<(Self::Output, Self::Cursor), Self::Error> {
        let (len, cursor) = u32_le().parse(cursor)?;
        let (bytes, cursor) = take(len as u64).parse(cursor)?;
        let s = std::str::from_utf8(bytes).map_err(|_| {
            let (data, pos) = cursor.inner();
            ParsicombError::SyntaxError {
                message: Cow::Borrowed("Invalid UTF-8 in string"),
                loc: CodeLoc::new(data, pos.saturating_sub(len as usize)),
            }
        })?;
        Ok((s, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixed(bytes: &[u8]) -> Vec<u8> {
        let mut out = (bytes.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(bytes);
        out
    }

    #[test]
    fn parses_string() {
        let bytes = prefixed(b"kernel_size");
        let cursor = ByteCursor::new(&bytes);
        let (s, _) = parse_string().parse(cursor).unwrap();
        assert_eq!(s, "kernel_size");
    }

    #[test]
    fn parses_empty_string() {
        let bytes = 0u32.to_le_bytes();
        let cursor = ByteCursor::new(&bytes);
        let (s, _) = parse_string().parse(cursor).unwrap();
        assert_eq!(s, "");
    }

    #[test]
    fn length_past_end_is_eof() {
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let cursor = ByteCursor::new(&bytes);
        let err = parse_string().parse(cursor).unwrap_err();
        assert!(matches!(err, ParsicombError::UnexpectedEndOfFile(_)));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = prefixed(&[0xFF, 0xFE]);
        let cursor = ByteCursor::new(&bytes);
        let err = parse_string().parse(cursor).unwrap_err();
        assert!(matches!(err, ParsicombError::SyntaxError { .. }));
    }
}
