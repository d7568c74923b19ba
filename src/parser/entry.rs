//! Metadata entry parsing

use super::string::parse_string;
use parsicomb::{ByteCursor, Parser, ParsicombError};

/// Parse a single metadata entry (key + value)
pub fn parse_entry<'a>() -> impl Parser<
    'a,
    Cursor = ByteCursor<'a>,
    Output = (&'a str, &'a str),
    Error = ParsicombError<'a>,
> {
    EntryParser
}

struct EntryParser;

impl<'a> Parser<'a> for EntryParser {
    type Cursor = ByteCursor<'a>;
    type Output = (&'a str, &'a str);
    type Error = ParsicombError<'a>;

    fn parse(&self, cursor: Self::Cursor) -> Result<(Self::Output, Self::Cursor), Self::Error> {
        let (key, cursor) = parse_string().parse(cursor)?;
        let (value, cursor) = parse_string().parse(cursor)?;
        Ok(((key, value), cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&11u32.to_le_bytes());
        bytes.extend_from_slice(b"kernel_size");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"5");

        let cursor = ByteCursor::new(&bytes);
        let ((key, value), _) = parse_entry().parse(cursor).unwrap();
        assert_eq!(key, "kernel_size");
        assert_eq!(value, "5");
    }

    #[test]
    fn missing_value_is_eof() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"k");

        let cursor = ByteCursor::new(&bytes);
        let err = parse_entry().parse(cursor).unwrap_err();
        assert!(matches!(err, ParsicombError::UnexpectedEndOfFile(_)));
    }
}
