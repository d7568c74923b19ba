//! Primitive binary parsers: zero-copy byte runs and little-endian integers

use parsicomb::map::MapExt;
use parsicomb::{ByteCursor, CodeLoc, Cursor, Parser, ParsicombError};

/// Parser that takes exactly `count` bytes as a zero-copy slice
///
/// The count is a `u64` so lengths read from the stream never need an
/// unchecked cast before the bounds test.
pub struct Take {
    count: u64,
}

impl<'a> Parser<'a> for Take {
    type Cursor = ByteCursor<'a>;
    type Output = &'a [u8];
    type Error = ParsicombError<'a>;

    fn parse(&self, cursor: Self::Cursor) -> Result<(Self::Output, Self::Cursor), Self::Error> {
        let (data, pos) = cursor.inner();
        let remaining = data.len().saturating_sub(pos) as u64;
        if self.count > remaining {
            return Err(ParsicombError::UnexpectedEndOfFile(CodeLoc::new(data, pos)));
        }

        let end = pos + self.count as usize;
        let next = if end >= data.len() {
            ByteCursor::EndOfFile { data }
        } else {
            ByteCursor::Valid {
                data,
                position: end,
            }
        };

        Ok((&data[pos..end], next))
    }
}

/// Take exactly `count` bytes
pub fn take(count: u64) -> Take {
    Take { count }
}

/// Parse a u32 (little-endian)
pub fn u32_le<'a>()
-> impl Parser<'a, Cursor = ByteCursor<'a>, Output = u32, Error = ParsicombError<'a>> {
    take(4).map(|b: &[u8]| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Parse a u64 (little-endian)
pub fn u64_le<'a>()
-> impl Parser<'a, Cursor = ByteCursor<'a>, Output = u64, Error = ParsicombError<'a>> {
    take(8).map(|b: &[u8]| u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
}
