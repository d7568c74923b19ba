//! Tensor descriptor parsing

use super::primitives::{u32_le, u64_le};
use super::string::parse_string;
use parsicomb::{ByteCursor, CodeLoc, Cursor, Parser, ParsicombError, ntimes};

/// Descriptor as stored; the dtype tag and offset are validated by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDescriptor<'a> {
    pub name: &'a str,
    pub shape: Vec<u64>,
    pub dtype_tag: u32,
    pub offset: u64,
}

/// Parse one descriptor record
pub fn parse_descriptor<'a>() -> impl Parser<
    'a,
    Cursor = ByteCursor<'a>,
    Output = RawDescriptor<'a>,
    Error = ParsicombError<'a>,
> {
    DescriptorParser
}

struct DescriptorParser;

impl<'a> Parser<'a> for DescriptorParser {
    type Cursor = ByteCursor<'a>;
    type Output = RawDescriptor<'a>;
    type Error = ParsicombError<'a>;

    fn parse(&self, cursor: Self::Cursor) -> Result<(Self::Output, Self::Cursor), Self::Error> {
        let (name, cursor) = parse_string().parse(cursor)?;
        let (n_dims, cursor) = u32_le().parse(cursor)?;

        // ntimes collects into a Vec, so refuse a rank the stream cannot hold
        // before anything is allocated for it.
        let (data, pos) = cursor.inner();
        if n_dims as u64 * 8 > data.len().saturating_sub(pos) as u64 {
            return Err(ParsicombError::UnexpectedEndOfFile(CodeLoc::new(data, pos)));
        }

        let (shape, cursor) = ntimes(n_dims as usize, u64_le()).parse(cursor)?;
        let (dtype_tag, cursor) = u32_le().parse(cursor)?;
        let (offset, cursor) = u64_le().parse(cursor)?;

        Ok((
            RawDescriptor {
                name,
                shape,
                dtype_tag,
                offset,
            },
            cursor,
        ))
    }
}
