//! Binary parser for the ggpack format
//!
//! Zero-copy parsing that returns views into the original byte buffer.
//! Decoding is one linear pass: header, counts, metadata table, descriptor
//! table, then payload placement. The first failure aborts the whole parse.

mod descriptor;
mod entry;
mod primitives;
mod string;

pub use descriptor::{RawDescriptor, parse_descriptor};
pub use entry::parse_entry;
pub use primitives::{take, u32_le, u64_le};
pub use string::parse_string;

use crate::error::{GgufError, Section};
use crate::types::{
    DType, FormatHeader, GgufView, MAGIC, TensorView, VERSION, checked_num_elements,
};
use parsicomb::{ByteCursor, Cursor, Parser, ParsicombError};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Attach a section to combinator errors
fn at<'a>(section: Section) -> impl FnOnce(ParsicombError<'a>) -> GgufError {
    move |e| GgufError::from_parse(e, section)
}

/// A descriptor whose dtype and placement have been checked
struct Placed<'a> {
    name: &'a str,
    shape: Vec<u64>,
    dtype: DType,
    offset: u64,
    size: u64,
}

/// Parse a ggpack stream from bytes
///
/// Returns a GgufView that borrows from the input bytes. For zero-copy
/// parsing from memory-mapped files, the bytes must remain valid for the
/// lifetime of the returned view.
pub fn parse(bytes: &[u8]) -> Result<GgufView<'_>, GgufError> {
    let cursor = ByteCursor::new(bytes);

    // Header
    let (magic, cursor) = take(4).parse(cursor).map_err(at(Section::Header))?;
    if magic != MAGIC {
        return Err(GgufError::InvalidMagic([magic[0], magic[1], magic[2], magic[3]]));
    }
    let (version, cursor) = u32_le().parse(cursor).map_err(at(Section::Header))?;
    if version != VERSION {
        return Err(GgufError::UnsupportedVersion(version));
    }

    // Counts
    let (tensor_count, cursor) = u64_le().parse(cursor).map_err(at(Section::Counts))?;
    let (metadata_count, mut cursor) = u64_le().parse(cursor).map_err(at(Section::Counts))?;

    // Metadata table. Counts are untrusted, so nothing is preallocated from them.
    let mut metadata = Vec::new();
    let mut keys = HashSet::new();
    for index in 0..metadata_count {
        let section = Section::Metadata(index);
        let ((key, value), next) = parse_entry().parse(cursor).map_err(at(section))?;
        if !keys.insert(key) {
            return Err(GgufError::DuplicateName {
                section,
                name: key.to_string(),
            });
        }
        metadata.push((key, value));
        cursor = next;
    }

    // Descriptor table
    let mut placed: Vec<Placed<'_>> = Vec::new();
    let mut names = HashSet::new();
    for index in 0..tensor_count {
        let section = Section::Descriptor(index);
        let (raw, next) = parse_descriptor().parse(cursor).map_err(at(section))?;
        cursor = next;

        let dtype = DType::from_u32(raw.dtype_tag).ok_or(GgufError::UnsupportedDType {
            index,
            tag: raw.dtype_tag,
        })?;
        if !names.insert(raw.name) {
            return Err(GgufError::DuplicateName {
                section,
                name: raw.name.to_string(),
            });
        }
        let size = checked_num_elements(&raw.shape)
            .and_then(|n| n.checked_mul(dtype.element_size() as u64))
            .ok_or(GgufError::SizeOverflow { index })?;

        if let Some(prev) = placed.last() {
            if raw.offset < prev.offset {
                return Err(GgufError::NonMonotonicOffset {
                    index,
                    previous: prev.offset,
                    actual: raw.offset,
                });
            }
            let expected = prev
                .offset
                .checked_add(prev.size)
                .ok_or(GgufError::SizeOverflow { index: index - 1 })?;
            if raw.offset != expected {
                return Err(GgufError::MisplacedPayload {
                    index,
                    expected,
                    actual: raw.offset,
                });
            }
        }

        trace!(
            index,
            name = raw.name,
            shape = ?raw.shape,
            offset = raw.offset,
            "tensor descriptor"
        );
        placed.push(Placed {
            name: raw.name,
            shape: raw.shape,
            dtype,
            offset: raw.offset,
            size,
        });
    }

    // Payloads start right after the descriptor table
    let (_, data_start) = cursor.inner();
    let data_start = data_start as u64;
    if let Some(first) = placed.first() {
        if first.offset != data_start {
            return Err(GgufError::MisplacedPayload {
                index: 0,
                expected: data_start,
                actual: first.offset,
            });
        }
    }

    let total = bytes.len() as u64;
    let mut end = data_start;
    let mut tensors = Vec::with_capacity(placed.len());
    for (index, p) in placed.into_iter().enumerate() {
        let index = index as u64;
        end = p
            .offset
            .checked_add(p.size)
            .ok_or(GgufError::SizeOverflow { index })?;
        if end > total {
            return Err(GgufError::Truncated {
                section: Section::Payload(index),
                position: bytes.len(),
            });
        }
        tensors.push(TensorView {
            name: p.name,
            shape: p.shape,
            dtype: p.dtype,
            offset: p.offset,
            data: &bytes[p.offset as usize..end as usize],
        });
    }
    if end < total {
        return Err(GgufError::TrailingBytes(total - end));
    }

    debug!(
        version,
        tensors = tensor_count,
        metadata = metadata_count,
        bytes = bytes.len(),
        "parsed GGUF stream"
    );

    Ok(GgufView {
        header: FormatHeader {
            version,
            tensor_count,
            metadata_count,
        },
        metadata,
        tensors,
    })
}
