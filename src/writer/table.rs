//! Metadata and descriptor table serialization

use crate::types::{Metadata, TensorDescriptor};
use std::io::{self, Write};

/// Write a u32 length-prefixed UTF-8 string
///
/// Lengths were checked against `u32::MAX` by the layout pass.
pub fn write_string<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    let bytes = s.as_bytes();
    writer.write_all(&(bytes.len() as u32).to_le_bytes())?;
    writer.write_all(bytes)
}

/// Write every metadata entry in order
pub fn write_metadata<W: Write>(writer: &mut W, metadata: &Metadata) -> io::Result<()> {
    for (key, value) in metadata.iter() {
        write_string(writer, key)?;
        write_string(writer, value)?;
    }
    Ok(())
}

/// Write one descriptor record
pub fn write_descriptor<W: Write>(writer: &mut W, desc: &TensorDescriptor) -> io::Result<()> {
    write_string(writer, &desc.name)?;
    writer.write_all(&(desc.shape.len() as u32).to_le_bytes())?;
    for dim in &desc.shape {
        writer.write_all(&dim.to_le_bytes())?;
    }
    writer.write_all(&(desc.dtype as u32).to_le_bytes())?;
    writer.write_all(&desc.offset.to_le_bytes())?;
    Ok(())
}
