//! Serialization of metadata and tensors

mod layout;
mod payload;
mod table;

pub use layout::{Layout, plan};

use crate::error::GgufError;
use crate::types::{MAGIC, Metadata, TensorMap, VERSION};
use std::io::Write;
use tracing::debug;

use payload::write_payload;
use table::{write_descriptor, write_metadata};

/// Writer policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Accept source element types that cannot be represented exactly as f32
    /// (u32, i32, u64, i64, f64) and round them to the nearest f32.
    pub allow_lossy_narrowing: bool,
}

impl WriterOptions {
    pub fn allow_lossy_narrowing(mut self, allow: bool) -> Self {
        self.allow_lossy_narrowing = allow;
        self
    }
}

/// Write metadata and tensors to a writer with default options
///
/// Returns the number of bytes written.
pub fn write<W: Write>(
    writer: &mut W,
    metadata: &Metadata,
    tensors: &TensorMap,
) -> Result<u64, GgufError> {
    write_with(writer, metadata, tensors, &WriterOptions::default())
}

/// Write metadata and tensors to a writer
///
/// All input validation happens before the first byte is written, so an
/// `Encoding` error never leaves partial output behind.
pub fn write_with<W: Write>(
    writer: &mut W,
    metadata: &Metadata,
    tensors: &TensorMap,
    options: &WriterOptions,
) -> Result<u64, GgufError> {
    let layout = plan(metadata, tensors, options)?;
    write_planned(writer, metadata, tensors, &layout)
}

pub(crate) fn write_planned<W: Write>(
    writer: &mut W,
    metadata: &Metadata,
    tensors: &TensorMap,
    layout: &Layout,
) -> Result<u64, GgufError> {
    // Header
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;

    // Counts
    writer.write_all(&(tensors.len() as u64).to_le_bytes())?;
    writer.write_all(&(metadata.len() as u64).to_le_bytes())?;

    write_metadata(writer, metadata)?;

    for desc in &layout.descriptors {
        write_descriptor(writer, desc)?;
    }

    for (_, tensor) in tensors.iter() {
        write_payload(writer, tensor)?;
    }

    debug!(
        tensors = tensors.len(),
        metadata = metadata.len(),
        data_offset = layout.data_offset,
        bytes = layout.total_size,
        "wrote GGUF stream"
    );

    Ok(layout.total_size)
}

/// Write metadata and tensors to bytes with default options
pub fn to_bytes(metadata: &Metadata, tensors: &TensorMap) -> Result<Vec<u8>, GgufError> {
    to_bytes_with(metadata, tensors, &WriterOptions::default())
}

/// Write metadata and tensors to bytes
pub fn to_bytes_with(
    metadata: &Metadata,
    tensors: &TensorMap,
    options: &WriterOptions,
) -> Result<Vec<u8>, GgufError> {
    let layout = plan(metadata, tensors, options)?;
    let mut buf = Vec::with_capacity(layout.total_size as usize);
    write_planned(&mut buf, metadata, tensors, &layout)?;
    Ok(buf)
}
