//! Payload serialization with element narrowing to f32

use crate::types::{ElementType, Tensor};
use std::io::{self, Write};

/// Elements converted per write call
const CHUNK_ELEMENTS: usize = 2048;

/// Write a tensor's elements as little-endian f32
///
/// f32 sources are copied verbatim. Everything else is converted in
/// fixed-size chunks so large tensors never need a second full-size buffer.
pub fn write_payload<W: Write>(writer: &mut W, tensor: &Tensor) -> io::Result<()> {
    let element_type = tensor.element_type;
    if element_type == ElementType::F32 {
        return writer.write_all(&tensor.data);
    }

    let size = element_type.element_size();
    let mut buf = Vec::with_capacity(CHUNK_ELEMENTS * 4);
    for chunk in tensor.data.chunks(CHUNK_ELEMENTS * size) {
        buf.clear();
        for element in chunk.chunks_exact(size) {
            buf.extend_from_slice(&element_type.read_as_f32(element).to_le_bytes());
        }
        writer.write_all(&buf)?;
    }
    Ok(())
}
