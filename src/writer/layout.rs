//! Sizing pass: validates writer input and places every payload
//!
//! Nothing is written here. The descriptor table size is summed first so
//! the base data offset is known before the first descriptor is emitted,
//! which lets the writer run as a single forward pass over any `io::Write`.

use super::WriterOptions;
use crate::error::EncodingError;
use crate::types::{
    DType, Metadata, PREAMBLE_SIZE, TensorDescriptor, TensorMap, checked_num_elements,
};
use std::collections::HashSet;

/// Placement of every tensor in the output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Descriptors in table order, offsets filled in
    pub descriptors: Vec<TensorDescriptor>,
    /// Absolute offset of the first payload (end of the descriptor table)
    pub data_offset: u64,
    /// Total stream length
    pub total_size: u64,
}

fn check_prefix(what: &'static str, len: usize) -> Result<(), EncodingError> {
    if u32::try_from(len).is_err() {
        return Err(EncodingError::TooLong { what, len });
    }
    Ok(())
}

fn metadata_table_size(metadata: &Metadata) -> Result<u64, EncodingError> {
    let mut keys = HashSet::new();
    let mut size = 0u64;
    for (index, (key, value)) in metadata.iter().enumerate() {
        if key.is_empty() {
            return Err(EncodingError::EmptyKey { index });
        }
        if !keys.insert(key) {
            return Err(EncodingError::DuplicateKey {
                index,
                key: key.to_string(),
            });
        }
        check_prefix("metadata key", key.len())?;
        check_prefix("metadata value", value.len())?;
        size += (4 + key.len() + 4 + value.len()) as u64;
    }
    Ok(size)
}

/// Validate the input and compute the offset of every payload
pub fn plan(
    metadata: &Metadata,
    tensors: &TensorMap,
    options: &WriterOptions,
) -> Result<Layout, EncodingError> {
    let dtype = DType::F32;
    let metadata_size = metadata_table_size(metadata)?;

    // Validation and descriptor table size
    let mut names = HashSet::new();
    let mut table_size = 0u64;
    let mut payload_sizes = Vec::with_capacity(tensors.len());
    for (index, (name, tensor)) in tensors.iter().enumerate() {
        if name.is_empty() {
            return Err(EncodingError::EmptyTensorName { index });
        }
        if !names.insert(name) {
            return Err(EncodingError::DuplicateTensorName {
                index,
                name: name.to_string(),
            });
        }
        check_prefix("tensor name", name.len())?;
        check_prefix("tensor rank", tensor.shape.len())?;

        let element_type = tensor.element_type;
        if !element_type.is_exact_in_f32() && !options.allow_lossy_narrowing {
            return Err(EncodingError::LossyNarrowing {
                name: name.to_string(),
                element_type,
            });
        }

        let overflow = || EncodingError::SizeOverflow {
            name: name.to_string(),
            shape: tensor.shape.clone(),
        };
        let numel = checked_num_elements(&tensor.shape).ok_or_else(overflow)?;
        let source_size = numel
            .checked_mul(element_type.element_size() as u64)
            .ok_or_else(overflow)?;
        if source_size != tensor.data.len() as u64 {
            return Err(EncodingError::DataSizeMismatch {
                name: name.to_string(),
                expected: source_size,
                actual: tensor.data.len() as u64,
            });
        }
        let payload_size = numel
            .checked_mul(dtype.element_size() as u64)
            .ok_or_else(overflow)?;

        table_size += TensorDescriptor::encoded_size(name.len(), tensor.shape.len());
        payload_sizes.push(payload_size);
    }

    let data_offset = PREAMBLE_SIZE as u64 + metadata_size + table_size;

    // Running offsets, same order as the table
    let mut offset = data_offset;
    let mut descriptors = Vec::with_capacity(tensors.len());
    for ((name, tensor), size) in tensors.iter().zip(payload_sizes) {
        descriptors.push(TensorDescriptor {
            name: name.to_string(),
            shape: tensor.shape.clone(),
            dtype,
            offset,
        });
        offset = offset
            .checked_add(size)
            .ok_or_else(|| EncodingError::SizeOverflow {
                name: name.to_string(),
                shape: tensor.shape.clone(),
            })?;
    }

    Ok(Layout {
        descriptors,
        data_offset,
        total_size: offset,
    })
}
