//! Element types: the on-disk dtype tag and the in-memory source types

use half::{bf16, f16};
use std::fmt;

/// Dtype tag stored in a tensor descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DType {
    F32 = 0,
}

impl DType {
    /// Size in bytes of a single stored element.
    ///
    /// Used for both the encoder's offset layout and the decoder's
    /// payload bounds, so the two can never disagree.
    pub fn element_size(self) -> u32 {
        match self {
            DType::F32 => 4,
        }
    }

    /// Try to convert from the on-disk tag. Every other value is reserved.
    pub fn from_u32(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(DType::F32),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
        }
    }
}

/// Element type of a source tensor handed to the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F16,
    BF16,
    F32,
    F64,
}

impl ElementType {
    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 | ElementType::F16 | ElementType::BF16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
            ElementType::U64 | ElementType::I64 | ElementType::F64 => 8,
        }
    }

    /// Whether every value of this type has an exact f32 representation
    pub fn is_exact_in_f32(self) -> bool {
        match self {
            ElementType::U8
            | ElementType::I8
            | ElementType::U16
            | ElementType::I16
            | ElementType::F16
            | ElementType::BF16
            | ElementType::F32 => true,
            ElementType::U32
            | ElementType::I32
            | ElementType::U64
            | ElementType::I64
            | ElementType::F64 => false,
        }
    }

    /// Decode one little-endian element as f32.
    ///
    /// `bytes` must be exactly `element_size()` long.
    pub(crate) fn read_as_f32(self, bytes: &[u8]) -> f32 {
        match self {
            ElementType::U8 => bytes[0] as f32,
            ElementType::I8 => bytes[0] as i8 as f32,
            ElementType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
            ElementType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
            ElementType::F16 => f16::from_le_bytes([bytes[0], bytes[1]]).to_f32(),
            ElementType::BF16 => bf16::from_le_bytes([bytes[0], bytes[1]]).to_f32(),
            ElementType::U32 => u32::from_le_bytes(le4(bytes)) as f32,
            ElementType::I32 => i32::from_le_bytes(le4(bytes)) as f32,
            ElementType::F32 => f32::from_le_bytes(le4(bytes)),
            ElementType::U64 => u64::from_le_bytes(le8(bytes)) as f32,
            ElementType::I64 => i64::from_le_bytes(le8(bytes)) as f32,
            ElementType::F64 => f64::from_le_bytes(le8(bytes)) as f32,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
            ElementType::U16 => "u16",
            ElementType::I16 => "i16",
            ElementType::U32 => "u32",
            ElementType::I32 => "i32",
            ElementType::U64 => "u64",
            ElementType::I64 => "i64",
            ElementType::F16 => "f16",
            ElementType::BF16 => "bf16",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        };
        f.write_str(name)
    }
}

fn le4(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

fn le8(bytes: &[u8]) -> [u8; 8] {
    [
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_tags() {
        assert_eq!(DType::from_u32(0), Some(DType::F32));
        assert_eq!(DType::from_u32(1), None);
        assert_eq!(DType::from_u32(u32::MAX), None);
        assert_eq!(DType::F32 as u32, 0);
        assert_eq!(DType::F32.element_size(), 4);
    }

    #[test]
    fn exact_widening() {
        assert_eq!(ElementType::I8.read_as_f32(&(-3i8).to_le_bytes()), -3.0);
        assert_eq!(ElementType::U16.read_as_f32(&65535u16.to_le_bytes()), 65535.0);
        assert_eq!(
            ElementType::F16.read_as_f32(&f16::from_f32(0.5).to_le_bytes()),
            0.5
        );
        assert_eq!(
            ElementType::BF16.read_as_f32(&bf16::from_f32(-2.0).to_le_bytes()),
            -2.0
        );
    }

    #[test]
    fn lossy_narrowing_rounds() {
        let v = 0.1f64;
        assert_eq!(ElementType::F64.read_as_f32(&v.to_le_bytes()), 0.1f32);
        assert_eq!(
            ElementType::I64.read_as_f32(&(1i64 << 40).to_le_bytes()),
            (1u64 << 40) as f32
        );
        assert!(!ElementType::F64.is_exact_in_f32());
        assert!(ElementType::BF16.is_exact_in_f32());
    }

    #[test]
    fn element_sizes() {
        assert_eq!(ElementType::U8.element_size(), 1);
        assert_eq!(ElementType::BF16.element_size(), 2);
        assert_eq!(ElementType::F32.element_size(), 4);
        assert_eq!(ElementType::I64.element_size(), 8);
    }
}
