//! ndarray integration for ggpack tensors
//!
//! Source tensors can be built from any ndarray of a supported element type,
//! and decoded f32 payloads can be read back as `ArrayD<f32>` (copied) or
//! `ArrayViewD<f32>` (zero-copy, when the payload happens to be aligned).
//!
//! Enable with the `ndarray` feature flag.

use crate::types::{DType, ElementType, Tensor, TensorView};
use half::{bf16, f16};
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Dimension, IxDyn};

/// Error type for ndarray conversions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdarrayError {
    /// Shape doesn't match data length, or doesn't fit in usize
    #[error("shape {shape:?} doesn't match data length {data_len}")]
    ShapeMismatch { shape: Vec<u64>, data_len: usize },
    /// Payload is not aligned for a zero-copy f32 view
    #[error("payload is not aligned for f32; use to_ndarray() to copy")]
    AlignmentError,
    /// Zero-copy views need the host to be little-endian
    #[error("zero-copy f32 views require a little-endian host")]
    ByteOrder,
}

/// Element types that can be stored in a source tensor
pub trait ArrayType: Copy + 'static {
    const ELEMENT_TYPE: ElementType;

    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! array_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayType for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

array_type! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f16 => F16,
    bf16 => BF16,
    f32 => F32,
    f64 => F64,
}

impl Tensor {
    /// Create a source tensor from any ndarray
    ///
    /// Elements are taken in logical (row-major) order, so transposed or
    /// sliced arrays are laid out densely without an extra copy step.
    pub fn from_ndarray<T, S, D>(arr: &ArrayBase<S, D>) -> Self
    where
        T: ArrayType,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape: Vec<u64> = arr.shape().iter().map(|&d| d as u64).collect();
        let mut data = Vec::with_capacity(arr.len() * T::ELEMENT_TYPE.element_size());
        for &v in arr.iter() {
            v.write_le(&mut data);
        }
        Tensor::new(T::ELEMENT_TYPE, shape, data)
    }
}

fn usize_shape(shape: &[u64], data_len: usize) -> Result<Vec<usize>, NdarrayError> {
    shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| NdarrayError::ShapeMismatch {
            shape: shape.to_vec(),
            data_len,
        })
}

impl<'a> TensorView<'a> {
    /// Convert to an owned ndarray ArrayD
    pub fn to_ndarray(&self) -> Result<ArrayD<f32>, NdarrayError> {
        let shape = usize_shape(&self.shape, self.data.len())?;
        ArrayD::from_shape_vec(IxDyn(&shape), self.to_f32_vec()).map_err(|_| {
            NdarrayError::ShapeMismatch {
                shape: self.shape.clone(),
                data_len: self.data.len(),
            }
        })
    }

    /// Try to create a zero-copy ndarray view
    ///
    /// Payloads carry no alignment padding, so this fails whenever the
    /// payload offset (plus the buffer's own address) is not a multiple of 4.
    pub fn try_as_ndarray(&self) -> Result<ArrayViewD<'a, f32>, NdarrayError> {
        debug_assert_eq!(self.dtype, DType::F32);
        if cfg!(target_endian = "big") {
            return Err(NdarrayError::ByteOrder);
        }

        let shape = usize_shape(&self.shape, self.data.len())?;
        let len: usize = shape.iter().product();
        if self.data.len() != len * 4 {
            return Err(NdarrayError::ShapeMismatch {
                shape: self.shape.clone(),
                data_len: self.data.len(),
            });
        }

        if (self.data.as_ptr() as usize) % std::mem::align_of::<f32>() != 0 {
            return Err(NdarrayError::AlignmentError);
        }

        // SAFETY:
        // - Alignment is checked above before the cast
        // - Length is validated above (shape matches data.len())
        // - f32 has no invalid bit patterns and the host is little-endian
        // - Lifetime 'a of the payload is carried into ArrayViewD<'a, f32>
        let slice = unsafe { std::slice::from_raw_parts(self.data.as_ptr() as *const f32, len) };

        ArrayViewD::from_shape(IxDyn(&shape), slice).map_err(|_| NdarrayError::ShapeMismatch {
            shape: self.shape.clone(),
            data_len: self.data.len(),
        })
    }
}
