//! areamy error integration for ggpack
//!
//! This module provides conversions from ggpack errors to areamy's AnyErr trait.
//!
//! Enable with the `areamy` feature flag.

use crate::error::{EncodingError, GgufError};
use areamy::error::AnyErr;

impl AnyErr for GgufError {}

impl From<GgufError> for Box<dyn AnyErr> {
    fn from(value: GgufError) -> Self {
        Box::new(value)
    }
}

impl AnyErr for EncodingError {}

impl From<EncodingError> for Box<dyn AnyErr> {
    fn from(value: EncodingError) -> Self {
        Box::new(value)
    }
}

// NdarrayError integration (when both areamy and ndarray features are enabled)
#[cfg(feature = "ndarray")]
mod ndarray_errors {
    use crate::ndarray_ext::NdarrayError;
    use areamy::error::AnyErr;

    impl AnyErr for NdarrayError {}

    impl From<NdarrayError> for Box<dyn AnyErr> {
        fn from(value: NdarrayError) -> Self {
            Box::new(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metadata, Tensor, TensorMap};
    use crate::{parse, writer};

    fn decode_kernel_size(bytes: &[u8]) -> Result<u32, Box<dyn AnyErr>> {
        let view = parse(bytes)?;
        Ok(view.metadata_as("kernel_size").unwrap_or(0))
    }

    #[test]
    fn gguf_error_to_anyerr() {
        let err = GgufError::UnsupportedVersion(2);
        let boxed: Box<dyn AnyErr> = err.into();
        assert!(boxed.to_string().contains("unsupported GGUF version"));
    }

    #[test]
    fn question_mark_converts() {
        let mut tensors = TensorMap::new();
        tensors.push("w", Tensor::full(vec![1], 0.0));
        let mut meta = Metadata::new();
        meta.push("kernel_size", 7);
        let bytes = writer::to_bytes(&meta, &tensors).unwrap();

        assert_eq!(decode_kernel_size(&bytes).unwrap(), 7);
        assert!(decode_kernel_size(&bytes[..10]).is_err());
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn ndarray_error_to_anyerr() {
        use crate::ndarray_ext::NdarrayError;

        let boxed: Box<dyn AnyErr> = NdarrayError::AlignmentError.into();
        assert!(boxed.to_string().contains("not aligned"));
    }
}
