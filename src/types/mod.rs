//! Core types for the ggpack format

mod dtype;
mod gguf;
mod header;
mod metadata;
mod tensor;

pub use dtype::{DType, ElementType};
pub use gguf::GgufView;
pub use header::{FormatHeader, HEADER_SIZE, MAGIC, PREAMBLE_SIZE, VERSION};
pub use metadata::Metadata;
pub(crate) use tensor::checked_num_elements;
pub use tensor::{Tensor, TensorDescriptor, TensorMap, TensorView};
