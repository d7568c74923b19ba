//! ggpack - self-describing binary container for named f32 tensors
//!
//! Packs an ordered set of named tensors plus a table of scalar metadata
//! into a single GGUF-style file, and parses such files back without copying
//! tensor payloads. Designed for exporting model checkpoints to native
//! inference code.
//!
//! # Layout
//!
//! - Header: `"GGUF"` magic, `u32` version (3)
//! - Counts: `u64` tensor count, `u64` metadata count
//! - Metadata table: u32 length-prefixed key/value strings
//! - Descriptor table: name, dims, dtype tag, absolute payload offset
//! - Payloads: dense little-endian f32, back to back, ending at end-of-file
//!
//! All integers are little-endian. There is no padding anywhere.
//!
//! # Example
//!
//! ```rust
//! use ggpack::{Metadata, Tensor, TensorMap, parse, writer};
//!
//! let mut metadata = Metadata::new();
//! metadata.push("kernel_size", 5);
//!
//! let mut tensors = TensorMap::new();
//! tensors.push("w", Tensor::full(vec![2, 3], 1.0));
//!
//! let bytes = writer::to_bytes(&metadata, &tensors).unwrap();
//! let view = parse(&bytes).unwrap();
//!
//! assert_eq!(view.metadata_as::<u32>("kernel_size"), Some(5));
//! assert_eq!(view.tensor("w").unwrap().shape, vec![2, 3]);
//! ```

pub mod error;
pub mod fs;
pub mod parser;
pub mod types;
pub mod writer;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

#[cfg(feature = "areamy")]
pub mod areamy_ext;

// Re-export common types at crate root
pub use error::{EncodingError, ErrorKind, GgufError, Section};
pub use parser::parse;
pub use types::{
    DType, ElementType, FormatHeader, GgufView, HEADER_SIZE, MAGIC, Metadata, PREAMBLE_SIZE,
    Tensor, TensorDescriptor, TensorMap, TensorView, VERSION,
};
pub use writer::WriterOptions;

#[cfg(feature = "ndarray")]
pub use ndarray_ext::{ArrayType, NdarrayError};

/// Encode metadata and tensors with default options
pub fn encode(metadata: &Metadata, tensors: &TensorMap) -> Result<Vec<u8>, GgufError> {
    writer::to_bytes(metadata, tensors)
}

/// Decode a stream; alias of [`parse`]
pub fn decode(bytes: &[u8]) -> Result<GgufView<'_>, GgufError> {
    parse(bytes)
}
