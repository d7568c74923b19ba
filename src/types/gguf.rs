//! Decoded file view

use super::{FormatHeader, Metadata, TensorDescriptor, TensorMap, TensorView};
use std::fmt;
use std::str::FromStr;

/// Parsed file - references data in the underlying buffer (zero-copy)
#[derive(Debug, Clone, PartialEq)]
pub struct GgufView<'a> {
    pub header: FormatHeader,
    pub metadata: Vec<(&'a str, &'a str)>,
    pub tensors: Vec<TensorView<'a>>,
}

impl<'a> GgufView<'a> {
    /// Look up a metadata value by key
    pub fn metadata(&self, key: &str) -> Option<&'a str> {
        self.metadata
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Look up a metadata value and parse it (e.g. `"5"` as `u32`)
    pub fn metadata_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.metadata(key)?.parse().ok()
    }

    /// Look up a tensor by name
    pub fn tensor(&self, name: &str) -> Option<&TensorView<'a>> {
        self.tensors.iter().find(|t| t.name == name)
    }

    /// Descriptors in table order
    pub fn descriptors(&self) -> Vec<TensorDescriptor> {
        self.tensors.iter().map(|t| t.descriptor()).collect()
    }

    /// Absolute offset where the payload section begins
    pub fn data_offset(&self) -> Option<u64> {
        self.tensors.first().map(|t| t.offset)
    }

    /// Copy into owned metadata and f32 tensors, preserving order
    pub fn to_owned(&self) -> (Metadata, TensorMap) {
        let metadata = self.metadata.iter().map(|&(k, v)| (k, v)).collect();
        let tensors = self.tensors.iter().map(|t| (t.name, t.to_owned())).collect();
        (metadata, tensors)
    }
}

impl fmt::Display for GgufView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GGUF v{}: {} tensors, {} metadata entries",
            self.header.version,
            self.tensors.len(),
            self.metadata.len()
        )?;
        for (key, value) in &self.metadata {
            writeln!(f, "  {} = {}", key, value)?;
        }
        for t in &self.tensors {
            writeln!(
                f,
                "  {}: {} {:?} @ {}",
                t.name, t.dtype, t.shape, t.offset
            )?;
        }
        Ok(())
    }
}
