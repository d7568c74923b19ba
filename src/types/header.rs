//! Header constants and structure

/// Magic bytes identifying a ggpack file
pub const MAGIC: &[u8; 4] = b"GGUF";

/// Current (and only supported) format version
pub const VERSION: u32 = 3;

/// Header size in bytes (magic + version)
pub const HEADER_SIZE: usize = 8;

/// Header plus the tensor and metadata counts
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 16;

/// Decoded file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub version: u32,
    pub tensor_count: u64,
    pub metadata_count: u64,
}
