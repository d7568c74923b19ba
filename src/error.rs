//! Error types for ggpack

use crate::types::{ElementType, VERSION};
use parsicomb::ParsicombError;
use std::fmt;
use std::io;

/// Region of the stream a decode error was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Counts,
    /// Metadata entry by index
    Metadata(u64),
    /// Tensor descriptor by index
    Descriptor(u64),
    /// Tensor payload by descriptor index
    Payload(u64),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "header"),
            Section::Counts => write!(f, "counts"),
            Section::Metadata(i) => write!(f, "metadata entry {}", i),
            Section::Descriptor(i) => write!(f, "tensor descriptor {}", i),
            Section::Payload(i) => write!(f, "tensor payload {}", i),
        }
    }
}

/// Coarse classification of [`GgufError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad magic, unsupported version or dtype, malformed or duplicate fields
    Format,
    /// Stream shorter than its declared counts and lengths require
    Truncated,
    /// Invalid input handed to the writer
    Encoding,
    /// Descriptor offsets inconsistent with the payload layout
    OffsetConsistency,
    Io,
}

/// Invalid writer input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("metadata entry {index} has an empty key")]
    EmptyKey { index: usize },
    #[error("metadata entry {index} repeats key {key:?}")]
    DuplicateKey { index: usize, key: String },
    #[error("tensor {index} has an empty name")]
    EmptyTensorName { index: usize },
    #[error("tensor {index} repeats name {name:?}")]
    DuplicateTensorName { index: usize, name: String },
    #[error("tensor {name:?} has {element_type} elements; narrowing to f32 is lossy and was not allowed")]
    LossyNarrowing {
        name: String,
        element_type: ElementType,
    },
    #[error("tensor {name:?} data size mismatch: expected {expected} bytes, got {actual}")]
    DataSizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },
    #[error("tensor {name:?} shape {shape:?} overflows the file size")]
    SizeOverflow { name: String, shape: Vec<u64> },
    #[error("{what} length {len} does not fit a u32 length prefix")]
    TooLong { what: &'static str, len: usize },
}

/// ggpack error type
#[derive(Debug, thiserror::Error)]
pub enum GgufError {
    #[error("invalid magic bytes {0:02X?}, not a GGUF file")]
    InvalidMagic([u8; 4]),
    #[error("unsupported GGUF version: {0}, expected {expected}", expected = VERSION)]
    UnsupportedVersion(u32),
    #[error("unsupported dtype tag {tag} in tensor descriptor {index}")]
    UnsupportedDType { index: u64, tag: u32 },
    #[error("{message} in {section} at position {position}")]
    Malformed {
        section: Section,
        position: usize,
        message: String,
    },
    #[error("duplicate name {name:?} in {section}")]
    DuplicateName { section: Section, name: String },
    #[error("truncated input in {section} at position {position}")]
    Truncated { section: Section, position: usize },
    #[error("tensor {index} offset {actual} is below the previous offset {previous}")]
    NonMonotonicOffset { index: u64, previous: u64, actual: u64 },
    #[error("tensor {index} payload at offset {actual}, expected {expected}")]
    MisplacedPayload { index: u64, expected: u64, actual: u64 },
    #[error("tensor {index} payload size overflows u64")]
    SizeOverflow { index: u64 },
    #[error("{0} trailing bytes after the final tensor payload")]
    TrailingBytes(u64),
    #[error("invalid encoder input: {0}")]
    Encoding(#[from] EncodingError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GgufError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GgufError::InvalidMagic(_)
            | GgufError::UnsupportedVersion(_)
            | GgufError::UnsupportedDType { .. }
            | GgufError::Malformed { .. }
            | GgufError::DuplicateName { .. } => ErrorKind::Format,
            GgufError::Truncated { .. } => ErrorKind::Truncated,
            GgufError::NonMonotonicOffset { .. }
            | GgufError::MisplacedPayload { .. }
            | GgufError::SizeOverflow { .. }
            | GgufError::TrailingBytes(_) => ErrorKind::OffsetConsistency,
            GgufError::Encoding(_) => ErrorKind::Encoding,
            GgufError::Io(_) => ErrorKind::Io,
        }
    }

    /// Translate a combinator failure, attaching the section being decoded
    pub(crate) fn from_parse(err: ParsicombError<'_>, section: Section) -> Self {
        match err {
            ParsicombError::UnexpectedEndOfFile(loc) => GgufError::Truncated {
                section,
                position: loc.position(),
            },
            ParsicombError::SyntaxError { message, loc } => GgufError::Malformed {
                section,
                position: loc.position(),
                message: message.to_string(),
            },
            #[allow(unreachable_patterns)]
            other => GgufError::Malformed {
                section,
                position: 0,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsicomb::CodeLoc;
    use std::borrow::Cow;

    #[test]
    fn kinds() {
        assert_eq!(GgufError::InvalidMagic(*b"GGML").kind(), ErrorKind::Format);
        assert_eq!(GgufError::TrailingBytes(3).kind(), ErrorKind::OffsetConsistency);
        let enc: GgufError = EncodingError::EmptyKey { index: 0 }.into();
        assert_eq!(enc.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn translates_end_of_file() {
        let data = [0u8; 4];
        let err = ParsicombError::UnexpectedEndOfFile(CodeLoc::new(&data[..], 2));
        let err = GgufError::from_parse(err, Section::Metadata(1));
        assert!(matches!(
            err,
            GgufError::Truncated {
                section: Section::Metadata(1),
                position: 2
            }
        ));
    }

    #[test]
    fn translates_syntax_error() {
        let data = [0u8; 4];
        let err = ParsicombError::SyntaxError {
            message: Cow::Borrowed("Invalid UTF-8 in string"),
            loc: CodeLoc::new(&data[..], 1),
        };
        let err = GgufError::from_parse(err, Section::Descriptor(0));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("tensor descriptor 0"));
    }

    #[test]
    fn messages_name_the_field() {
        let err = GgufError::Truncated {
            section: Section::Payload(2),
            position: 100,
        };
        assert_eq!(
            err.to_string(),
            "truncated input in tensor payload 2 at position 100"
        );
    }
}
