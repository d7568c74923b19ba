//! File helpers: buffered writes and memory-mapped reads

use crate::error::GgufError;
use crate::types::{Metadata, TensorMap};
use crate::writer::{self, WriterOptions};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write metadata and tensors to a file, returning the number of bytes written
pub fn write_file(
    path: impl AsRef<Path>,
    metadata: &Metadata,
    tensors: &TensorMap,
    options: &WriterOptions,
) -> Result<u64, GgufError> {
    let path = path.as_ref();
    let layout = writer::plan(metadata, tensors, options)?;

    let mut out = BufWriter::new(File::create(path)?);
    let written = writer::write_planned(&mut out, metadata, tensors, &layout)?;
    out.flush()?;

    info!(
        path = %path.display(),
        tensors = layout.descriptors.len(),
        bytes = written,
        "wrote GGUF file"
    );
    Ok(written)
}

/// Memory-map a file for zero-copy parsing with [`crate::parse`]
///
/// The mapping is read-only. Modifying the file while it is mapped is
/// undefined behaviour, as with any `mmap`.
pub fn map_file(path: impl AsRef<Path>) -> Result<Mmap, GgufError> {
    let file = File::open(path)?;
    // SAFETY: read-only mapping; callers must not truncate or rewrite the
    // file while the returned Mmap (or any view borrowed from it) is alive.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap)
}
