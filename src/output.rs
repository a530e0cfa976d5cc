//! Output path construction and file writing.
//!
//! The archive stores no filenames, only hashes, so every output name
//! is synthetic: three uppercase hex digits of the entry's index, plus
//! a sniffed suffix for files. The same archive always produces the
//! same tree of paths.

use crate::error::Result;
use crate::sniff;
use std::path::{Path, PathBuf};

/// Synthetic name component for an entry index: `{:03X}`.
pub fn index_name(index: usize) -> String {
    format!("{index:03X}")
}

/// Write one extracted payload under its directory.
///
/// Creates the directory chain on demand and names the file from its
/// index and sniffed extension. Returns the path written.
pub fn write_file(dir: &Path, index: usize, data: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}{}", index_name(index), sniff::guess_extension(data)));
    std::fs::write(&path, data)?;
    Ok(path)
}
