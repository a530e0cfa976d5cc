//! BOLT Extract - Embedded Game Archive Extraction
//!
//! This library locates and unpacks BOLT archives, the middleware
//! container embedded in a range of console and PC game binaries
//! (N64/GBA cartridges, CD-i images, MS-DOS executables, Windows and
//! Xbox binaries).
//!
//! # Features
//!
//! - **Container location**: Finds the `BOLT`/`bolt` signature anywhere
//!   inside a host binary
//! - **Four decompressors**: CD-i, MS-DOS, N64/GBA/Xbox, and Windows
//!   opcode-driven LZ variants
//! - **Deterministic output**: Index-based synthetic paths, identical
//!   across runs
//! - **Damage tolerance**: Per-file decoder failures keep their partial
//!   output and never abort the walk
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bolt_extract::{extract_file, Algorithm, ExtractOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ExtractOptions::new(Algorithm::N64);
//!     let report = extract_file("game.z64", "game_out", &options)?;
//!     println!("extracted {} files", report.files.len());
//!     for note in &report.notes {
//!         eprintln!("{}", note.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Archive Layout
//!
//! An archive starts at the first signature hit (the *bolt base*): a
//! 16-byte header, then a table of 16-byte entries. Entries with a
//! zero hash are directories whose children form another table; the
//! rest are files, stored raw or compressed with the platform's
//! algorithm. All archive offsets are relative to the bolt base.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

pub mod container;
pub mod decompress;
pub mod error;
pub mod output;
pub mod sniff;
pub mod types;

pub use error::{BoltError, Result};
pub use types::{
    Algorithm, Endianness, EntryFlags, ExtractOptions, ExtractReport, FileRecord, Note, NoteLevel,
    Timestamp,
};

use std::path::Path;

/// Extract a BOLT archive from a host binary on disk.
///
/// Reads the whole file, locates the archive, and writes every entry
/// under `out_root` (created if missing).
///
/// # Arguments
///
/// * `input` - Path to the host binary
/// * `out_root` - Root directory for the extracted tree
/// * `options` - Algorithm and endianness selection
///
/// # Returns
///
/// * `Ok(ExtractReport)` - The run finished; per-file issues are notes
/// * `Err(BoltError)` - The file could not be read, no signature was
///   found, or the archive header was unparseable
///
/// # Example
///
/// ```rust,no_run
/// use bolt_extract::{extract_file, Algorithm, ExtractOptions};
///
/// let options = ExtractOptions::new(Algorithm::Win);
/// let report = extract_file("LIFE.EXE", "LIFE", &options)?;
/// # Ok::<(), bolt_extract::BoltError>(())
/// ```
pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out_root: Q,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let data = std::fs::read(input)?;
    extract_bytes(&data, out_root.as_ref(), options)
}

/// Extract a BOLT archive from an in-memory host binary.
///
/// The buffer is never mutated; every produced payload is freshly
/// allocated.
///
/// # Errors
///
/// Fails on container-level problems only: an unknown algorithm, a
/// missing signature, or a truncated header. Decoder and write
/// failures for individual entries are reported as notes.
pub fn extract_bytes(
    data: &[u8],
    out_root: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    if options.algorithm == Algorithm::Unknown {
        return Err(BoltError::AlgorithmUnknown {
            name: "unknown".to_string(),
        });
    }
    let archive = container::Archive::locate_in(data)?;
    container::walker::extract(&archive, options, out_root)
}

/// Locate the bolt base in a host binary without extracting.
///
/// # Errors
///
/// Returns [`BoltError::NoMagic`] when neither signature form occurs.
pub fn locate_archive(data: &[u8]) -> Result<usize> {
    container::locate(data)
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_locate_archive() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(b"BOLT");
        assert_eq!(locate_archive(&data).unwrap(), 4);
        assert!(matches!(
            locate_archive(&[0u8; 16]),
            Err(BoltError::NoMagic)
        ));
    }

    #[test]
    fn test_extract_bytes_rejects_unknown_algorithm() {
        let tmp = tempfile::tempdir().unwrap();
        let options = ExtractOptions::new(Algorithm::Unknown);
        let err = extract_bytes(b"BOLT", tmp.path(), &options).unwrap_err();
        assert!(matches!(err, BoltError::AlgorithmUnknown { .. }));
    }

    #[test]
    fn test_extract_bytes_no_magic() {
        let tmp = tempfile::tempdir().unwrap();
        let options = ExtractOptions::new(Algorithm::Dos);
        let err = extract_bytes(&[0u8; 64], tmp.path(), &options).unwrap_err();
        assert!(matches!(err, BoltError::NoMagic));
    }

    #[test]
    fn test_extract_bytes_end_to_end() {
        // Minimal archive: header, one stored entry, payload.
        let mut data = Vec::new();
        data.extend_from_slice(b"BOLT");
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7]); // timestamp
        data.push(1); // one root entry
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[0x08, 0, 0, 1]); // stored file
        data.extend_from_slice(&3u32.to_le_bytes()); // size
        data.extend_from_slice(&32u32.to_le_bytes()); // offset
        data.extend_from_slice(&0x42u32.to_le_bytes()); // hash
        data.extend_from_slice(b"abc");

        let tmp = tempfile::tempdir().unwrap();
        let options = ExtractOptions::new(Algorithm::Win);
        let report = extract_bytes(&data, tmp.path(), &options).unwrap();
        assert_eq!(report.bolt_base, 0);
        assert_eq!(report.root_entries, 1);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.timestamp.to_string(), "1907-05-06 01:02:03");
        assert_eq!(
            std::fs::read(tmp.path().join("000.txt")).unwrap(),
            b"abc".to_vec()
        );
    }
}
