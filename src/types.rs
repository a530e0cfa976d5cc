//! Core types for the BOLT extractor.
//!
//! This module defines the algorithm selector, endianness, extraction
//! options, and the structured report types produced by a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Platform decompression algorithm selector.
///
/// Chooses the header layout, the decompressor, and the default byte
/// order for the archive's integer fields. N64 and Xbox share a
/// decompressor but differ in header layout and directory-child-count
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Philips CD-i titles.
    Cdi,
    /// MS-DOS titles.
    Dos,
    /// Nintendo 64 and GBA cartridges.
    N64,
    /// Windows titles.
    Win,
    /// Original Xbox titles (N64 decompressor, widened header).
    Xbox,
    /// Not resolvable from user input.
    Unknown,
}

impl Algorithm {
    /// Resolve an algorithm name or file extension.
    ///
    /// Accepts the aliases the original tooling accepted: `gba` and
    /// `z64` map to N64, `msdos` to DOS, `windows` to WIN.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "cdi" => Algorithm::Cdi,
            "dos" | "msdos" => Algorithm::Dos,
            "n64" | "gba" | "z64" => Algorithm::N64,
            "win" | "windows" => Algorithm::Win,
            "xbox" => Algorithm::Xbox,
            _ => Algorithm::Unknown,
        }
    }

    /// Byte order the platform conventionally uses for entry fields.
    pub fn default_endianness(&self) -> Endianness {
        match self {
            Algorithm::Cdi | Algorithm::N64 => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Whether the archive header uses the widened Xbox layout.
    pub fn uses_xbox_layout(&self) -> bool {
        matches!(self, Algorithm::Xbox)
    }

    /// Human-readable platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Cdi => "CD-i",
            Algorithm::Dos => "MS-DOS",
            Algorithm::N64 => "N64/GBA",
            Algorithm::Win => "Windows",
            Algorithm::Xbox => "Xbox",
            Algorithm::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Cdi => write!(f, "cdi"),
            Algorithm::Dos => write!(f, "dos"),
            Algorithm::N64 => write!(f, "n64"),
            Algorithm::Win => write!(f, "win"),
            Algorithm::Xbox => write!(f, "xbox"),
            Algorithm::Unknown => write!(f, "unknown"),
        }
    }
}

/// Byte order of an archive's integer fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Little-endian byte order.
    #[default]
    Little,
    /// Big-endian byte order.
    Big,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little"),
            Endianness::Big => write!(f, "big"),
        }
    }
}

bitflags::bitflags! {
    /// Flag bits of an archive entry record.
    ///
    /// Only bit 0x08 has a known meaning; the remaining bits are kept
    /// verbatim for the report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntryFlags: u8 {
        /// Payload is stored without compression.
        const UNCOMPRESSED = 0x08;
    }
}

/// Options controlling a single extraction run.
///
/// Endianness and the current algorithm are explicit values threaded
/// through the parser rather than process-wide state; both are fixed
/// before extraction begins.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Platform algorithm driving layout and decompression.
    pub algorithm: Algorithm,
    /// Byte order for entry fields. Defaults to the algorithm's
    /// convention; `force_big_endian` overrides it.
    pub endianness: Endianness,
}

impl ExtractOptions {
    /// Create options for an algorithm with its conventional byte order.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            endianness: algorithm.default_endianness(),
        }
    }

    /// Force big-endian entry fields regardless of platform convention.
    pub fn force_big_endian(mut self) -> Self {
        self.endianness = Endianness::Big;
        self
    }
}

/// Severity of a diagnostic note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLevel {
    /// Informational
    Info,
    /// Warning (non-fatal issue)
    Warning,
    /// Error (fatal issue handled gracefully)
    Error,
}

/// Diagnostic emitted while walking or decoding.
///
/// Per-file decoder failures are confined to their entry; the walker
/// records them here and continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Severity level
    pub level: NoteLevel,
    /// Note message
    pub message: String,
}

impl Note {
    /// Create an info note.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Info,
            message: message.into(),
        }
    }

    /// Create a warning note.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Warning,
            message: message.into(),
        }
    }

    /// Create an error note.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoteLevel::Error,
            message: message.into(),
        }
    }
}

/// Build timestamp stored in the archive header.
///
/// The millisecond field is absent from the Xbox layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Hour (0-23).
    pub hour: u8,
    /// Minute.
    pub minute: u8,
    /// Second.
    pub second: u8,
    /// Millisecond; `None` on the Xbox layout.
    pub millisecond: Option<u8>,
    /// Month.
    pub month: u8,
    /// Day of month.
    pub day: u8,
    /// Years since 1900.
    pub year: u8,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            1900 + u32::from(self.year),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Record of one extracted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path the file was written to.
    pub path: PathBuf,
    /// Index of the entry within its directory table.
    pub index: usize,
    /// `uncompressed_size` from the entry record.
    pub expected_size: usize,
    /// Bytes actually produced and written.
    pub written_size: usize,
    /// Whether the payload was stored without compression.
    pub stored: bool,
    /// Payload type hint from the entry record.
    pub file_type: u8,
    /// Content hash from the entry record (opaque).
    pub hash: u32,
}

/// Structured result of an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractReport {
    /// Absolute buffer offset of the archive signature.
    pub bolt_base: usize,
    /// Algorithm used for the run.
    pub algorithm: Algorithm,
    /// Byte order used for entry fields.
    pub endianness: Endianness,
    /// Build timestamp from the archive header.
    pub timestamp: Timestamp,
    /// Number of entries in the root table.
    pub root_entries: usize,
    /// One record per extracted file, in traversal order.
    pub files: Vec<FileRecord>,
    /// Diagnostics accumulated during the walk.
    pub notes: Vec<Note>,
}

impl ExtractReport {
    /// Number of files whose extraction raised a warning or error.
    pub fn problem_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| n.level != NoteLevel::Info)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_aliases() {
        assert_eq!(Algorithm::from_name("gba"), Algorithm::N64);
        assert_eq!(Algorithm::from_name("z64"), Algorithm::N64);
        assert_eq!(Algorithm::from_name("msdos"), Algorithm::Dos);
        assert_eq!(Algorithm::from_name("windows"), Algorithm::Win);
        assert_eq!(Algorithm::from_name("WIN"), Algorithm::Win);
        assert_eq!(Algorithm::from_name("psx"), Algorithm::Unknown);
    }

    #[test]
    fn test_default_endianness() {
        assert_eq!(Algorithm::Cdi.default_endianness(), Endianness::Big);
        assert_eq!(Algorithm::N64.default_endianness(), Endianness::Big);
        assert_eq!(Algorithm::Dos.default_endianness(), Endianness::Little);
        assert_eq!(Algorithm::Win.default_endianness(), Endianness::Little);
        assert_eq!(Algorithm::Xbox.default_endianness(), Endianness::Little);
    }

    #[test]
    fn test_options_override() {
        let opts = ExtractOptions::new(Algorithm::Dos).force_big_endian();
        assert_eq!(opts.endianness, Endianness::Big);
        let opts = ExtractOptions::new(Algorithm::Dos);
        assert_eq!(opts.endianness, Endianness::Little);
    }

    #[test]
    fn test_entry_flags() {
        let flags = EntryFlags::from_bits_retain(0x09);
        assert!(flags.contains(EntryFlags::UNCOMPRESSED));
        let flags = EntryFlags::from_bits_retain(0x01);
        assert!(!flags.contains(EntryFlags::UNCOMPRESSED));
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp {
            hour: 13,
            minute: 5,
            second: 9,
            millisecond: Some(20),
            month: 7,
            day: 4,
            year: 97,
        };
        assert_eq!(ts.to_string(), "1997-07-04 13:05:09");
    }
}
