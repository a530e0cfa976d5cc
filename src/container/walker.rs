//! Depth-first archive traversal and extraction.
//!
//! Entries are visited exactly once, left to right, index ascending.
//! Directory entries append their three-hex-digit index to the output
//! path and recurse into the child table; file entries are extracted
//! and written. Decoder failures are confined to their entry: the
//! error becomes a note, the partial output is still written, and the
//! walk moves on.

use crate::container::entry::{Entry, ENTRY_SIZE};
use crate::container::header::ArchiveHeader;
use crate::container::Archive;
use crate::decompress::{self, Cursor};
use crate::error::{BoltError, Result};
use crate::output;
use crate::types::{ExtractOptions, ExtractReport, FileRecord, Note};
use std::path::Path;

/// Directory nesting cap. Real archives are a few levels deep; going
/// past this means the entry table loops back on itself.
const MAX_DEPTH: usize = 32;

/// Extract every entry of an archive under `out_root`.
///
/// Container-level failures (header truncation) are returned as
/// errors; per-entry failures are recorded as notes in the report.
pub fn extract(
    archive: &Archive<'_>,
    options: &ExtractOptions,
    out_root: &Path,
) -> Result<ExtractReport> {
    let header = ArchiveHeader::parse(archive, options.algorithm, options.endianness)?;
    std::fs::create_dir_all(out_root)?;
    let mut report = ExtractReport {
        bolt_base: archive.base(),
        algorithm: options.algorithm,
        endianness: options.endianness,
        timestamp: header.timestamp,
        root_entries: header.root_entry_count(),
        files: Vec::new(),
        notes: Vec::new(),
    };
    walk_table(
        archive,
        options,
        header.entries_offset(),
        header.root_entry_count(),
        out_root,
        0,
        &mut report,
    );
    Ok(report)
}

/// Walk one entry table, recursing into directories.
fn walk_table(
    archive: &Archive<'_>,
    options: &ExtractOptions,
    table_offset: u32,
    count: usize,
    dir: &Path,
    depth: usize,
    report: &mut ExtractReport,
) {
    if depth >= MAX_DEPTH {
        report.notes.push(Note::error(format!(
            "table at BOLT+0x{:X}: {}",
            table_offset,
            BoltError::DepthLimit { depth: MAX_DEPTH }
        )));
        return;
    }

    for index in 0..count {
        let offset = u64::from(table_offset) + (index * ENTRY_SIZE) as u64;
        let Ok(entry_offset) = u32::try_from(offset) else {
            report.notes.push(Note::error(format!(
                "entry {} at BOLT+0x{offset:X}: offset outside the archive's address range",
                output::index_name(index)
            )));
            break;
        };
        let entry = match Entry::parse(archive, entry_offset, options.endianness) {
            Ok(entry) => entry,
            Err(err) => {
                // The table itself runs out of the buffer; later
                // entries cannot be any better.
                report.notes.push(Note::error(format!(
                    "entry {} at BOLT+0x{entry_offset:X}: {err}",
                    output::index_name(index)
                )));
                break;
            }
        };

        if entry.is_directory() {
            let child_dir = dir.join(output::index_name(index));
            let children = entry.child_count(options.algorithm.uses_xbox_layout());
            walk_table(
                archive,
                options,
                entry.data_offset,
                children,
                &child_dir,
                depth + 1,
                report,
            );
        } else {
            extract_file(archive, options, &entry, index, dir, report);
        }
    }
}

/// Extract one file entry and write whatever was produced.
fn extract_file(
    archive: &Archive<'_>,
    options: &ExtractOptions,
    entry: &Entry,
    index: usize,
    dir: &Path,
    report: &mut ExtractReport,
) {
    let expected = entry.uncompressed_size as usize;
    let mut data = Vec::with_capacity(expected.min(archive.data().len()));

    if entry.is_stored() {
        match archive.bytes_at(entry.data_offset, expected) {
            Ok(bytes) => data.extend_from_slice(bytes),
            Err(err) => {
                file_note(report, entry, index, &err);
                // keep the in-bounds prefix as the partial result
                let abs = archive.abs(entry.data_offset).min(archive.data().len());
                let end = (abs + expected).min(archive.data().len());
                data.extend_from_slice(&archive.data()[abs..end]);
            }
        }
    } else {
        let mut cursor = Cursor::new(archive.data(), archive.abs(entry.data_offset));
        if let Err(err) = decompress::decompress(options.algorithm, &mut cursor, expected, &mut data)
        {
            file_note(report, entry, index, &err);
        }
    }

    if data.len() != expected {
        report.notes.push(Note::warning(format!(
            "file {}: produced {} bytes, expected {expected}",
            output::index_name(index),
            data.len()
        )));
    }

    match output::write_file(dir, index, &data) {
        Ok(path) => report.files.push(FileRecord {
            path,
            index,
            expected_size: expected,
            written_size: data.len(),
            stored: entry.is_stored(),
            file_type: entry.file_type,
            hash: entry.file_hash,
        }),
        Err(err) => report.notes.push(Note::error(format!(
            "file {}: write failed: {err}",
            output::index_name(index)
        ))),
    }
}

/// Record a per-file decoder failure with the context the error lacks.
fn file_note(report: &mut ExtractReport, entry: &Entry, index: usize, err: &BoltError) {
    report.notes.push(Note::error(format!(
        "file {} (type 0x{:02X}, data at BOLT+0x{:X}): {err}",
        output::index_name(index),
        entry.file_type,
        entry.data_offset
    )));
}
