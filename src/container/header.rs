//! Archive header decoding.
//!
//! Two fixed layouts share the 4-byte signature and a 16-byte total
//! size. The default layout (CD-i, MS-DOS, N64, Windows) carries a
//! 7-byte timestamp and a one-byte entry count; the Xbox layout drops
//! the millisecond and widens the entry count to a little-endian u16.
//!
//! ```text
//! default: magic[4] hh mm ss ms MM DD YY  count:u8  end_offset:u32
//! xbox:    magic[4] hh mm ss MM DD YY     count:u16 end_offset:u32
//! ```

use crate::container::{read_bytes, read_u16, read_u32, Archive};
use crate::error::{BoltError, Result};
use crate::types::{Algorithm, Endianness, Timestamp};

/// Size of both header layouts, including the signature.
pub const HEADER_SIZE: usize = 16;

/// Decoded archive header.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveHeader {
    /// Build timestamp.
    pub timestamp: Timestamp,
    /// Raw entry count field (u8 zero-extended on the default layout).
    pub raw_entry_count: u16,
    /// End-of-archive offset. Informational; not trusted for parsing.
    pub end_offset: u32,
    /// Whether the Xbox layout was used.
    pub xbox: bool,
}

impl ArchiveHeader {
    /// Decode the header at the archive's bolt base.
    ///
    /// The `end_offset` field follows the configured byte order; the
    /// Xbox entry count is always little-endian regardless of it.
    pub fn parse(archive: &Archive<'_>, algorithm: Algorithm, endian: Endianness) -> Result<Self> {
        let data = archive.data();
        let base = archive.base();
        if data.len().saturating_sub(base) < HEADER_SIZE {
            return Err(BoltError::HeaderTruncated {
                expected: HEADER_SIZE,
                actual: data.len().saturating_sub(base),
            });
        }

        if algorithm.uses_xbox_layout() {
            let ts = read_bytes(data, base + 4, 6)?;
            Ok(Self {
                timestamp: Timestamp {
                    hour: ts[0],
                    minute: ts[1],
                    second: ts[2],
                    millisecond: None,
                    month: ts[3],
                    day: ts[4],
                    year: ts[5],
                },
                raw_entry_count: read_u16(data, base + 10, Endianness::Little)?,
                end_offset: read_u32(data, base + 12, endian)?,
                xbox: true,
            })
        } else {
            let ts = read_bytes(data, base + 4, 7)?;
            Ok(Self {
                timestamp: Timestamp {
                    hour: ts[0],
                    minute: ts[1],
                    second: ts[2],
                    millisecond: Some(ts[3]),
                    month: ts[4],
                    day: ts[5],
                    year: ts[6],
                },
                raw_entry_count: u16::from(data[base + 11]),
                end_offset: read_u32(data, base + 12, endian)?,
                xbox: false,
            })
        }
    }

    /// Number of entries in the root table.
    ///
    /// A raw count of 0 means 256 on the default layout; the Xbox
    /// count is a plain 16-bit value where 0 means empty.
    pub fn root_entry_count(&self) -> usize {
        if self.xbox {
            usize::from(self.raw_entry_count)
        } else if self.raw_entry_count == 0 {
            256
        } else {
            usize::from(self.raw_entry_count)
        }
    }

    /// Archive-relative offset of the root entry table.
    pub fn entries_offset(&self) -> u32 {
        HEADER_SIZE as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_header_bytes(count: u8) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"BOLT");
        data.extend_from_slice(&[13, 37, 42, 99, 7, 4, 97]); // hh mm ss ms MM DD YY
        data.push(count);
        data.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        data
    }

    #[test]
    fn test_parse_default_layout() {
        let data = default_header_bytes(3);
        let archive = Archive::locate_in(&data).unwrap();
        let header = ArchiveHeader::parse(&archive, Algorithm::Win, Endianness::Little).unwrap();
        assert_eq!(header.timestamp.hour, 13);
        assert_eq!(header.timestamp.millisecond, Some(99));
        assert_eq!(header.timestamp.year, 97);
        assert_eq!(header.root_entry_count(), 3);
        assert_eq!(header.end_offset, 0x1234_5678);
        assert!(!header.xbox);
    }

    #[test]
    fn test_parse_big_endian_end_offset() {
        let mut data = default_header_bytes(1);
        data[12..16].copy_from_slice(&0x1234_5678u32.to_be_bytes());
        let archive = Archive::locate_in(&data).unwrap();
        let header = ArchiveHeader::parse(&archive, Algorithm::N64, Endianness::Big).unwrap();
        assert_eq!(header.end_offset, 0x1234_5678);
    }

    #[test]
    fn test_zero_count_means_256() {
        let data = default_header_bytes(0);
        let archive = Archive::locate_in(&data).unwrap();
        let header = ArchiveHeader::parse(&archive, Algorithm::Dos, Endianness::Little).unwrap();
        assert_eq!(header.root_entry_count(), 256);
    }

    #[test]
    fn test_parse_xbox_layout() {
        let mut data = Vec::new();
        data.extend_from_slice(b"BOLT");
        data.extend_from_slice(&[1, 2, 3, 12, 25, 101]); // hh mm ss MM DD YY
        data.extend_from_slice(&0x0300u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        let archive = Archive::locate_in(&data).unwrap();
        let header = ArchiveHeader::parse(&archive, Algorithm::Xbox, Endianness::Little).unwrap();
        assert_eq!(header.timestamp.millisecond, None);
        assert_eq!(header.timestamp.month, 12);
        // Xbox count is literal, even when huge or zero.
        assert_eq!(header.root_entry_count(), 0x300);
        assert!(header.xbox);
    }

    #[test]
    fn test_xbox_zero_count_is_zero() {
        let mut data = Vec::new();
        data.extend_from_slice(b"BOLT");
        data.extend_from_slice(&[0u8; 12]);
        let archive = Archive::locate_in(&data).unwrap();
        let header = ArchiveHeader::parse(&archive, Algorithm::Xbox, Endianness::Little).unwrap();
        assert_eq!(header.root_entry_count(), 0);
    }

    #[test]
    fn test_truncated_header() {
        let data = b"BOLT....".to_vec();
        let archive = Archive::locate_in(&data).unwrap();
        let err = ArchiveHeader::parse(&archive, Algorithm::Win, Endianness::Little).unwrap_err();
        assert!(matches!(err, BoltError::HeaderTruncated { .. }));
    }
}
