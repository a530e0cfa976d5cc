//! Output extension guessing.
//!
//! BOLT archives carry no filenames, so extracted payloads get a
//! synthetic name plus a suffix sniffed from their bytes. Recognition
//! is two-tier: cheap magic prefixes first, then structural checks for
//! the headerless middleware formats (palette, image, string table,
//! frame group, raw PCM). The guesser is pure and never fails; the
//! fallback suffix is `.unk`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Guess a file suffix (with leading dot) for a produced byte sequence.
pub fn guess_extension(data: &[u8]) -> &'static str {
    if data.is_empty() {
        return ".unk";
    }
    if has_magic(data, b"RIFF") {
        return ".wav";
    }
    if has_magic(data, b"FONT") {
        return ".fnt";
    }
    if has_magic(data, b"SMK2") {
        return ".smk";
    }
    if is_chunked(data) {
        return ".chk";
    }
    if is_image(data) {
        return ".unkimg";
    }
    if is_palette(data) {
        return ".unkpal";
    }
    if is_pcm(data) {
        return ".unkpcm";
    }
    if is_string_table(data) {
        return ".tbl";
    }
    if is_frame_group(data) {
        return ".grp";
    }
    if is_pcx(data) {
        return ".pcx";
    }
    if is_text(data) {
        return ".txt";
    }
    ".unk"
}

/// Magic prefix check. Tiny payloads are never classified by magic
/// alone; the threshold matches the original tooling.
fn has_magic(data: &[u8], magic: &[u8; 4]) -> bool {
    data.len() > 32 && data[..4] == magic[..]
}

/// Chunked scenario data: any of the known section tags up front.
fn is_chunked(data: &[u8]) -> bool {
    [b"TYPE", b"VER ", b"IVER", b"IVE2", b"VCOD"]
        .iter()
        .any(|m| has_magic(data, m))
}

/// Greyscale image: 16-byte big-endian header followed by exactly
/// width * height pixel bytes.
///
/// ```text
/// 00 xx | bpp:u16 (0x0008) | zero:u32 | width:u16 | height:u16 | zero:u32
/// ```
fn is_image(data: &[u8]) -> bool {
    const HEADER: usize = 16;
    if data.len() <= HEADER {
        return false;
    }
    let width = usize::from(BigEndian::read_u16(&data[8..10]));
    let height = usize::from(BigEndian::read_u16(&data[10..12]));
    data[0] == 0
        && data[1] < 5
        && BigEndian::read_u16(&data[2..4]) == 0x0008
        && BigEndian::read_u32(&data[4..8]) == 0
        && BigEndian::read_u32(&data[12..16]) == 0
        && data.len() == width * height + HEADER
}

/// 255-entry palette: 8-byte header, entry count 255, 2 bytes per entry.
fn is_palette(data: &[u8]) -> bool {
    const HEADER: usize = 8;
    data.len() == 255 * 2 + HEADER
        && BigEndian::read_u32(&data[0..4]) == 0
        && BigEndian::read_u16(&data[4..6]) == 0x00FF
}

/// Headered raw PCM: channel/bit-depth bytes, sample rate, data size.
///
/// The rate and size fields follow the archive's byte order, which the
/// guesser does not know; both orders are tried.
fn is_pcm(data: &[u8]) -> bool {
    const HEADER: usize = 12;
    if data.len() <= HEADER {
        return false;
    }
    let channels = data[0];
    let bits = data[1];
    if channels > 2 || !matches!(bits, 8 | 16 | 24 | 32) {
        return false;
    }
    if LittleEndian::read_u32(&data[8..12]) != 0 {
        return false;
    }
    let fits = |rate: u16, size: u32| {
        size as usize + HEADER == data.len() && (8000..=44100).contains(&rate)
    };
    fits(
        LittleEndian::read_u16(&data[2..4]),
        LittleEndian::read_u32(&data[4..8]),
    ) || fits(
        BigEndian::read_u16(&data[2..4]),
        BigEndian::read_u32(&data[4..8]),
    )
}

/// String table: a count, ascending in-bounds offsets, every string
/// NUL-terminated.
fn is_string_table(data: &[u8]) -> bool {
    if data.len() <= 4 {
        return false;
    }
    let count = usize::from(LittleEndian::read_u16(&data[0..2]));
    if count <= 1 {
        return false;
    }
    let data_start = count * 2 + 2;
    if data_start >= data.len() {
        return false;
    }
    if usize::from(LittleEndian::read_u16(&data[2..4])) != data_start {
        return false;
    }
    let mut prev = 0usize;
    for i in 0..count {
        let off = usize::from(LittleEndian::read_u16(&data[2 + i * 2..4 + i * 2]));
        if off < data_start || off >= data.len() {
            return false;
        }
        if i > 0 && (data[off - 1] != 0 || off <= prev) {
            return false;
        }
        prev = off;
    }
    *data.last().unwrap_or(&1) == 0
}

/// Frame group: frame count plus per-frame geometry that must fit the
/// group bounds, with ascending in-bounds frame offsets.
fn is_frame_group(data: &[u8]) -> bool {
    const GROUP_HEADER: usize = 6;
    const FRAME_SIZE: usize = 8;
    if data.len() <= GROUP_HEADER + FRAME_SIZE {
        return false;
    }
    let frames = usize::from(LittleEndian::read_u16(&data[0..2]));
    let width = LittleEndian::read_u16(&data[2..4]);
    let height = LittleEndian::read_u16(&data[4..6]);
    if frames == 0 || width == 0 || height == 0 {
        return false;
    }
    let data_start = GROUP_HEADER + frames * FRAME_SIZE;
    if data_start + 1 >= data.len() {
        return false;
    }
    if LittleEndian::read_u32(&data[GROUP_HEADER + 4..GROUP_HEADER + 8]) as usize != data_start {
        return false;
    }
    for i in 0..frames {
        let base = GROUP_HEADER + i * FRAME_SIZE;
        let dx = u16::from(data[base]);
        let dy = u16::from(data[base + 1]);
        let fw = u16::from(data[base + 2]);
        let fh = u16::from(data[base + 3]);
        let off = LittleEndian::read_u32(&data[base + 4..base + 8]) as usize;
        if fw == 0 || fh == 0 || dx + fw > width || dy + fh > height {
            return false;
        }
        if off < data_start || off >= data.len() {
            return false;
        }
    }
    true
}

/// PCX image: manufacturer byte, sane version, RLE encoding flag, a
/// plausible bit depth, and at least a full 128-byte header.
fn is_pcx(data: &[u8]) -> bool {
    data.len() > 128
        && data[0] == 0x0A
        && data[1] <= 5
        && data[2] == 1
        && matches!(data[3], 1 | 2 | 4 | 8)
}

/// Fully printable ASCII (plus whitespace).
fn is_text(data: &[u8]) -> bool {
    data.iter()
        .all(|&b| b.is_ascii_graphic() || b.is_ascii_whitespace())
}
