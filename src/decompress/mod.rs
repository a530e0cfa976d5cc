//! Opcode-driven decompressors.
//!
//! Four LZ-style decoders cover the platforms BOLT shipped on:
//! - [`cdi`]: CD-i nibble-switch opcodes, including the stride-2 family
//! - [`dos`]: MS-DOS two-phase opcodes with carry across emissions
//! - [`n64`]: N64/GBA/Xbox carry-register opcodes
//! - [`win`]: Windows nibble-switch opcodes with an explicit terminator
//!
//! All decoders append into a caller-owned output vector so that a
//! fatal per-opcode error leaves the partial result available. The
//! caller decides what to do with a short or overlong result; decoders
//! only stop on their own terminator or once the output reaches the
//! expected size.

pub mod cdi;
pub mod dos;
pub mod n64;
pub mod win;

use crate::error::{BoltError, Result};
use crate::types::Algorithm;

/// Input cursor over the host-binary buffer.
///
/// Reads are bounds-checked; running off the buffer is a
/// [`BoltError::TruncatedInput`] carrying the failing offset.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor starting at an absolute buffer offset.
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current absolute buffer offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read one byte and advance.
    pub fn read_u8(&mut self) -> Result<u8> {
        let Some(&v) = self.data.get(self.pos) else {
            return Err(BoltError::TruncatedInput {
                offset: self.pos,
                expected: 1,
                actual: 0,
            });
        };
        self.pos += 1;
        Ok(v)
    }
}

/// Append `run` bytes read from `back` positions behind the output end.
///
/// The source index is re-evaluated after every push, so a copy whose
/// length exceeds its distance re-reads bytes written by the same copy.
/// That self-overlap is the RLE idiom all four decoders rely on.
///
/// # Errors
///
/// [`BoltError::LookbackUnderflow`] when `back` is zero or reaches
/// before the start of the output. The distance only has to be valid
/// once: it stays fixed while the output grows.
pub fn reinsert_self(
    out: &mut Vec<u8>,
    back: usize,
    run: usize,
    opcode: u8,
    offset: usize,
) -> Result<()> {
    if back == 0 || back > out.len() {
        return Err(BoltError::LookbackUnderflow {
            opcode,
            back,
            produced: out.len(),
            offset,
        });
    }
    for _ in 0..run {
        let v = out[out.len() - back];
        out.push(v);
    }
    Ok(())
}

/// Decompress one payload with the decoder the algorithm selects.
///
/// N64 and Xbox share a decoder; their differences are confined to the
/// container layout.
pub fn decompress(
    algorithm: Algorithm,
    cursor: &mut Cursor<'_>,
    expected_size: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    match algorithm {
        Algorithm::Cdi => cdi::decompress(cursor, expected_size, out),
        Algorithm::Dos => dos::decompress(cursor, expected_size, out),
        Algorithm::N64 | Algorithm::Xbox => n64::decompress(cursor, expected_size, out),
        Algorithm::Win => win::decompress(cursor, expected_size, out),
        Algorithm::Unknown => Err(BoltError::AlgorithmUnknown {
            name: "unknown".to_string(),
        }),
    }
}
