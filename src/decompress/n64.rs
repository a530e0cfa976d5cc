//! N64/GBA/Xbox decompressor.
//!
//! A state machine over single opcode bytes with three carry registers
//! that survive across input bytes: `op_count` (opcode bytes consumed
//! since the last emission), `ext_offset` and `ext_run` (accumulated
//! offset/run-length extensions). Extension opcodes only shift bits
//! into the latched registers; the next emitting opcode consumes them,
//! and all three reset to zero after any emission.
//!
//! Opcode layout, decided by the top bits of the byte `B`:
//!
//! ```text
//! 11xxxxxx  ext_offset = (ext_offset << 6) | (B & 0x3F)
//! 101xxxxx  ext_run    = (ext_run << 5)    | (B & 0x1F)
//! 1001xxxx  ext_offset = (ext_offset << 2) | ((B & 0x0C) >> 2)
//!           ext_run    = (ext_run << 2)    | (B & 0x03)
//! 1000xxxx  literal run of ((ext_run << 4) | (B & 0x0F)) + 1 bytes
//! 0rrrbbbb  lookback: back = ((ext_offset << 4) | b) + 1
//!                     run  = ((ext_run << 3) | r) + op_count + 1
//! ```

use crate::decompress::Cursor;
use crate::error::{BoltError, Result};

/// Longest tolerated run of extension opcodes with no emission. The
/// registers are 32-bit; a legitimate prefix saturates them in a
/// handful of bytes, so a longer quiet streak cannot make progress.
const MAX_EXTENSION_STREAK: usize = 64;

/// Decompress an N64/GBA/Xbox payload.
pub fn decompress(cursor: &mut Cursor<'_>, expected_size: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut op_count: u32 = 0;
    let mut ext_offset: u32 = 0;
    let mut ext_run: u32 = 0;
    let mut streak: usize = 0;

    while out.len() < expected_size {
        let opcode_at = cursor.position();
        let b = cursor.read_u8()?;
        op_count += 1;

        if b & 0x80 != 0 {
            if b & 0x40 != 0 {
                // extension in offset
                ext_offset = ext_offset.wrapping_shl(6) | u32::from(b & 0x3F);
            } else if b & 0x20 != 0 {
                // extension in run length
                ext_run = ext_run.wrapping_shl(5) | u32::from(b & 0x1F);
            } else if b & 0x10 != 0 {
                // extension in both
                ext_offset = ext_offset.wrapping_shl(2) | u32::from((b & 0x0C) >> 2);
                ext_run = ext_run.wrapping_shl(2) | u32::from(b & 0x03);
            } else {
                // literal run
                let run = (ext_run.wrapping_shl(4) | u32::from(b & 0x0F)).wrapping_add(1);
                for _ in 0..run {
                    let v = cursor.read_u8()?;
                    out.push(v);
                }
                op_count = 0;
                ext_offset = 0;
                ext_run = 0;
                streak = 0;
                continue;
            }
            streak += 1;
            if streak > MAX_EXTENSION_STREAK {
                return Err(BoltError::DecoderStall { offset: opcode_at });
            }
        } else {
            // lookback copy; run grows with the opcode bytes spent on it
            let back = (ext_offset.wrapping_shl(4) | u32::from(b & 0x0F)) as usize + 1;
            let run = (ext_run.wrapping_shl(3) | u32::from(b >> 4))
                .wrapping_add(op_count)
                .wrapping_add(1);

            if back > out.len() {
                return Err(BoltError::LookbackUnderflow {
                    opcode: b,
                    back,
                    produced: out.len(),
                    offset: opcode_at,
                });
            }

            let start = out.len() - back;
            for i in 0..run as usize {
                let v = out[start + i];
                out.push(v);
            }
            op_count = 0;
            ext_offset = 0;
            ext_run = 0;
            streak = 0;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(input: &[u8], expected_size: usize) -> (Vec<u8>, Result<()>) {
        let mut cursor = Cursor::new(input, 0);
        let mut out = Vec::new();
        let res = decompress(&mut cursor, expected_size, &mut out);
        (out, res)
    }

    #[test]
    fn test_trivial_literal() {
        // 0x80 = literal run, length ((0 << 4) | 0) + 1 = 1... with low
        // nibble 1 the run is 2; over-production past the expected size
        // is the caller's problem.
        let (out, res) = run(&[0x80, 0x41], 1);
        res.unwrap();
        assert_eq!(out, vec![0x41]);

        let (out, res) = run(&[0x81, 0x41, 0x42], 1);
        res.unwrap();
        assert_eq!(out, vec![0x41, 0x42]);
    }

    #[test]
    fn test_short_lookback_self_overlap() {
        // Literal 'A', then opcode 0x00: back = 1, run = op_count(1) + 1 = 2.
        let (out, res) = run(&[0x80, 0x41, 0x00], 3);
        res.unwrap();
        assert_eq!(out, vec![0x41, 0x41, 0x41]);
    }

    #[test]
    fn test_run_extension_feeds_literal() {
        // 0xA1 latches ext_run = 1; literal length = ((1 << 4) | 2) + 1 = 19.
        let mut input = vec![0xA1, 0x82];
        input.extend_from_slice(&[0x55; 19]);
        let (out, res) = run(&input, 19);
        res.unwrap();
        assert_eq!(out, vec![0x55; 19]);
    }

    #[test]
    fn test_offset_extension_feeds_lookback() {
        // 20 literal bytes 0..19 (ext_run 1 feeding the length), then
        // ext_offset = 1 and a lookback with low nibble 1:
        // back = ((1 << 4) | 1) + 1 = 18, run = 0 + op_count(2) + 1 = 3.
        let mut input = vec![0xA1, 0x83];
        input.extend(0u8..20);
        input.extend_from_slice(&[0xC1, 0x01]);
        let (out, res) = run(&input, 23);
        res.unwrap();
        assert_eq!(out.len(), 23);
        assert_eq!(&out[20..], &[2, 3, 4]);
    }

    #[test]
    fn test_register_reset_after_emission() {
        // First emission consumes the latched extension; the second
        // lookback must see cleared registers.
        let mut input = vec![0x81, 0x41, 0x42]; // literal "AB"
        input.push(0x00); // back 1, run = 1 + 1 = 2 -> "BB"
        input.push(0x00); // registers were reset: back 1 again, run 2
        let (out, res) = run(&input, 6);
        res.unwrap();
        assert_eq!(out, vec![0x41, 0x42, 0x42, 0x42, 0x42, 0x42]);
    }

    #[test]
    fn test_lookback_on_empty_output() {
        let (out, res) = run(&[0x00], 4);
        assert!(matches!(res, Err(BoltError::LookbackUnderflow { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_lookback_too_far() {
        // One literal byte, then back = ((0 << 4) | 5) + 1 = 6 > 1.
        let (out, res) = run(&[0x80, 0x41, 0x05], 4);
        match res {
            Err(BoltError::LookbackUnderflow {
                back: 6,
                produced: 1,
                ..
            }) => {}
            other => panic!("expected LookbackUnderflow, got {other:?}"),
        }
        assert_eq!(out, vec![0x41]);
    }

    #[test]
    fn test_extension_only_input_stalls() {
        // Nothing but offset extensions: the guard aborts with the
        // partial (empty) output rather than chewing the whole buffer.
        let input = vec![0xC1; 80];
        let (out, res) = run(&input, 4);
        assert!(matches!(res, Err(BoltError::DecoderStall { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_truncated_literal() {
        let (out, res) = run(&[0x83, 0x41], 4);
        assert!(matches!(res, Err(BoltError::TruncatedInput { .. })));
        assert_eq!(out, vec![0x41]);
    }

    #[test]
    fn test_deterministic() {
        let input = [0x81, 0x41, 0x42, 0x00, 0x80, 0x43];
        let (a, _) = run(&input, 8);
        let (b, _) = run(&input, 8);
        assert_eq!(a, b);
    }
}
