//! MS-DOS decompressor.
//!
//! Two-phase: each opcode byte resolves to a (kind, run, payload)
//! triple, then the emitter writes at most what the file still needs.
//! An opcode whose run exceeds the remaining size is carried: the next
//! iteration skips the opcode read and keeps emitting from the reduced
//! residual run. In practice the loop ends the moment the file is
//! full, so the carry only ever clamps the final opcode.
//!
//! Opcode forms, with `A = B & 0x1F`:
//!
//! ```text
//! 00xxxxxx  literal run of 31 - A input bytes
//! 01xxxxxx  lookback, run 35 - A, back 8*(B & 0x20) + next
//! 10xxxxxx  lookback, run 4*(32 - A) (+2 if B & 0x20), back 2*next
//! 111xxxxx  no-op
//! 110xxxxx  fill: run byte R, one discarded byte, fill byte F,
//!           run 4*(32 - A + 32*R) copies of F
//! ```

use crate::decompress::{reinsert_self, Cursor};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Literal,
    Lookback,
    Fill,
}

/// Decompress an MS-DOS payload.
pub fn decompress(cursor: &mut Cursor<'_>, expected_size: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut kind = Kind::Literal;
    let mut run: usize = 0;
    let mut back: usize = 0;
    let mut fill: u8 = 0;
    let mut carry = false;

    while out.len() < expected_size {
        let opcode_at = cursor.position();
        let mut opcode = 0u8;

        if !carry {
            opcode = cursor.read_u8()?;
            let amount = usize::from(opcode & 0x1F);

            match opcode & 0xC0 {
                0x00 => {
                    kind = Kind::Literal;
                    run = 31 - amount;
                }
                0x40 => {
                    kind = Kind::Lookback;
                    run = 35 - amount;
                    back = 8 * usize::from(opcode & 0x20) + usize::from(cursor.read_u8()?);
                }
                0x80 => {
                    kind = Kind::Lookback;
                    run = 4 * (32 - amount) + if opcode & 0x20 != 0 { 2 } else { 0 };
                    back = 2 * usize::from(cursor.read_u8()?);
                }
                _ => {
                    kind = Kind::Fill;
                    if opcode & 0x20 != 0 {
                        run = 0;
                    } else {
                        let repeat = usize::from(cursor.read_u8()?);
                        let _ = cursor.read_u8()?; // unused by the format
                        fill = cursor.read_u8()?;
                        run = 4 * (32 - amount + 32 * repeat);
                    }
                }
            }
        }

        // Clamp to what the file still needs and carry the remainder.
        let remaining = expected_size - out.len();
        let emit = if run > remaining {
            carry = true;
            run -= remaining;
            remaining
        } else {
            carry = false;
            run
        };

        match kind {
            Kind::Literal => {
                for _ in 0..emit {
                    let v = cursor.read_u8()?;
                    out.push(v);
                }
            }
            Kind::Lookback => reinsert_self(out, back, emit, opcode, opcode_at)?,
            Kind::Fill => out.resize(out.len() + emit, fill),
        }
    }
    Ok(())
}
