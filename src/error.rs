//! Error types for the BOLT extractor.
//!
//! This module defines all error types used throughout the extractor.
//! Container-level errors (no magic, unknown algorithm) abort a run;
//! decoder errors are confined to the file being extracted and carry
//! enough positional context to aid reverse-engineering.

use thiserror::Error;

/// Primary error type for the BOLT extractor.
#[derive(Debug, Error)]
pub enum BoltError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither `BOLT` nor `bolt` was found in the input buffer.
    #[error("no BOLT signature found: input is the wrong format, corrupted, or carries no archive")]
    NoMagic,

    /// The supplied or inferred algorithm name is not recognised.
    #[error("unknown algorithm {name:?}: expected cdi, dos, n64, gba, z64, win, or xbox")]
    AlgorithmUnknown {
        /// The name that failed to resolve.
        name: String,
    },

    /// A read ran past the end of the input buffer.
    #[error("truncated input at offset 0x{offset:X}: wanted {expected} bytes, {actual} available")]
    TruncatedInput {
        /// Absolute buffer offset of the failed read.
        offset: usize,
        /// Bytes the read wanted.
        expected: usize,
        /// Bytes actually available at that offset.
        actual: usize,
    },

    /// The archive header does not fit in the buffer.
    #[error("archive header truncated: expected {expected} bytes past the signature, got {actual}")]
    HeaderTruncated {
        /// Bytes the header layout requires.
        expected: usize,
        /// Bytes available past the bolt base.
        actual: usize,
    },

    /// A lookback copy referenced data before the start of the output.
    #[error("lookback underflow for opcode 0x{opcode:02X} at offset 0x{offset:X}: back {back} with only {produced} bytes produced")]
    LookbackUnderflow {
        /// Opcode byte that triggered the copy.
        opcode: u8,
        /// Distance behind the output cursor.
        back: usize,
        /// Output bytes produced so far.
        produced: usize,
        /// Absolute buffer offset of the opcode.
        offset: usize,
    },

    /// An opcode outside the documented tables. Treated like a lookback
    /// underflow: the decoder stops and keeps its partial output.
    #[error("unknown opcode 0x{opcode:02X} at offset 0x{offset:X}")]
    UnknownOpcode {
        /// The unrecognised opcode byte.
        opcode: u8,
        /// Absolute buffer offset of the opcode.
        offset: usize,
    },

    /// The decoder consumed a long run of extension opcodes without ever
    /// reaching an emitting opcode.
    #[error("decoder stalled at offset 0x{offset:X}: extension opcodes without an emitter")]
    DecoderStall {
        /// Absolute buffer offset where the guard tripped.
        offset: usize,
    },

    /// Directory nesting exceeded the recursion cap, which only a cyclic
    /// or otherwise malformed entry table can produce.
    #[error("directory nesting exceeded {depth} levels; entry table is likely cyclic")]
    DepthLimit {
        /// The cap that was exceeded.
        depth: usize,
    },
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, BoltError>;
