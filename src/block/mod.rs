//! Raw Berg token stream.
//!
//! A token is a run of literals plus an optional back-reference into the
//! last 4095 bytes of output. It opens with a 16-bit little-endian head word:
//!
//! ```text
//! bits 15..14  literal count, direct 0..2, 3 = varint follows
//! bits 13..2   match offset, 0 = no match
//! bits  1..0   match length - 3, direct 0..2, 3 = varint follows
//! ```
//!
//! Extension varints are biased so a value expressible in the direct bits has
//! exactly one encoding: the literal varint carries `literal_count - 3`, the
//! match varint `match_length - 6`. This module fixes the on-wire byte order;
//! the [`frame`](crate::frame) module wraps it with magic, size and checksum.

pub mod compress;
pub mod decompress;
pub(crate) mod hashtable;
pub(crate) mod vint;

pub use compress::{
    compress_raw, compress_raw_into, compress_raw_stream, estimate_max_compressed_size,
    CompressConfig, Compressor,
};
pub use decompress::{decompress_raw, decompress_raw_into, decompress_raw_stream};

use crate::sink::SinkError;
use std::io;
use thiserror::Error;

/// Sliding window the decoder maintains; offsets reach at most one byte less.
pub(crate) const WINDOW_SIZE: usize = 4096;
/// Largest encodable back-reference distance (12 head-word bits).
pub(crate) const MAX_OFFSET: usize = WINDOW_SIZE - 1;
/// Shortest match worth a back-reference.
pub(crate) const MIN_MATCH: usize = 3;
/// Longest match length that fits the head word directly.
pub(crate) const MAX_DIRECT_MATCH: usize = 5;
/// Smallest match length carried by the extension varint.
pub(crate) const MIN_EXTENDED_MATCH: usize = MAX_DIRECT_MATCH + 1;
/// Largest literal count that fits the head word directly.
pub(crate) const MAX_DIRECT_LITERALS: usize = 2;
/// Smallest literal count carried by the extension varint.
pub(crate) const MIN_EXTENDED_LITERALS: usize = MAX_DIRECT_LITERALS + 1;

pub(crate) const HEAD_LITERAL_ESCAPE: u16 = 0xC000;
pub(crate) const HEAD_LITERAL_SHIFT: u16 = 14;
pub(crate) const HEAD_OFFSET_SHIFT: u16 = 2;
pub(crate) const HEAD_OFFSET_MASK: u16 = 0x0FFF;
pub(crate) const HEAD_MATCH_MASK: u16 = 0x0003;
pub(crate) const HEAD_MATCH_ESCAPE: u16 = 0x0003;

/// One unit of the compressed stream: `literal_count` raw bytes, then an
/// optional back-reference. `match_offset == 0` means no back-reference and
/// forces `match_length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub literal_count: usize,
    pub match_offset: u16,
    pub match_length: usize,
}

/// An error produced while compressing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompressError {
    /// Compressing zero bytes is rejected.
    #[error("input is empty")]
    EmptyInput,
    /// The frame size field and the match-finder positions are 32-bit.
    #[error("input exceeds the 32-bit size limit")]
    InputTooLarge,
    /// `lookahead_size` must be positive.
    #[error("lookahead_size must be positive")]
    ZeroLookahead,
    /// Streaming needs at least one byte of scratch space.
    #[error("scratch buffer is empty")]
    EmptyScratch,
    /// The output buffer cannot hold the compressed stream.
    #[error("output buffer is too small for the compressed data")]
    OutputTooSmall,
    /// The user write callback reported failure.
    #[error("write callback failed: {0}")]
    CallbackFailed(#[source] io::Error),
}

impl From<SinkError> for CompressError {
    fn from(e: SinkError) -> Self {
        match e {
            SinkError::Full => CompressError::OutputTooSmall,
            SinkError::Callback(e) => CompressError::CallbackFailed(e),
        }
    }
}

/// An error representing invalid compressed data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecompressError {
    /// Expected another byte, but the input ended.
    #[error("expected another byte, found none")]
    ExpectedAnotherByte,
    /// A varint extension does not fit the size type.
    #[error("varint does not fit in 64 bits")]
    VarintOverflow,
    /// A head word that violates the token layout, or a token that makes no
    /// progress.
    #[error("malformed token")]
    BadToken,
    /// A back-reference reaches before the start of the output.
    #[error("match offset reaches beyond the produced output")]
    OffsetOutOfBounds,
    /// A token produces more bytes than the declared original size.
    #[error("token overruns the declared original size")]
    OutputOverrun,
    /// The stream stopped producing output at the wrong size.
    #[error("decompressed size is {actual}, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    /// The output buffer cannot hold the declared original size.
    #[error("output buffer holds {actual} bytes, need {expected}")]
    OutputTooSmall { expected: usize, actual: usize },
    /// Streaming needs at least one byte of scratch space.
    #[error("scratch buffer is empty")]
    EmptyScratch,
    /// The user write callback reported failure.
    #[error("write callback failed: {0}")]
    CallbackFailed(#[source] io::Error),
}

impl From<SinkError> for DecompressError {
    fn from(e: SinkError) -> Self {
        match e {
            SinkError::Full => DecompressError::OutputTooSmall {
                expected: 0,
                actual: 0,
            },
            SinkError::Callback(e) => DecompressError::CallbackFailed(e),
        }
    }
}
