//! Berg frame format.
//!
//! A frame is the self-describing envelope around a raw token stream:
//!
//! ```text
//! offset 0    'B' 'E' 'R' 'G'
//! offset 4    u32 little-endian plaintext length
//! offset 8    raw token stream
//! trailing    u32 little-endian CRC-32 of the plaintext (zlib variant)
//! ```
//!
//! The decoder reconstructs exactly the declared length and then verifies the
//! checksum of what it produced against the trailer.

use thiserror::Error as ThisError;

pub(crate) mod compress;
pub(crate) mod decompress;
pub(crate) mod header;

pub use compress::{compress, compress_into, compress_stream, compress_with};
pub use decompress::{decompress, decompress_into, decompress_stream, decompressed_size};

/// An error produced while handling a Berg frame.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// Compression error.
    #[error(transparent)]
    Compression(#[from] crate::block::CompressError),
    /// Decompression error.
    #[error(transparent)]
    Decompression(#[from] crate::block::DecompressError),
    /// Wrong magic number for the Berg frame format.
    #[error("wrong magic number for the Berg frame format")]
    WrongMagicNumber,
    /// Input is shorter than the smallest possible frame.
    #[error("input is shorter than the smallest possible frame")]
    InputTooSmall,
    /// The plaintext checksum doesn't match the trailer.
    #[error("plaintext checksum is {actual:#010x}, trailer says {expected:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}
