//! Framed encode: header, raw token stream, CRC trailer.
//!
//! The plaintext is fully known up front, so the checksum is computed over
//! the input directly; "streaming" refers to the output side only.

use super::header::{FrameHeader, HEADER_SIZE, MIN_FRAME_SIZE, TRAILER_SIZE};
use super::Error;
use crate::block::compress::{compress_core, estimate_max_compressed_size, CompressConfig};
use crate::block::hashtable::MatchFinder;
use crate::block::CompressError;
use crate::sink::{ScratchSink, SliceSink};
use std::io;

fn frame_header(input: &[u8]) -> Result<FrameHeader, Error> {
    if input.is_empty() {
        return Err(CompressError::EmptyInput.into());
    }
    let original_size =
        u32::try_from(input.len()).map_err(|_| CompressError::InputTooLarge)?;
    Ok(FrameHeader { original_size })
}

/// Compresses all bytes of `input` into a framed `Vec` with the default
/// configuration.
pub fn compress(input: &[u8]) -> Result<Vec<u8>, Error> {
    compress_with(&CompressConfig::default(), input)
}

/// Compresses all bytes of `input` into a framed `Vec` with the given
/// configuration.
pub fn compress_with(config: &CompressConfig, input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut output = vec![0u8; estimate_max_compressed_size(input.len())];
    let used = compress_into(input, &mut output, config)?;
    output.truncate(used);
    Ok(output)
}

/// Compresses `input` into `output` as a complete frame, returning the used
/// length.
pub fn compress_into(
    input: &[u8],
    output: &mut [u8],
    config: &CompressConfig,
) -> Result<usize, Error> {
    let header = frame_header(input)?;
    if output.len() < MIN_FRAME_SIZE {
        return Err(CompressError::OutputTooSmall.into());
    }

    output[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    let mut pos = HEADER_SIZE;

    // The trailer stays reserved while the token stream is written.
    let body_capacity = output.len() - TRAILER_SIZE;
    let used = {
        let mut sink = SliceSink::new(&mut output[pos..body_capacity]);
        let mut matcher = MatchFinder::new();
        compress_core(&mut matcher, input, &mut sink, config)?;
        sink.pos()
    };
    pos += used;

    let checksum = crc32fast::hash(input);
    output[pos..pos + TRAILER_SIZE].copy_from_slice(&checksum.to_le_bytes());
    pos += TRAILER_SIZE;
    Ok(pos)
}

/// Compresses `input` as a complete frame, flushing the token stream through
/// `write` whenever `scratch` runs full. The header and trailer are handed to
/// the callback as their own chunks.
pub fn compress_stream<F>(
    input: &[u8],
    scratch: &mut [u8],
    mut write: F,
    config: &CompressConfig,
) -> Result<(), Error>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let header = frame_header(input)?;
    if scratch.is_empty() {
        return Err(CompressError::EmptyScratch.into());
    }

    write(&header.to_bytes()).map_err(CompressError::CallbackFailed)?;

    let mut sink = ScratchSink::new(scratch, &mut write);
    let mut matcher = MatchFinder::new();
    compress_core(&mut matcher, input, &mut sink, config)?;
    sink.finish().map_err(CompressError::from)?;

    let checksum = crc32fast::hash(input);
    write(&checksum.to_le_bytes()).map_err(CompressError::CallbackFailed)?;
    Ok(())
}
