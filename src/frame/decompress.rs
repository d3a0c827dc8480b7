//! Framed decode: header validation, raw token stream, CRC verification.

use super::header::{FrameHeader, HEADER_SIZE, TRAILER_SIZE};
use super::Error;
use crate::block::decompress::{decompress_raw_into, decompress_stream_core};
use crate::block::DecompressError;
use crate::sink::{CrcSink, ScratchSink};
use std::io;

/// Reads the plaintext size a frame declares, without decompressing.
pub fn decompressed_size(input: &[u8]) -> Result<usize, Error> {
    Ok(FrameHeader::read(input)?.original_size as usize)
}

fn split_frame(input: &[u8]) -> (&[u8], u32) {
    let body = &input[HEADER_SIZE..input.len() - TRAILER_SIZE];
    let trailer = &input[input.len() - TRAILER_SIZE..];
    (body, u32::from_le_bytes(trailer.try_into().unwrap()))
}

/// Decompresses a frame into a new `Vec`.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, Error> {
    let header = FrameHeader::read(input)?;
    let mut output = vec![0u8; header.original_size as usize];
    decompress_body(input, &mut output, header)?;
    Ok(output)
}

/// Decompresses a frame into `output`, returning the produced length.
pub fn decompress_into(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let header = FrameHeader::read(input)?;
    decompress_body(input, output, header)
}

fn decompress_body(input: &[u8], output: &mut [u8], header: FrameHeader) -> Result<usize, Error> {
    let original_size = header.original_size as usize;
    let (body, stored) = split_frame(input);

    let used = decompress_raw_into(body, output, original_size)?;

    let actual = crc32fast::hash(&output[..used]);
    if actual != stored {
        return Err(Error::ChecksumMismatch {
            expected: stored,
            actual,
        });
    }
    Ok(used)
}

/// Decompresses a frame, flushing plaintext through `write` whenever
/// `scratch` runs full. The checksum is folded over the chunks as they pass
/// through, so bytes already handed to the callback precede a possible
/// [`Error::ChecksumMismatch`].
pub fn decompress_stream<F>(input: &[u8], scratch: &mut [u8], write: F) -> Result<(), Error>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let header = FrameHeader::read(input)?;
    if scratch.is_empty() {
        return Err(DecompressError::EmptyScratch.into());
    }
    let (body, stored) = split_frame(input);

    let mut hasher = crc32fast::Hasher::new();
    let crc_sink = decompress_stream_core(
        body,
        header.original_size as usize,
        CrcSink::new(ScratchSink::new(scratch, write), &mut hasher),
    )?;
    let mut sink = crc_sink.into_inner();
    sink.finish().map_err(DecompressError::from)?;

    let actual = hasher.finalize();
    if actual != stored {
        return Err(Error::ChecksumMismatch {
            expected: stored,
            actual,
        });
    }
    Ok(())
}
