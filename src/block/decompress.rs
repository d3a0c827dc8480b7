//! The decompression algorithm.
//!
//! One pass over the token stream: copy the literal run, then expand the
//! back-reference against the already-produced output. Buffer output uses the
//! output slice itself as the window; streaming output keeps a 4 KiB ring so
//! the produced bytes never need to stay addressable.

use crate::block::vint::decode_varint;
use crate::block::{
    DecompressError, Token, HEAD_LITERAL_ESCAPE, HEAD_LITERAL_SHIFT, HEAD_MATCH_ESCAPE,
    HEAD_MATCH_MASK, HEAD_OFFSET_MASK, HEAD_OFFSET_SHIFT, MIN_EXTENDED_LITERALS,
    MIN_EXTENDED_MATCH, MIN_MATCH, WINDOW_SIZE,
};
use crate::sink::{ScratchSink, Sink};
use std::io;

/// Reads a little-endian 16-bit head word.
#[inline]
fn read_u16(input: &[u8], pos: &mut usize) -> Result<u16, DecompressError> {
    let bytes = input
        .get(*pos..*pos + 2)
        .ok_or(DecompressError::ExpectedAnotherByte)?;
    *pos += 2;
    Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
}

/// Reads one token: head word plus any extension varints the escape patterns
/// call for. The literal bytes themselves stay in the input.
fn read_token(input: &[u8], pos: &mut usize) -> Result<Token, DecompressError> {
    let head = read_u16(input, pos)?;

    let extended_literals = head & HEAD_LITERAL_ESCAPE == HEAD_LITERAL_ESCAPE;
    let match_offset = (head >> HEAD_OFFSET_SHIFT) & HEAD_OFFSET_MASK;
    let extended_match = match_offset > 0 && head & HEAD_MATCH_MASK == HEAD_MATCH_ESCAPE;

    if match_offset == 0 && head & HEAD_MATCH_MASK != 0 {
        // The match portion must be all-zero when there is no match.
        return Err(DecompressError::BadToken);
    }

    let mut literal_count = if extended_literals {
        0
    } else {
        (head >> HEAD_LITERAL_SHIFT) as usize
    };
    let mut match_length = if match_offset > 0 && !extended_match {
        (head & HEAD_MATCH_MASK) as usize + MIN_MATCH
    } else {
        0
    };

    if extended_literals {
        let value = decode_varint(input, pos)?;
        literal_count = usize::try_from(value)
            .ok()
            .and_then(|v| v.checked_add(MIN_EXTENDED_LITERALS))
            .ok_or(DecompressError::VarintOverflow)?;
    }
    if extended_match {
        let value = decode_varint(input, pos)?;
        match_length = usize::try_from(value)
            .ok()
            .and_then(|v| v.checked_add(MIN_EXTENDED_MATCH))
            .ok_or(DecompressError::VarintOverflow)?;
    }

    Ok(Token {
        literal_count,
        match_offset,
        match_length,
    })
}

/// Where decoded bytes land. Implementations own the window that
/// back-references read from.
trait DecodeOutput {
    fn write_literals(&mut self, data: &[u8]) -> Result<(), DecompressError>;
    /// Copies `length` bytes starting `offset` bytes back from the current
    /// position. `offset` is already validated against the produced size.
    fn copy_match(&mut self, offset: usize, length: usize) -> Result<(), DecompressError>;
}

/// The decode loop shared by every output mode.
fn decompress_core<O: DecodeOutput>(
    input: &[u8],
    output: &mut O,
    original_size: usize,
) -> Result<(), DecompressError> {
    let mut pos = 0;
    let mut out_pos = 0;

    while pos < input.len() && out_pos < original_size {
        let token = read_token(input, &mut pos)?;
        if token.literal_count == 0 && token.match_offset == 0 {
            // A token with neither literals nor a match makes no progress.
            return Err(DecompressError::BadToken);
        }

        if token.literal_count > input.len() - pos {
            return Err(DecompressError::ExpectedAnotherByte);
        }
        if token.literal_count > original_size - out_pos {
            return Err(DecompressError::OutputOverrun);
        }
        output.write_literals(&input[pos..pos + token.literal_count])?;
        pos += token.literal_count;
        out_pos += token.literal_count;

        if token.match_offset > 0 {
            let offset = token.match_offset as usize;
            if offset > out_pos {
                return Err(DecompressError::OffsetOutOfBounds);
            }
            if token.match_length > original_size - out_pos {
                return Err(DecompressError::OutputOverrun);
            }
            output.copy_match(offset, token.match_length)?;
            out_pos += token.match_length;
        }
    }

    if out_pos != original_size {
        return Err(DecompressError::SizeMismatch {
            expected: original_size,
            actual: out_pos,
        });
    }
    Ok(())
}

/// Buffer output: the produced bytes themselves form the window.
struct SliceOutput<'a> {
    output: &'a mut [u8],
    pos: usize,
}

impl DecodeOutput for SliceOutput<'_> {
    #[inline]
    fn write_literals(&mut self, data: &[u8]) -> Result<(), DecompressError> {
        self.output[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }

    fn copy_match(&mut self, offset: usize, length: usize) -> Result<(), DecompressError> {
        let start = self.pos - offset;
        if offset >= length {
            self.output.copy_within(start..start + length, self.pos);
        } else {
            // The match overlaps its own output; later bytes re-read earlier
            // ones produced within the same copy.
            for i in 0..length {
                self.output[self.pos + i] = self.output[start + i];
            }
        }
        self.pos += length;
        Ok(())
    }
}

/// Streaming output: a ring mirrors the last window of produced bytes while
/// everything is forwarded to the sink.
struct RingOutput<S> {
    ring: Box<[u8; WINDOW_SIZE]>,
    pos: usize,
    sink: S,
}

impl<S: Sink> RingOutput<S> {
    fn new(sink: S) -> Self {
        RingOutput {
            ring: Box::new([0; WINDOW_SIZE]),
            pos: 0,
            sink,
        }
    }
}

impl<S: Sink> DecodeOutput for RingOutput<S> {
    fn write_literals(&mut self, data: &[u8]) -> Result<(), DecompressError> {
        self.sink.write(data)?;
        for (i, &byte) in data.iter().enumerate() {
            self.ring[(self.pos + i) & (WINDOW_SIZE - 1)] = byte;
        }
        self.pos += data.len();
        Ok(())
    }

    fn copy_match(&mut self, offset: usize, length: usize) -> Result<(), DecompressError> {
        let start = self.pos - offset;
        for i in 0..length {
            // Offsets shorter than the match wrap back onto the copy source.
            let back = if i < offset { i } else { i % offset };
            let byte = self.ring[(start + back) & (WINDOW_SIZE - 1)];
            self.sink.write(&[byte])?;
            self.ring[(self.pos + i) & (WINDOW_SIZE - 1)] = byte;
        }
        self.pos += length;
        Ok(())
    }
}

/// Decompresses a raw token stream into a new `Vec` of `original_size` bytes.
pub fn decompress_raw(input: &[u8], original_size: usize) -> Result<Vec<u8>, DecompressError> {
    let mut output = vec![0u8; original_size];
    decompress_raw_into(input, &mut output, original_size)?;
    Ok(output)
}

/// Decompresses a raw token stream into `output`, returning the produced
/// length (always `original_size` on success).
pub fn decompress_raw_into(
    input: &[u8],
    output: &mut [u8],
    original_size: usize,
) -> Result<usize, DecompressError> {
    if output.len() < original_size {
        return Err(DecompressError::OutputTooSmall {
            expected: original_size,
            actual: output.len(),
        });
    }
    let mut out = SliceOutput { output, pos: 0 };
    decompress_core(input, &mut out, original_size)?;
    Ok(out.pos)
}

/// Decompresses a raw token stream, flushing plaintext through `write`
/// whenever `scratch` runs full.
pub fn decompress_raw_stream<F>(
    input: &[u8],
    original_size: usize,
    scratch: &mut [u8],
    write: F,
) -> Result<(), DecompressError>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    if scratch.is_empty() {
        return Err(DecompressError::EmptyScratch);
    }
    let mut sink = decompress_stream_core(input, original_size, ScratchSink::new(scratch, write))?;
    sink.finish()?;
    Ok(())
}

/// Streaming decode over an arbitrary sink; the frame layer stacks a CRC tee
/// on top. Returns the sink so the caller can finish it.
pub(crate) fn decompress_stream_core<S: Sink>(
    input: &[u8],
    original_size: usize,
    sink: S,
) -> Result<S, DecompressError> {
    let mut out = RingOutput::new(sink);
    decompress_core(input, &mut out, original_size)?;
    Ok(out.sink)
}
