//! Unsigned LEB128 varints.
//!
//! Token fields that do not fit their direct bits in the head word are
//! carried in this encoding: seven payload bits per byte, least significant
//! group first, the high bit set on every byte except the last.

use crate::block::DecompressError;
use crate::sink::{Sink, SinkError};

/// Longest legal encoding of a `u64`: ceil(64 / 7) bytes.
pub(crate) const MAX_VARINT_LEN: usize = 10;

/// Encodes `value` into `buf`, returning the number of bytes used.
#[inline]
pub(crate) fn encode_varint(buf: &mut [u8; MAX_VARINT_LEN], mut value: u64) -> usize {
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    len + 1
}

/// Encodes `value` straight into a sink.
#[inline]
pub(crate) fn write_varint<S: Sink>(sink: &mut S, value: u64) -> Result<(), SinkError> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_varint(&mut buf, value);
    sink.write(&buf[..len])
}

/// Decodes a varint from `input` starting at `*pos`, advancing `pos` past it.
///
/// Truncated input and any sequence that cannot fit a `u64` (an eleventh
/// byte, or payload bits shifted past bit 63) are corrupt.
#[inline]
pub(crate) fn decode_varint(input: &[u8], pos: &mut usize) -> Result<u64, DecompressError> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = *input
            .get(*pos)
            .ok_or(DecompressError::ExpectedAnotherByte)?;
        *pos += 1;
        if shift >= 64 {
            return Err(DecompressError::VarintOverflow);
        }
        let payload = (byte & 0x7F) as u64;
        if (payload << shift) >> shift != payload {
            return Err(DecompressError::VarintOverflow);
        }
        value |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SliceSink;

    fn roundtrip(value: u64) {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = encode_varint(&mut buf, value);
        let mut pos = 0;
        assert_eq!(decode_varint(&buf[..len], &mut pos).unwrap(), value);
        assert_eq!(pos, len);
    }

    #[test]
    fn roundtrip_boundaries() {
        for value in [
            0,
            1,
            0x7F,
            0x80,
            300,
            (1 << 14) - 1,
            1 << 14,
            (1 << 21) - 1,
            1 << 32,
            u64::MAX - 1,
            u64::MAX,
        ] {
            roundtrip(value);
        }
    }

    #[test]
    fn max_value_takes_ten_bytes() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        assert_eq!(encode_varint(&mut buf, u64::MAX), 10);
        assert_eq!(&buf[..9], &[0xFF; 9]);
        assert_eq!(buf[9], 0x01);
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&[], &mut pos),
            Err(DecompressError::ExpectedAnotherByte)
        ));
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&[0x80, 0x80], &mut pos),
            Err(DecompressError::ExpectedAnotherByte)
        ));
    }

    #[test]
    fn overlong_input_is_rejected() {
        // Eleven bytes can never be needed for a u64.
        let eleven = [0x80u8; 10]
            .iter()
            .copied()
            .chain([0x00])
            .collect::<Vec<_>>();
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&eleven, &mut pos),
            Err(DecompressError::VarintOverflow)
        ));

        // Ten bytes whose top payload bits overflow bit 63.
        let mut too_big = [0xFFu8; 10];
        too_big[9] = 0x7F;
        let mut pos = 0;
        assert!(matches!(
            decode_varint(&too_big, &mut pos),
            Err(DecompressError::VarintOverflow)
        ));
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_any_value(value in proptest::prelude::any::<u64>()) {
            roundtrip(value);
        }
    }

    #[test]
    fn write_varint_matches_encode_varint() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = encode_varint(&mut buf, 123_456_789);
        let mut out = [0u8; MAX_VARINT_LEN];
        let mut sink = SliceSink::new(&mut out);
        write_varint(&mut sink, 123_456_789).unwrap();
        assert_eq!(sink.pos(), len);
        assert_eq!(out[..len], buf[..len]);
    }
}
