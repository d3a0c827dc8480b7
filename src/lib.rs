/*! Pure Rust implementation of Berg compression.

Berg is a byte-oriented LZ77 codec with a 4 KiB sliding window. Tokens pack a
literal run and an optional back-reference into a 16-bit head word with up to
two varint extensions; frames wrap the token stream with a `BERG` magic, the
plaintext length and a CRC-32 trailer.

# Examples

```
let input: &[u8] = b"Round and round and round it goes.";
let compressed = berg::compress(input).unwrap();
let decompressed = berg::decompress(&compressed).unwrap();
assert_eq!(input, &decompressed[..]);
```

Streaming output through a callback and a bounded scratch buffer:

```
let input: &[u8] = b"Round and round and round it goes.";
let mut stream = Vec::new();
let mut scratch = [0u8; 64];
berg::compress_stream(
    input,
    &mut scratch,
    |chunk| {
        stream.extend_from_slice(chunk);
        Ok(())
    },
    &berg::CompressConfig::default(),
)
.unwrap();
assert_eq!(stream, berg::compress(input).unwrap());
```
*/
#![forbid(unsafe_code)]

pub mod block;
pub mod frame;
mod sink;

pub use block::compress::{
    compress_raw, compress_raw_into, compress_raw_stream, estimate_max_compressed_size,
    CompressConfig, Compressor,
};
pub use block::decompress::{decompress_raw, decompress_raw_into, decompress_raw_stream};
pub use block::{CompressError, DecompressError};
pub use frame::{
    compress, compress_into, compress_stream, compress_with, decompress, decompress_into,
    decompress_stream, decompressed_size,
};
