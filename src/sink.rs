//! Output sinks.
//!
//! Every encode and decode path writes through a [`Sink`]: a single fallible
//! byte-range write. The concrete sinks cover the public output modes: a
//! caller-provided buffer, a scratch buffer flushed through a write callback,
//! and a CRC tee that the framed streaming decoder stacks on top of the
//! scratch sink.

use std::io;

/// Why a sink rejected a write.
#[derive(Debug)]
pub(crate) enum SinkError {
    /// The destination buffer has no room left.
    Full,
    /// The user write callback reported failure.
    Callback(io::Error),
}

pub(crate) trait Sink {
    /// Accepts `data` in its entirety, or fails without a partial-write
    /// indication.
    fn write(&mut self, data: &[u8]) -> Result<(), SinkError>;
}

/// Appends to a caller-provided slice, tracking the used length.
pub(crate) struct SliceSink<'a> {
    output: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub(crate) fn new(output: &'a mut [u8]) -> Self {
        SliceSink { output, pos: 0 }
    }

    /// Number of bytes written so far.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }
}

impl Sink for SliceSink<'_> {
    #[inline]
    fn write(&mut self, data: &[u8]) -> Result<(), SinkError> {
        let end = self.pos.checked_add(data.len()).ok_or(SinkError::Full)?;
        if end > self.output.len() {
            return Err(SinkError::Full);
        }
        self.output[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }
}

/// Fills a scratch buffer and flushes it through the user callback each time
/// it runs full. The scratch length is the largest chunk the callback will
/// ever see; [`ScratchSink::finish`] flushes the remainder.
pub(crate) struct ScratchSink<'a, F> {
    scratch: &'a mut [u8],
    pos: usize,
    write: F,
}

impl<'a, F> ScratchSink<'a, F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    pub(crate) fn new(scratch: &'a mut [u8], write: F) -> Self {
        ScratchSink {
            scratch,
            pos: 0,
            write,
        }
    }

    /// Flushes buffered bytes that have not yet filled the scratch buffer.
    pub(crate) fn finish(&mut self) -> Result<(), SinkError> {
        if self.pos > 0 {
            (self.write)(&self.scratch[..self.pos]).map_err(SinkError::Callback)?;
            self.pos = 0;
        }
        Ok(())
    }
}

impl<F> Sink for ScratchSink<'_, F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    fn write(&mut self, mut data: &[u8]) -> Result<(), SinkError> {
        while !data.is_empty() {
            if self.pos == self.scratch.len() {
                (self.write)(self.scratch).map_err(SinkError::Callback)?;
                self.pos = 0;
            }
            let take = data.len().min(self.scratch.len() - self.pos);
            self.scratch[self.pos..self.pos + take].copy_from_slice(&data[..take]);
            self.pos += take;
            data = &data[take..];
        }
        Ok(())
    }
}

/// Folds every byte into a CRC-32 hasher before forwarding to the inner sink.
pub(crate) struct CrcSink<'a, S> {
    inner: S,
    hasher: &'a mut crc32fast::Hasher,
}

impl<'a, S: Sink> CrcSink<'a, S> {
    pub(crate) fn new(inner: S, hasher: &'a mut crc32fast::Hasher) -> Self {
        CrcSink { inner, hasher }
    }

    pub(crate) fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for CrcSink<'_, S> {
    #[inline]
    fn write(&mut self, data: &[u8]) -> Result<(), SinkError> {
        self.hasher.update(data);
        self.inner.write(data)
    }
}
