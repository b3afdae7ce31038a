//! Fixed-size record framing over a chunked byte source.
//!
//! Decompressors hand out data in chunks whose size has nothing to do with the
//! record length. [`StreamDecoder`] accumulates those chunks in a buffer and
//! slices whole records off it with a cursor that is independent of the
//! buffer's write position.

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::{
    error::{Result, TraceError},
    record::RECORD_LEN,
};

/// Number of bytes pulled from the source per refill.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Bytes requested from the source on each refill.
    pub chunk_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(TraceError::Config("chunk size must be non-zero".into()));
        }
        Ok(())
    }
}

pub struct StreamDecoder<R> {
    source: R,
    chunk_size: usize,
    buffer: Vec<u8>,
    /// Offset of the first unconsumed byte in `buffer`.
    cursor: usize,
    /// Total bytes handed out as records.
    position: u64,
    source_exhausted: bool,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(source: R, config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            chunk_size: config.chunk_size,
            buffer: Vec::with_capacity(config.chunk_size + RECORD_LEN),
            cursor: 0,
            position: 0,
            source_exhausted: false,
        })
    }

    /// Returns the next complete record, or `None` once the stream is done.
    ///
    /// A trailing partial record is dropped: it is reported as end-of-stream
    /// and never returned.
    pub fn next_record(&mut self) -> Result<Option<[u8; RECORD_LEN]>> {
        while self.residual() < RECORD_LEN && !self.source_exhausted {
            self.refill()?;
        }

        let Some(bytes) = self.buffer.get(self.cursor..self.cursor + RECORD_LEN) else {
            if self.residual() > 0 {
                trace!(
                    residual = self.residual(),
                    "dropping truncated record at end of stream"
                );
            }
            return Ok(None);
        };

        let mut record = [0u8; RECORD_LEN];
        record.copy_from_slice(bytes);
        self.cursor += RECORD_LEN;
        self.position += RECORD_LEN as u64;
        Ok(Some(record))
    }

    /// Decompressed bytes consumed as whole records so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes buffered but not yet consumed.
    pub fn residual(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Whether both the source and the buffered remainder are used up.
    pub fn is_exhausted(&self) -> bool {
        self.source_exhausted && self.residual() < RECORD_LEN
    }

    fn refill(&mut self) -> Result<()> {
        // Drop consumed bytes once they make up most of the buffer, so the
        // buffer stays around one chunk plus one record.
        if self.cursor > 0 && self.cursor >= self.buffer.len() / 2 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }

        let start = self.buffer.len();
        self.buffer.resize(start + self.chunk_size, 0);
        let read = loop {
            match self.source.read(&mut self.buffer[start..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(start);
                    return Err(e.into());
                }
            }
        };
        self.buffer.truncate(start + read);

        if read == 0 {
            self.source_exhausted = true;
        }
        Ok(())
    }
}
