use std::io::{ErrorKind, Read};
use std::sync::Arc;

use bytes::BytesMut;

use crate::channel::ChannelTable;
use crate::codec::{DeframeStats, Deframer, Message};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default number of bytes requested from the source per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for the blocking frame reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Bytes requested from the source per `read` call. Default: 8 KiB.
    pub read_chunk_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Reads validated messages from any `Read` byte source.
///
/// Handles partial reads and frame synchronization internally; callers only
/// ever see checksum-valid messages in stream order.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    chunk: Vec<u8>,
    deframer: Deframer,
    config: ReaderConfig,
    eof: bool,
    done: bool,
}

impl<T: Read> FrameReader<T> {
    /// Create a reader over the built-in channel table.
    pub fn new(inner: T) -> Self {
        Self::with_table(inner, Arc::new(ChannelTable::standard()))
    }

    /// Create a reader over an explicit channel table.
    pub fn with_table(inner: T, table: Arc<ChannelTable>) -> Self {
        Self::with_config(inner, table, ReaderConfig::default())
    }

    /// Create a reader with explicit table and configuration.
    pub fn with_config(inner: T, table: Arc<ChannelTable>, config: ReaderConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            chunk: vec![0u8; config.read_chunk_size.max(1)],
            deframer: Deframer::new(table),
            config,
            eof: false,
            done: false,
        }
    }

    /// Read the next message (blocking).
    ///
    /// Returns `Ok(None)` once the source is exhausted and every buffered
    /// frame has been delivered. Errors are terminal.
    pub fn read_message(&mut self) -> Result<Option<Message>> {
        if self.done {
            return Ok(None);
        }
        let result = self.next_message();
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            if self.eof {
                return self.deframer.decode_eof(&mut self.buf);
            }
            if let Some(message) = self.deframer.decode(&mut self.buf)? {
                return Ok(Some(message));
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.buf.extend_from_slice(&self.chunk[..read]);
        }
    }

    /// Synchronization counters so far.
    pub fn stats(&self) -> DeframeStats {
        self.deframer.stats()
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_message().transpose()
    }
}
