use std::io::{ErrorKind, Write};
use std::sync::Arc;

use bytes::BytesMut;

use crate::channel::{Channel, ChannelTable};
use crate::codec::{encode_message, Message};
use crate::error::{FrameError, Result};

/// Writes checksummed frames to any `Write` sink.
///
/// Produces the same wire format the logger emits, so its output can be fed
/// straight back into a [`FrameReader`](crate::FrameReader).
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    table: Arc<ChannelTable>,
}

impl<T: Write> FrameWriter<T> {
    /// Create a writer over the built-in channel table.
    pub fn new(inner: T) -> Self {
        Self::with_table(inner, Arc::new(ChannelTable::standard()))
    }

    /// Create a writer over an explicit channel table.
    pub fn with_table(inner: T, table: Arc<ChannelTable>) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(64),
            table,
        }
    }

    /// Write a message, recomputing its checksum.
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send(message.channel, message.payload.as_ref())
    }

    /// Encode and send a payload on a channel.
    pub fn send(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_message(&self.table, channel, payload, &mut self.buf)?;
        self.write_buffered()
    }

    /// Write raw bytes unchanged, e.g. trailer padding.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
