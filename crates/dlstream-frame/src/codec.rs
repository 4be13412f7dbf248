use std::fmt;
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::channel::{Channel, ChannelTable};
use crate::error::{FrameError, Result};

/// One validated frame: channel, payload and the transmitted checksum.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    /// Data channel the frame was sent on.
    pub channel: Channel,
    /// Payload bytes, `table[channel] - 2` of them.
    pub payload: Bytes,
    /// Transmitted checksum byte.
    pub checksum: u8,
}

impl Message {
    /// Build a message and compute its checksum.
    pub fn new(channel: Channel, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let checksum = checksum(channel, &payload);
        Self {
            channel,
            payload,
            checksum,
        }
    }

    /// True when the stored checksum matches the channel and payload.
    pub fn is_valid(&self) -> bool {
        checksum(self.channel, &self.payload) == self.checksum
    }

    /// Total wire size: channel byte, payload, checksum byte.
    pub fn wire_len(&self) -> usize {
        self.payload.len() + 2
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("channel", &self.channel)
            .field("payload", &hex(&self.payload))
            .field("checksum", &format_args!("0x{:02x}", self.checksum))
            .finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validity = if self.is_valid() { "valid" } else { "invalid" };
        write!(f, "{} [{}] ({validity})", self.channel, hex(&self.payload))
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Message", 4)?;
        state.serialize_field("channel", &self.channel)?;
        state.serialize_field("channel_name", self.channel.name())?;
        state.serialize_field("payload", &hex(&self.payload))?;
        state.serialize_field("checksum", &self.checksum)?;
        state.end()
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Frame checksum: low byte of `channel + sum(payload)`.
pub fn checksum(channel: Channel, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(channel.0, |sum, byte| sum.wrapping_add(*byte))
}

/// Validate the frame at the start of `bytes` and return its total length.
fn check_frame(table: &ChannelTable, bytes: &[u8]) -> Result<usize> {
    let Some(&id) = bytes.first() else {
        return Err(FrameError::ShortBuffer { need: 1, got: 0 });
    };
    let channel = Channel(id);
    let len = table
        .length_of(channel)
        .ok_or(FrameError::UnknownLength(channel))?;
    if bytes.len() < len {
        return Err(FrameError::ShortBuffer {
            need: len,
            got: bytes.len(),
        });
    }

    let expected = checksum(channel, &bytes[1..len - 1]);
    let actual = bytes[len - 1];
    if expected != actual {
        return Err(FrameError::ChecksumMismatch {
            channel,
            expected,
            actual,
        });
    }
    Ok(len)
}

/// Attempt to read one frame from the start of `bytes`.
///
/// Returns the message and the number of bytes it occupied. This is a single
/// attempt with no synchronization; see [`Deframer`] for stream reading.
pub fn read_message(table: &ChannelTable, bytes: &[u8]) -> Result<(Message, usize)> {
    let len = check_frame(table, bytes)?;
    let message = Message {
        channel: Channel(bytes[0]),
        payload: Bytes::copy_from_slice(&bytes[1..len - 1]),
        checksum: bytes[len - 1],
    };
    Ok((message, len))
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────────────────┬────────────┐
/// │ Channel   │ Payload              │ Checksum   │
/// │ (1B)      │ (table[channel] - 2) │ (1B)       │
/// └───────────┴──────────────────────┴────────────┘
/// ```
pub fn encode_message(
    table: &ChannelTable,
    channel: Channel,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let expected = table
        .payload_len(channel)
        .ok_or(FrameError::UnknownLength(channel))?;
    if payload.len() != expected {
        return Err(FrameError::LengthMismatch {
            channel,
            expected,
            actual: payload.len(),
        });
    }
    dst.reserve(payload.len() + 2);
    dst.put_u8(channel.0);
    dst.put_slice(payload);
    dst.put_u8(checksum(channel, payload));
    Ok(())
}

/// Counters describing what a [`Deframer`] has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeframeStats {
    /// Messages emitted.
    pub messages: u64,
    /// Bytes dropped while searching for frame alignment.
    pub discarded_bytes: u64,
    /// Number of times alignment was (re)acquired.
    pub syncs: u64,
}

/// Incremental frame decoder with resynchronization.
///
/// The deframer starts unsynchronized. While unsynchronized it reinterprets
/// each successive byte as a channel id until two consecutive frames validate
/// at that position; both are then emitted and reading continues
/// sequentially. A checksum mismatch or an unknown channel while synced drops
/// back to the unsynchronized state one byte past the failed frame start.
///
/// A synced-mode checksum mismatch also opens a trailer check: if the stream
/// ends before alignment is re-acquired, the bytes after the failed frame must
/// be one lead byte, `table[lead]` bytes of any value, then only `0x00`.
pub struct Deframer {
    table: Arc<ChannelTable>,
    synced: bool,
    pending: Option<Message>,
    trailer: Option<Trailer>,
    offset: u64,
    stats: DeframeStats,
}

enum Confirm {
    Found(usize, usize),
    NeedMore,
    Rejected,
}

impl Deframer {
    pub fn new(table: Arc<ChannelTable>) -> Self {
        Self {
            table,
            synced: false,
            pending: None,
            trailer: None,
            offset: 0,
            stats: DeframeStats::default(),
        }
    }

    /// Decode the next message from `src`.
    ///
    /// Returns `Ok(None)` when more data is needed. Consumed bytes are
    /// removed from `src`.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        self.next(src, false)
    }

    /// Decode the next message once no more data will arrive.
    ///
    /// Call repeatedly until it returns `Ok(None)`; that is the clean end of
    /// the stream.
    pub fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        if let Some(message) = self.next(src, true)? {
            return Ok(Some(message));
        }
        if let Some(trailer) = self.trailer.take() {
            trailer.finish()?;
        }
        Ok(None)
    }

    /// True once two consecutive frames have validated and no fault has been
    /// seen since.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn stats(&self) -> DeframeStats {
        self.stats
    }

    pub fn table(&self) -> &Arc<ChannelTable> {
        &self.table
    }

    fn next(&mut self, src: &mut BytesMut, eof: bool) -> Result<Option<Message>> {
        if let Some(message) = self.pending.take() {
            return Ok(Some(message));
        }

        loop {
            if src.is_empty() {
                return Ok(None);
            }

            if self.synced {
                match check_frame(&self.table, src) {
                    Ok(len) => return Ok(Some(self.take(src, len))),
                    Err(FrameError::ShortBuffer { need, got }) => {
                        if !eof {
                            return Ok(None);
                        }
                        self.stats.discarded_bytes += got as u64;
                        self.offset += got as u64;
                        src.clear();
                        return Err(FrameError::ShortBuffer { need, got });
                    }
                    Err(err) => {
                        debug!(offset = self.offset, error = %err, "frame alignment lost");
                        if let FrameError::ChecksumMismatch { channel, .. } = err {
                            let len = self.table.length_of(channel).unwrap_or(1);
                            self.trailer = Some(Trailer::new(len));
                        }
                        self.synced = false;
                        self.discard(src, 1);
                    }
                }
                continue;
            }

            match self.confirm(src) {
                Confirm::Found(first, second) => {
                    let message = self.take(src, first);
                    self.pending = Some(self.take(src, second));
                    self.synced = true;
                    self.trailer = None;
                    self.stats.syncs += 1;
                    debug!(
                        offset = self.offset,
                        discarded = self.stats.discarded_bytes,
                        "frame alignment acquired"
                    );
                    return Ok(Some(message));
                }
                Confirm::NeedMore if !eof => return Ok(None),
                Confirm::NeedMore | Confirm::Rejected => self.discard(src, 1),
            }
        }
    }

    fn confirm(&self, src: &[u8]) -> Confirm {
        let first = match check_frame(&self.table, src) {
            Ok(len) => len,
            Err(FrameError::ShortBuffer { .. }) => return Confirm::NeedMore,
            Err(_) => return Confirm::Rejected,
        };
        match check_frame(&self.table, &src[first..]) {
            Ok(second) => Confirm::Found(first, second),
            Err(FrameError::ShortBuffer { .. }) => Confirm::NeedMore,
            Err(_) => Confirm::Rejected,
        }
    }

    fn take(&mut self, src: &mut BytesMut, len: usize) -> Message {
        let frame = src.split_to(len).freeze();
        self.offset += len as u64;
        self.stats.messages += 1;
        Message {
            channel: Channel(frame[0]),
            checksum: frame[len - 1],
            payload: frame.slice(1..len - 1),
        }
    }

    fn discard(&mut self, src: &mut BytesMut, count: usize) {
        let count = count.min(src.len());
        if let Some(trailer) = self.trailer.as_mut() {
            for (i, byte) in src[..count].iter().enumerate() {
                trailer.feed(&self.table, self.offset + i as u64, *byte);
            }
        }
        src.advance(count);
        self.offset += count as u64;
        self.stats.discarded_bytes += count as u64;
    }
}

/// Position inside the device's trailer convention after a failed frame.
#[derive(Debug, Clone, Copy)]
enum TrailerState {
    /// Bytes of the failed frame still to pass.
    Failed(usize),
    Lead,
    Skip(usize),
    Padding,
}

#[derive(Debug)]
struct Trailer {
    state: TrailerState,
    violation: Option<(u64, u8)>,
}

impl Trailer {
    fn new(failed_len: usize) -> Self {
        Self {
            state: TrailerState::Failed(failed_len),
            violation: None,
        }
    }

    fn feed(&mut self, table: &ChannelTable, offset: u64, byte: u8) {
        self.state = match self.state {
            TrailerState::Failed(n) if n > 1 => TrailerState::Failed(n - 1),
            TrailerState::Failed(_) => TrailerState::Lead,
            TrailerState::Lead => match table.length_of(Channel(byte)) {
                Some(len) => TrailerState::Skip(len),
                None => TrailerState::Padding,
            },
            TrailerState::Skip(n) if n > 1 => TrailerState::Skip(n - 1),
            TrailerState::Skip(_) => TrailerState::Padding,
            TrailerState::Padding => {
                if byte != 0x00 && self.violation.is_none() {
                    self.violation = Some((offset, byte));
                }
                TrailerState::Padding
            }
        };
    }

    fn finish(self) -> Result<()> {
        match self.violation {
            Some((offset, byte)) => Err(FrameError::UnexpectedInput { offset, byte }),
            None => Ok(()),
        }
    }
}

/// `tokio_util` codec over the same synchronization rules as [`Deframer`].
#[cfg(feature = "async")]
pub struct MessageCodec {
    deframer: Deframer,
}

#[cfg(feature = "async")]
impl MessageCodec {
    pub fn new(table: Arc<ChannelTable>) -> Self {
        Self {
            deframer: Deframer::new(table),
        }
    }

    pub fn stats(&self) -> DeframeStats {
        self.deframer.stats()
    }
}

#[cfg(feature = "async")]
impl tokio_util::codec::Decoder for MessageCodec {
    type Item = Message;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        self.deframer.decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        self.deframer.decode_eof(src)
    }
}

#[cfg(feature = "async")]
impl tokio_util::codec::Encoder<Message> for MessageCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<()> {
        encode_message(self.deframer.table(), item.channel, &item.payload, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<ChannelTable> {
        Arc::new(ChannelTable::standard())
    }

    fn timestamp(centis: u8) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_message(&table(), Channel::TIMESTAMP, &[0, 0, centis], &mut buf).unwrap();
        buf.to_vec()
    }

    fn drain(deframer: &mut Deframer, wire: &[u8]) -> (Vec<Message>, Result<()>) {
        let mut src = BytesMut::from(wire);
        let mut out = Vec::new();
        loop {
            match deframer.decode_eof(&mut src) {
                Ok(Some(message)) => out.push(message),
                Ok(None) => return (out, Ok(())),
                Err(err) => return (out, Err(err)),
            }
        }
    }

    fn centis(messages: &[Message]) -> Vec<u8> {
        messages.iter().map(|m| m.payload[2]).collect()
    }

    #[test]
    fn checksum_wraps_at_256() {
        assert_eq!(checksum(Channel(9), &[0, 0, 1]), 10);
        assert_eq!(checksum(Channel(200), &[100]), 44);
        assert_eq!(checksum(Channel(0xff), &[0xff, 0x02]), 0x00);
    }

    #[test]
    fn encode_then_read_recovers_payload() {
        let mut wire = BytesMut::new();
        let payload = [0x12, 0x34, 0x56, 0x78, 0x00, 0x00, 0x01, 0x00];
        encode_message(&table(), Channel::SPEED_DATA, &payload, &mut wire).unwrap();
        assert_eq!(wire.len(), 10);

        let (message, len) = read_message(&table(), &wire).unwrap();
        assert_eq!(len, 10);
        assert_eq!(message.channel, Channel::SPEED_DATA);
        assert_eq!(message.payload.as_ref(), &payload);
        assert!(message.is_valid());
    }

    #[test]
    fn encode_rejects_wrong_payload_length() {
        let mut wire = BytesMut::new();
        let err = encode_message(&table(), Channel::TIMESTAMP, &[1, 2], &mut wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
        assert!(wire.is_empty());
    }

    #[test]
    fn read_message_faults() {
        let table = table();
        assert!(matches!(
            read_message(&table, &[0x03, 0, 0, 0]),
            Err(FrameError::UnknownLength(Channel(3)))
        ));
        assert!(matches!(
            read_message(&table, &[0x09, 0, 0]),
            Err(FrameError::ShortBuffer { need: 5, got: 3 })
        ));
        assert!(matches!(
            read_message(&table, &[0x09, 0, 0, 1, 0x0b]),
            Err(FrameError::ChecksumMismatch {
                expected: 0x0a,
                actual: 0x0b,
                ..
            })
        ));
        assert!(!FrameError::ShortBuffer { need: 1, got: 0 }.is_recoverable());
        assert!(FrameError::UnknownLength(Channel(3)).is_recoverable());
    }

    #[test]
    fn aligned_stream_emits_every_frame() {
        let wire: Vec<u8> = (1..=4).flat_map(timestamp).collect();
        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2, 3, 4]);
        assert_eq!(deframer.stats().discarded_bytes, 0);
        assert_eq!(deframer.stats().syncs, 1);
    }

    #[test]
    fn leading_garbage_is_skipped() {
        let mut wire = vec![0x00, 0x03, 0xff, 0x00];
        wire.extend((1..=3).flat_map(timestamp));
        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2, 3]);
        assert_eq!(deframer.stats().discarded_bytes, 4);
    }

    #[test]
    fn single_frame_is_never_trusted() {
        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &timestamp(1));
        result.unwrap();
        assert!(messages.is_empty());
        assert!(!deframer.is_synced());
    }

    #[test]
    fn corrupted_frame_is_dropped_and_alignment_recovers() {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        let mut bad = timestamp(3);
        bad[2] = 0xff;
        wire.extend(bad);
        wire.extend(timestamp(4));
        wire.extend(timestamp(5));
        wire.extend(timestamp(6));

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2, 4, 5, 6]);
        assert_eq!(deframer.stats().discarded_bytes, 5);
        assert_eq!(deframer.stats().syncs, 2);
    }

    #[test]
    fn recovery_requires_two_consecutive_frames() {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        let mut bad = timestamp(3);
        bad[2] = 0xff;
        wire.extend(bad);
        wire.extend(timestamp(4));

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2]);
    }

    #[test]
    fn unknown_channel_in_stream_resynchronizes_without_trailer() {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        wire.push(0x03);
        wire.extend(timestamp(3));
        wire.extend(timestamp(4));

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2, 3, 4]);
        assert_eq!(deframer.stats().discarded_bytes, 1);
    }

    #[test]
    fn partial_frame_at_end_is_short_buffer() {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        wire.extend([0x09, 0x00]);

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        assert_eq!(centis(&messages), vec![1, 2]);
        assert!(matches!(
            result,
            Err(FrameError::ShortBuffer { need: 5, got: 2 })
        ));
    }

    fn padded_stream() -> Vec<u8> {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        let mut bad = timestamp(3);
        bad[4] ^= 0x40;
        wire.extend(bad);
        // lead byte names a 5-byte channel; five bytes of anything follow
        wire.push(0x09);
        wire.extend([1, 2, 3, 4, 5]);
        wire.extend([0u8; 8]);
        wire
    }

    #[test]
    fn trailing_padding_after_checksum_mismatch_is_accepted() {
        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &padded_stream());

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2]);
    }

    #[test]
    fn non_zero_byte_in_padding_is_unexpected_input() {
        let mut wire = padded_stream();
        let at = 5 + 5 + 5 + 1 + 5 + 3;
        wire[at] = 0x07;

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        assert_eq!(centis(&messages), vec![1, 2]);
        match result {
            Err(FrameError::UnexpectedInput { offset, byte }) => {
                assert_eq!(offset, at as u64);
                assert_eq!(byte, 0x07);
            }
            other => panic!("expected UnexpectedInput, got {other:?}"),
        }
    }

    #[test]
    fn stream_ending_on_checksum_mismatch_is_clean() {
        let mut wire: Vec<u8> = Vec::new();
        wire.extend(timestamp(1));
        wire.extend(timestamp(2));
        let mut bad = timestamp(3);
        bad[4] = 0;
        wire.extend(bad);

        let mut deframer = Deframer::new(table());
        let (messages, result) = drain(&mut deframer, &wire);

        result.unwrap();
        assert_eq!(centis(&messages), vec![1, 2]);
    }

    #[test]
    fn incremental_input_matches_whole_input() {
        let mut wire = vec![0x00, 0x00];
        wire.extend((1..=5).flat_map(timestamp));

        let mut deframer = Deframer::new(table());
        let mut src = BytesMut::new();
        let mut out = Vec::new();
        for byte in &wire {
            src.put_u8(*byte);
            while let Some(message) = deframer.decode(&mut src).unwrap() {
                out.push(message);
            }
        }
        while let Some(message) = deframer.decode_eof(&mut src).unwrap() {
            out.push(message);
        }

        assert_eq!(centis(&out), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn message_display_and_serialize() {
        let message = Message::new(Channel::ANALOG_1, vec![0x01, 0x2c]);
        assert_eq!(message.checksum, 20u8.wrapping_add(0x01).wrapping_add(0x2c));
        assert_eq!(message.to_string(), "Analog 1 (20) [012c] (valid)");
        assert_eq!(message.wire_len(), 4);
    }
}
