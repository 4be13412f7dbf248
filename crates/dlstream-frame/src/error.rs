use crate::channel::Channel;

/// Errors that can occur while framing a data logger stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Not enough bytes for a complete frame.
    #[error("short buffer: need {need} bytes, got {got}")]
    ShortBuffer { need: usize, got: usize },

    /// The transmitted checksum does not match the frame contents.
    #[error("checksum mismatch on channel {channel}: expected 0x{expected:02x}, got 0x{actual:02x}")]
    ChecksumMismatch {
        channel: Channel,
        expected: u8,
        actual: u8,
    },

    /// The channel id has no entry in the channel table.
    #[error("unknown frame length for channel {0}")]
    UnknownLength(Channel),

    /// A non-zero byte was found where only trailer padding is allowed.
    #[error("unexpected input 0x{byte:02x} at stream offset {offset}")]
    UnexpectedInput { offset: u64, byte: u8 },

    /// A channel table entry implies an empty or negative payload.
    #[error("invalid frame length {length} for channel {channel} (minimum 3)")]
    InvalidLength { channel: Channel, length: usize },

    /// A payload handed to the encoder disagrees with the channel table.
    #[error("payload length mismatch on channel {channel}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        channel: Channel,
        expected: usize,
        actual: usize,
    },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Faults that the reader absorbs by resynchronizing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FrameError::ChecksumMismatch { .. } | FrameError::UnknownLength(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
