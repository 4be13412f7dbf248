use dlstream_frame::Channel;

/// Errors that can occur while decoding a frame payload into a sample.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is shorter than the decode rule for its channel needs.
    ///
    /// The frame already passed the channel table, so this means the table
    /// and the decode rule disagree. Treat it as a configuration defect.
    #[error("short payload on channel {channel}: need {need} bytes, got {got}")]
    ShortBuffer {
        channel: Channel,
        need: usize,
        got: usize,
    },

    /// A field holds a value outside the decode rule's domain.
    #[error("parse error on channel {channel}: {reason}")]
    Parse { channel: Channel, reason: String },
}

impl DecodeError {
    /// Channel of the offending frame.
    pub fn channel(&self) -> Channel {
        match self {
            DecodeError::ShortBuffer { channel, .. } | DecodeError::Parse { channel, .. } => {
                *channel
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
