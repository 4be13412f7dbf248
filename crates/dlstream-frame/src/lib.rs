//! Checksummed, fixed-length frame reading for data logger streams.
//!
//! Every frame on the wire is laid out as:
//! - a 1-byte data channel id
//! - a payload whose length is fixed per channel by the [`ChannelTable`]
//! - a 1-byte checksum: the low byte of `channel + sum(payload)`
//!
//! There is no magic number and no length prefix, so readers locate frame
//! boundaries by trial: a position is trusted only after two consecutive
//! frames validate there. See [`Deframer`] for the synchronization rules.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::{Channel, ChannelTable, ANALOG_CHANNELS, FREQUENCY_CHANNELS};
#[cfg(feature = "async")]
pub use codec::MessageCodec;
pub use codec::{checksum, encode_message, read_message, DeframeStats, Deframer, Message};
pub use error::{FrameError, Result};
pub use reader::{FrameReader, ReaderConfig};
pub use writer::FrameWriter;
