//! Time-sliced epochs built from decoded samples.

pub mod demux;
pub mod epoch;

pub use demux::{demux, Demux, DemuxOutput, Demuxer};
pub use epoch::Epoch;
