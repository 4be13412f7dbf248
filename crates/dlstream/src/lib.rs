//! Decode vehicle data logger bitstreams.
//!
//! A logger writes fixed-length, checksummed frames to a serial line; each
//! frame carries one measurement on one channel. dlstream finds those frames
//! in a possibly corrupted byte stream, decodes them into typed samples and
//! folds the samples into epochs, one per timestamp marker.
//!
//! # Crate Structure
//!
//! - [`frame`]: channel table, frame search and resynchronization, writer
//! - [`sample`]: per-channel payload decoding into unit-typed samples
//! - [`epoch`]: the demultiplexer that turns samples into epochs
//! - [`pipeline`]: the same stages as tokio workers joined by bounded queues
//!
//! [`EpochReader`] runs the stages inline on a blocking reader; use
//! [`pipeline::epoch_chain`] to run them concurrently.

mod reader;

pub use reader::EpochReader;

/// Re-export frame types.
pub mod frame {
    pub use dlstream_frame::*;
}

/// Re-export sample types.
pub mod sample {
    pub use dlstream_sample::*;
}

/// Re-export epoch types.
pub mod epoch {
    pub use dlstream_epoch::*;
}

/// Re-export pipeline types.
pub mod pipeline {
    pub use dlstream_pipeline::*;
}
