//! Bounded-queue worker pipeline for data logger streams.
//!
//! ```text
//! bytes ──▶ frames ──▶ decode ──▶ demux ──▶ consumer
//!        [queue]    [queue]    [queue]
//! ```
//!
//! Each arrow is a tokio task; each queue is a bounded `mpsc` channel of
//! [`PipelineConfig::queue_capacity`] items. Build a chain with
//! [`Chain::from_reader`] (or [`epoch_chain`]), read from it with
//! [`Chain::recv`] or as a [`Stream`](futures_core::Stream), then call
//! [`Chain::join`] to collect the terminal error, if any.

pub mod chain;
pub mod config;
pub mod error;
pub mod stage;

pub use chain::{epoch_chain, epoch_chain_async, Chain};
pub use config::{PipelineConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{PipelineError, Result};
pub use stage::Stage;
