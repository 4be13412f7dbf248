use std::io::Read;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use dlstream_epoch::{DemuxOutput, Demuxer};
use dlstream_frame::{ChannelTable, FrameReader, Message, MessageCodec};
use dlstream_sample::SampleDecoder;
use futures_core::Stream;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::stage::Stage;

struct Worker {
    name: &'static str,
    handle: JoinHandle<Result<()>>,
}

/// A running pipeline whose last queue yields `T`.
///
/// Every stage runs as its own task and hands items to the next through a
/// bounded queue, so a slow consumer holds back the whole chain down to the
/// byte source. When a worker finishes, by end of input or by error, it
/// drops its output queue and the end of stream cascades downstream.
///
/// There is no cancellation: a consumer that stops reading without dropping
/// the chain stalls every upstream worker.
pub struct Chain<T> {
    rx: mpsc::Receiver<T>,
    workers: Vec<Worker>,
    capacity: usize,
}

impl Chain<Message> {
    /// Start a chain reading frames from a blocking byte source.
    ///
    /// The reader runs on the blocking thread pool. Must be called from
    /// within a tokio runtime.
    pub fn from_reader<R>(reader: R, table: Arc<ChannelTable>, config: &PipelineConfig) -> Self
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity());
        let reader_config = config.reader.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let mut frames = FrameReader::with_config(reader, table, reader_config);
            let result = pump_frames(&mut frames, &tx);
            let stats = frames.stats();
            debug!(
                messages = stats.messages,
                discarded_bytes = stats.discarded_bytes,
                syncs = stats.syncs,
                "frame source finished"
            );
            if let Err(err) = &result {
                warn!(stage = "frames", error = %err, "worker terminated");
            }
            result
        });
        Self::source("frames", rx, handle, config.capacity())
    }

    /// Start a chain reading frames from an async byte source.
    pub fn from_async_reader<R>(reader: R, table: Arc<ChannelTable>, config: &PipelineConfig) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity());
        let handle = tokio::spawn(async move {
            let mut frames = FramedRead::new(reader, MessageCodec::new(table));
            let result = pump_framed(&mut frames, &tx).await;
            let stats = frames.decoder().stats();
            debug!(
                messages = stats.messages,
                discarded_bytes = stats.discarded_bytes,
                syncs = stats.syncs,
                "frame source finished"
            );
            if let Err(err) = &result {
                warn!(stage = "frames", error = %err, "worker terminated");
            }
            result
        });
        Self::source("frames", rx, handle, config.capacity())
    }
}

fn pump_frames<R: Read>(frames: &mut FrameReader<R>, tx: &mpsc::Sender<Message>) -> Result<()> {
    while let Some(message) = frames.read_message()? {
        if tx.blocking_send(message).is_err() {
            debug!(stage = "frames", "downstream closed, stopping");
            break;
        }
    }
    Ok(())
}

async fn pump_framed<R>(
    frames: &mut FramedRead<R, MessageCodec>,
    tx: &mpsc::Sender<Message>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    while let Some(next) = std::future::poll_fn(|cx| Pin::new(&mut *frames).poll_next(cx)).await {
        if tx.send(next?).await.is_err() {
            debug!(stage = "frames", "downstream closed, stopping");
            break;
        }
    }
    Ok(())
}

impl<T: Send + 'static> Chain<T> {
    fn source(
        name: &'static str,
        rx: mpsc::Receiver<T>,
        handle: JoinHandle<Result<()>>,
        capacity: usize,
    ) -> Self {
        Self {
            rx,
            workers: vec![Worker { name, handle }],
            capacity,
        }
    }

    /// Append a stage fed by this chain's output.
    pub fn then<S>(self, mut stage: S) -> Chain<S::Output>
    where
        S: Stage<Input = T>,
    {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut input = self.rx;
        let name = stage.name();
        let handle = tokio::spawn(async move {
            let result = run_stage(&mut stage, &mut input, &tx).await;
            if let Err(err) = &result {
                warn!(stage = name, error = %err, "worker terminated");
            }
            result
        });

        let mut workers = self.workers;
        workers.push(Worker { name, handle });
        Chain {
            rx,
            workers,
            capacity: self.capacity,
        }
    }

    /// Next item from the final queue; `None` once every stage has finished.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Drain the final queue, then [`join`](Self::join).
    ///
    /// Items produced before a failure are returned alongside the error.
    pub async fn collect(mut self) -> (Vec<T>, Result<()>) {
        let mut items = Vec::new();
        while let Some(item) = self.rx.recv().await {
            items.push(item);
        }
        let result = self.join().await;
        (items, result)
    }

    /// Close the final queue and wait for every worker to stop.
    ///
    /// Returns the first error in stage order. Items still queued are
    /// dropped, so drain with [`recv`](Self::recv) first to see them all.
    pub async fn join(self) -> Result<()> {
        drop(self.rx);
        let mut first = None;
        for worker in self.workers {
            let result = match worker.handle.await {
                Ok(result) => result,
                Err(err) => Err(PipelineError::Worker(format!("{}: {err}", worker.name))),
            };
            if let Err(err) = result {
                first.get_or_insert(err);
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

async fn run_stage<S: Stage>(
    stage: &mut S,
    input: &mut mpsc::Receiver<S::Input>,
    output: &mpsc::Sender<S::Output>,
) -> Result<()> {
    while let Some(item) = input.recv().await {
        if let Some(out) = stage.process(item)? {
            if output.send(out).await.is_err() {
                debug!(stage = stage.name(), "downstream closed, stopping");
                return Ok(());
            }
        }
    }
    stage.finish()
}

impl<T> Stream for Chain<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Bytes to epochs: frame source, sample decoder, demultiplexer.
///
/// The decoder uses `config.zones`.
pub fn epoch_chain<R>(reader: R, table: Arc<ChannelTable>, config: &PipelineConfig) -> Chain<DemuxOutput>
where
    R: Read + Send + 'static,
{
    Chain::<Message>::from_reader(reader, table, config)
        .then(SampleDecoder::new(Arc::clone(&config.zones)))
        .then(Demuxer::new())
}

/// [`epoch_chain`] over an async byte source.
pub fn epoch_chain_async<R>(
    reader: R,
    table: Arc<ChannelTable>,
    config: &PipelineConfig,
) -> Chain<DemuxOutput>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    Chain::<Message>::from_async_reader(reader, table, config)
        .then(SampleDecoder::new(Arc::clone(&config.zones)))
        .then(Demuxer::new())
}
