use std::io::Read;
use std::sync::Arc;

use dlstream_epoch::{DemuxOutput, Demuxer};
use dlstream_frame::{ChannelTable, DeframeStats, FrameReader};
use dlstream_pipeline::Result;
use dlstream_sample::SampleDecoder;

/// Frames, decodes and demultiplexes a blocking byte source on the calling
/// thread.
///
/// Yields the same sequence a pipeline built with
/// [`epoch_chain`](dlstream_pipeline::epoch_chain) would, without spawning
/// workers. The first error is yielded once and ends iteration.
pub struct EpochReader<R> {
    frames: FrameReader<R>,
    decoder: SampleDecoder,
    demuxer: Demuxer,
    done: bool,
}

impl<R: Read> EpochReader<R> {
    /// Reader using the built-in channel table.
    pub fn new(inner: R) -> Self {
        Self::with_table(inner, Arc::new(ChannelTable::standard()))
    }

    pub fn with_table(inner: R, table: Arc<ChannelTable>) -> Self {
        Self {
            frames: FrameReader::with_table(inner, table),
            decoder: SampleDecoder::default(),
            demuxer: Demuxer::new(),
            done: false,
        }
    }

    /// Framing counters so far.
    pub fn stats(&self) -> DeframeStats {
        self.frames.stats()
    }

    /// Epochs emitted so far.
    pub fn epochs(&self) -> u64 {
        self.demuxer.epochs()
    }

    pub fn into_inner(self) -> R {
        self.frames.into_inner()
    }

    fn step(&mut self) -> Result<Option<DemuxOutput>> {
        loop {
            let Some(message) = self.frames.read_message()? else {
                self.demuxer.finish();
                return Ok(None);
            };
            let sample = self.decoder.decode(message)?;
            if let Some(output) = self.demuxer.push(sample) {
                return Ok(Some(output));
            }
        }
    }
}

impl<R: Read> Iterator for EpochReader<R> {
    type Item = Result<DemuxOutput>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(output)) => Some(Ok(output)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
