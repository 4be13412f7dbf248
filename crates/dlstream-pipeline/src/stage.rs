use dlstream_epoch::{DemuxOutput, Demuxer};
use dlstream_frame::Message;
use dlstream_sample::{Sample, SampleDecoder};

use crate::error::Result;

/// One step of a pipeline, run by its own worker.
///
/// `process` is called once per input item in queue order. Returning
/// `Ok(None)` consumes the item without output. An error ends the worker.
/// `finish` runs once the input queue is closed and drained.
pub trait Stage: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Name used in log events.
    fn name(&self) -> &'static str;

    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Stage for SampleDecoder {
    type Input = Message;
    type Output = Sample;

    fn name(&self) -> &'static str {
        "decode"
    }

    fn process(&mut self, message: Message) -> Result<Option<Sample>> {
        Ok(Some(self.decode(message)?))
    }
}

impl Stage for Demuxer {
    type Input = Sample;
    type Output = DemuxOutput;

    fn name(&self) -> &'static str {
        "demux"
    }

    fn process(&mut self, sample: Sample) -> Result<Option<DemuxOutput>> {
        Ok(self.push(sample))
    }

    fn finish(&mut self) -> Result<()> {
        Demuxer::finish(self);
        Ok(())
    }
}
