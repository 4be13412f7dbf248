use dlstream_sample::Sample;
use serde::Serialize;
use tracing::debug;

use crate::epoch::Epoch;

/// Item produced by the demultiplexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemuxOutput {
    /// A completed time slice.
    Epoch(Epoch),
    /// A sample the demultiplexer does not fold into epochs.
    Sample(Sample),
}

impl DemuxOutput {
    pub fn as_epoch(&self) -> Option<&Epoch> {
        match self {
            DemuxOutput::Epoch(epoch) => Some(epoch),
            DemuxOutput::Sample(_) => None,
        }
    }

    pub fn into_epoch(self) -> Option<Epoch> {
        match self {
            DemuxOutput::Epoch(epoch) => Some(epoch),
            DemuxOutput::Sample(_) => None,
        }
    }
}

/// Folds an ordered sample sequence into epochs.
///
/// One accumulator is updated per sample. A timestamp closes the current
/// slice: the accumulator's `stop` is set, a copy is emitted, and `start` is
/// seeded from the same offset so consecutive epochs tile the session.
/// Samples with no epoch field pass through unchanged.
#[derive(Debug, Default)]
pub struct Demuxer {
    epoch: Epoch,
    pending: usize,
    emitted: u64,
}

impl Demuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample.
    pub fn push(&mut self, sample: Sample) -> Option<DemuxOutput> {
        let epoch = &mut self.epoch;
        match sample {
            Sample::GpsTimeStorage(s) => epoch.gps_time = s.time,
            Sample::Accelerations(a) => {
                epoch.lateral_acceleration = a.lateral;
                epoch.longitudinal_acceleration = a.longitudinal;
                epoch.vector_acceleration = a.vector();
            }
            Sample::Timestamp(t) => {
                epoch.stop = t.offset;
                let completed = epoch.clone();
                epoch.start = t.offset;
                self.pending = 0;
                self.emitted += 1;
                return Some(DemuxOutput::Epoch(completed));
            }
            Sample::GpsPosition(p) => {
                epoch.latitude = p.latitude;
                epoch.longitude = p.longitude;
                epoch.gps_accuracy = p.accuracy;
            }
            Sample::SpeedData(s) => epoch.speed = s.speed,
            Sample::FrequencyInput(i) => {
                epoch.frequency_inputs.insert(i.channel, i.frequency);
            }
            Sample::AnalogInput(i) => {
                epoch.analog_inputs.insert(i.channel, i.voltage);
            }
            Sample::DateStorage(d) => epoch.time = Some(d.time),
            Sample::CourseData(c) => {
                epoch.heading = c.heading;
                epoch.heading_accuracy = c.accuracy;
            }
            Sample::GpsAltitude(a) => {
                epoch.altitude = a.altitude;
                epoch.altitude_accuracy = a.accuracy;
            }
            Sample::StartStopInfo(info) => epoch.start_stop = Some(info),
            passthrough @ (Sample::TrackMarkerFailure(_)
            | Sample::Status(_)
            | Sample::LapMarker(_)
            | Sample::LoggerStorage(_)
            | Sample::BeaconPulse(_)
            | Sample::Raw(_)) => return Some(DemuxOutput::Sample(passthrough)),
        }
        self.pending += 1;
        None
    }

    /// End of input. Samples folded since the last timestamp are dropped.
    ///
    /// Returns how many were dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = std::mem::take(&mut self.pending);
        if dropped > 0 {
            debug!(
                dropped,
                epochs = self.emitted,
                "dropping partial epoch at end of stream"
            );
        }
        dropped
    }

    /// Epochs emitted so far.
    pub fn epochs(&self) -> u64 {
        self.emitted
    }

    /// Samples folded into the open slice.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

/// Lazily demultiplex a sample sequence.
pub fn demux<I>(samples: I) -> Demux<I::IntoIter>
where
    I: IntoIterator<Item = Sample>,
{
    Demux {
        inner: samples.into_iter(),
        demuxer: Demuxer::new(),
        finished: false,
    }
}

/// Iterator returned by [`demux`].
#[derive(Debug)]
pub struct Demux<I> {
    inner: I,
    demuxer: Demuxer,
    finished: bool,
}

impl<I: Iterator<Item = Sample>> Iterator for Demux<I> {
    type Item = DemuxOutput;

    fn next(&mut self) -> Option<DemuxOutput> {
        for sample in self.inner.by_ref() {
            if let Some(output) = self.demuxer.push(sample) {
                return Some(output);
            }
        }
        if !self.finished {
            self.finished = true;
            self.demuxer.finish();
        }
        None
    }
}
