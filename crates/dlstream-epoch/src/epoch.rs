use std::collections::BTreeMap;

use dlstream_frame::Channel;
use dlstream_sample::sample::serialize_time_opt;
use dlstream_sample::units::{
    Acceleration, Altitude, AltitudeAccuracy, Coordinate, Frequency, GpsAccuracy, GpsTime,
    Heading, HeadingAccuracy, Speed, TimeOffset, Voltage,
};
use dlstream_sample::StartStopInfo;
use serde::Serialize;
use time::OffsetDateTime;

/// Snapshot of all tracked vehicle state for one time slice.
///
/// An epoch covers `start..stop`, where both bounds come from consecutive
/// timestamp markers. Every other field holds the latest value seen up to
/// `stop`. Emitted epochs own their maps; nothing downstream of the
/// demultiplexer can observe later accumulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Epoch {
    /// Wall-clock time from the most recent date storage sample.
    #[serde(serialize_with = "serialize_time_opt")]
    pub time: Option<OffsetDateTime>,
    pub start: TimeOffset,
    pub stop: TimeOffset,
    pub gps_time: GpsTime,
    pub speed: Speed,
    pub lateral_acceleration: Acceleration,
    pub longitudinal_acceleration: Acceleration,
    pub vector_acceleration: Acceleration,
    pub heading: Heading,
    pub heading_accuracy: HeadingAccuracy,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub gps_accuracy: GpsAccuracy,
    pub altitude: Altitude,
    pub altitude_accuracy: AltitudeAccuracy,
    /// Latest reading per analog input channel.
    pub analog_inputs: BTreeMap<Channel, Voltage>,
    /// Latest reading per frequency input channel.
    pub frequency_inputs: BTreeMap<Channel, Frequency>,
    /// Latest session start/stop descriptor, if one has been seen.
    pub start_stop: Option<StartStopInfo>,
}

impl Epoch {
    /// Length of the slice.
    pub fn duration(&self) -> TimeOffset {
        TimeOffset(self.stop.0 - self.start.0)
    }
}
