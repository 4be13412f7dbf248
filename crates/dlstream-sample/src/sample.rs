use std::fmt;

use dlstream_frame::{Channel, Message};
use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::run_status::{StartStopInfo, Status, TrackMarkerFailure};
use crate::units::{
    Acceleration, Altitude, AltitudeAccuracy, Coordinate, Frequency, GpsAccuracy, GpsTime,
    Heading, HeadingAccuracy, Speed, SpeedAccuracy, TimeOffset, Voltage,
};

/// One decoded measurement, produced from exactly one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Sample {
    StartStopInfo(StartStopInfo),
    TrackMarkerFailure(TrackMarkerFailure),
    Status(Status),
    LapMarker(LapMarker),
    LoggerStorage(LoggerStorage),
    GpsTimeStorage(GpsTimeStorage),
    Accelerations(Accelerations),
    Timestamp(Timestamp),
    GpsPosition(GpsPosition),
    SpeedData(SpeedData),
    BeaconPulse(BeaconPulse),
    FrequencyInput(FrequencyInput),
    AnalogInput(AnalogInput),
    DateStorage(DateStorage),
    CourseData(CourseData),
    GpsAltitude(GpsAltitude),
    /// Valid message on a channel with no decode rule.
    Raw(Message),
}

impl Sample {
    /// Variant name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Sample::StartStopInfo(_) => "StartStopInfo",
            Sample::TrackMarkerFailure(_) => "TrackMarkerFailure",
            Sample::Status(_) => "Status",
            Sample::LapMarker(_) => "LapMarker",
            Sample::LoggerStorage(_) => "LoggerStorage",
            Sample::GpsTimeStorage(_) => "GpsTimeStorage",
            Sample::Accelerations(_) => "Accelerations",
            Sample::Timestamp(_) => "Timestamp",
            Sample::GpsPosition(_) => "GpsPosition",
            Sample::SpeedData(_) => "SpeedData",
            Sample::BeaconPulse(_) => "BeaconPulse",
            Sample::FrequencyInput(_) => "FrequencyInput",
            Sample::AnalogInput(_) => "AnalogInput",
            Sample::DateStorage(_) => "DateStorage",
            Sample::CourseData(_) => "CourseData",
            Sample::GpsAltitude(_) => "GpsAltitude",
            Sample::Raw(_) => "Raw",
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::StartStopInfo(info) => write!(
                f,
                "start: {}, stop: {}",
                info.start_method, info.stop_method
            ),
            Sample::TrackMarkerFailure(failure) => write!(f, "track marker failure: {}", failure.code),
            Sample::Status(status) => write!(f, "{status:?}"),
            Sample::LapMarker(m) => write!(
                f,
                "marker {} at {:.7}, {:.7} heading {:.2}",
                m.marker, m.latitude, m.longitude, m.heading
            ),
            Sample::LoggerStorage(s) => write!(
                f,
                "serial {} software {} bootload {}",
                s.serial_number, s.software_version, s.bootload_version
            ),
            Sample::GpsTimeStorage(t) => write!(f, "GPS time {}", t.time),
            Sample::Accelerations(a) => write!(
                f,
                "lateral {:.3}, longitudinal {:.3}",
                a.lateral, a.longitudinal
            ),
            Sample::Timestamp(t) => write!(f, "{}", t.offset),
            Sample::GpsPosition(p) => write!(
                f,
                "{:.7}, {:.7} ± {}",
                p.latitude, p.longitude, p.accuracy
            ),
            Sample::SpeedData(s) => write!(f, "{:.2} ± {}", s.speed, s.accuracy),
            Sample::BeaconPulse(b) => write!(f, "beacon 0x{:02x}", b.data),
            Sample::FrequencyInput(i) => write!(f, "{}: {:.3}", i.channel, i.frequency),
            Sample::AnalogInput(i) => write!(f, "{}: {}", i.channel, i.voltage),
            Sample::DateStorage(d) => f.write_str(&format_time(&d.time)),
            Sample::CourseData(c) => write!(f, "{:.2} ± {:.2}", c.heading, c.accuracy),
            Sample::GpsAltitude(a) => write!(f, "{} ± {}", a.altitude, a.accuracy),
            Sample::Raw(message) => write!(f, "{message}"),
        }
    }
}

/// Position of a track or sector marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapMarker {
    pub marker: u8,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    /// Direction the marker points.
    pub heading: Heading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoggerStorage {
    pub serial_number: u16,
    pub software_version: u8,
    pub bootload_version: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsTimeStorage {
    pub time: GpsTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accelerations {
    /// Positive when cornering around a right-hand turn.
    pub lateral: Acceleration,
    /// Positive when speeding up, negative under braking.
    pub longitudinal: Acceleration,
}

impl Accelerations {
    /// Magnitude of the combined lateral and longitudinal vector.
    pub fn vector(&self) -> Acceleration {
        Acceleration(self.lateral.0.hypot(self.longitudinal.0))
    }
}

/// Time marker: offset since the logging session started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timestamp {
    pub offset: TimeOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsPosition {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub accuracy: GpsAccuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedData {
    pub speed: Speed,
    pub accuracy: SpeedAccuracy,
}

/// Beacon pulse, also used by the device as padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeaconPulse {
    pub data: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyInput {
    pub channel: Channel,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalogInput {
    pub channel: Channel,
    pub voltage: Voltage,
}

/// Wall-clock date and time reported by the logger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateStorage {
    #[serde(serialize_with = "serialize_time")]
    pub time: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseData {
    pub heading: Heading,
    pub accuracy: HeadingAccuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsAltitude {
    pub altitude: Altitude,
    pub accuracy: AltitudeAccuracy,
}

/// RFC 3339 rendering of a decoded timestamp.
///
/// Falls back to the `Display` form for values RFC 3339 cannot express.
pub fn format_time(time: &OffsetDateTime) -> String {
    time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}

/// `serialize_with` helper writing an [`OffsetDateTime`] as RFC 3339.
pub fn serialize_time<S: Serializer>(time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(time))
}

/// `serialize_with` helper for an optional [`OffsetDateTime`].
pub fn serialize_time_opt<S: Serializer>(
    time: &Option<OffsetDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serialize_time(time, serializer),
        None => serializer.serialize_none(),
    }
}
