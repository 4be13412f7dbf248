//! Typed decoding of data logger frame payloads.
//!
//! [`SampleDecoder`] maps each validated [`Message`](dlstream_frame::Message)
//! to one [`Sample`] variant by channel. Numeric fields are big-endian and
//! carry unit-tagged types from [`units`].

pub mod decoder;
pub mod error;
pub mod run_status;
pub mod sample;
pub mod units;
pub mod zone;

pub use decoder::{SampleDecoder, FREQUENCY_CLOCK_HZ};
pub use error::{DecodeError, Result};
pub use run_status::{
    AutoMethod, PreTriggerLoopMethod, StartMethod, StartStopInfo, Status, StopMethod,
    TrackMarkerFailure, TrackMarkerFailureCode,
};
pub use sample::{
    format_time, Accelerations, AnalogInput, BeaconPulse, CourseData, DateStorage,
    FrequencyInput, GpsAltitude, GpsPosition, GpsTimeStorage, LapMarker, LoggerStorage, Sample,
    SpeedData, Timestamp,
};
pub use zone::{FixedZone, ZoneCache};
