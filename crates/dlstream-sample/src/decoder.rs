use std::sync::Arc;

use dlstream_frame::{Channel, Message};
use time::{Date, Duration, Month, PrimitiveDateTime};
use tracing::{debug, trace};

use crate::error::{DecodeError, Result};
use crate::run_status::{StartStopInfo, Status, TrackMarkerFailure};
use crate::sample::{
    Accelerations, AnalogInput, BeaconPulse, CourseData, DateStorage, FrequencyInput, GpsAltitude,
    GpsPosition, GpsTimeStorage, LapMarker, LoggerStorage, Sample, SpeedData, Timestamp,
};
use crate::units::{
    Acceleration, Altitude, AltitudeAccuracy, Coordinate, Frequency, GpsAccuracy, GpsTime,
    Heading, HeadingAccuracy, Speed, SpeedAccuracy, TimeOffset, Voltage,
};
use crate::zone::ZoneCache;

/// Frequency inputs count pulses of this reference clock.
pub const FREQUENCY_CLOCK_HZ: f64 = 6_000_000.0;

const COORDINATE_SCALE: f64 = 1e-7;
const HEADING_SCALE: f64 = 1e-5;

/// Widest offset a `UtcOffset` holds, 25:59:59.
const MAX_OFFSET_SECONDS: i32 = 25 * 3600 + 59 * 60 + 59;

/// Turns validated messages into typed samples.
///
/// Dispatch is by channel. Channels without a decode rule come back as
/// [`Sample::Raw`], so decoding never fails for an unfamiliar channel; it
/// fails only when a known rule cannot make sense of its payload.
#[derive(Debug, Clone)]
pub struct SampleDecoder {
    zones: Arc<ZoneCache>,
}

impl SampleDecoder {
    pub fn new(zones: Arc<ZoneCache>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &Arc<ZoneCache> {
        &self.zones
    }

    /// Decode one message.
    pub fn decode(&self, message: Message) -> Result<Sample> {
        let channel = message.channel;
        let payload = message.payload.clone();
        let p = payload.as_ref();

        let sample = match channel {
            Channel::RUN_STATUS => return run_status(message),
            Channel::LAP_MARKER => Sample::LapMarker(lap_marker(channel, p)?),
            Channel::LOGGER_STORAGE => {
                require(channel, p, 4)?;
                Sample::LoggerStorage(LoggerStorage {
                    serial_number: be_u16(&p[0..2]),
                    software_version: p[2],
                    bootload_version: p[3],
                })
            }
            Channel::GPS_TIME_STORAGE => {
                require(channel, p, 4)?;
                Sample::GpsTimeStorage(GpsTimeStorage {
                    time: GpsTime(be_u32(&p[0..4])),
                })
            }
            Channel::ACCELERATIONS => {
                require(channel, p, 4)?;
                Sample::Accelerations(Accelerations {
                    lateral: acceleration(&p[0..2]),
                    longitudinal: acceleration(&p[2..4]),
                })
            }
            Channel::TIMESTAMP => {
                require(channel, p, 3)?;
                // centiseconds on the wire
                Sample::Timestamp(Timestamp {
                    offset: TimeOffset(i64::from(be_u24(&p[0..3])) * 10),
                })
            }
            Channel::GPS_POSITION => {
                require(channel, p, 12)?;
                Sample::GpsPosition(GpsPosition {
                    latitude: Coordinate(geo(&p[0..4]) * COORDINATE_SCALE),
                    longitude: Coordinate(geo(&p[4..8]) * COORDINATE_SCALE),
                    accuracy: GpsAccuracy(be_u32(&p[8..12])),
                })
            }
            Channel::SPEED_DATA => {
                require(channel, p, 8)?;
                Sample::SpeedData(SpeedData {
                    speed: Speed(f64::from(be_u32(&p[0..4])) * 0.01),
                    accuracy: SpeedAccuracy(be_u32(&p[4..8])),
                })
            }
            Channel::BEACON_PULSE => {
                require(channel, p, 1)?;
                Sample::BeaconPulse(BeaconPulse { data: p[0] })
            }
            Channel::DATE_STORAGE => match self.date_storage(channel, p)? {
                Some(date) => Sample::DateStorage(date),
                None => {
                    debug!(
                        channel = %channel,
                        "date outside the supported years, passing message through"
                    );
                    Sample::Raw(message)
                }
            },
            Channel::COURSE_DATA => {
                require(channel, p, 8)?;
                Sample::CourseData(CourseData {
                    heading: Heading(geo(&p[0..4]) * HEADING_SCALE),
                    accuracy: HeadingAccuracy(geo(&p[4..8]) * HEADING_SCALE),
                })
            }
            Channel::GPS_ALTITUDE => {
                require(channel, p, 8)?;
                Sample::GpsAltitude(GpsAltitude {
                    altitude: Altitude(be_u32(&p[0..4])),
                    accuracy: AltitudeAccuracy(be_u32(&p[4..8])),
                })
            }
            c if c.is_frequency() => {
                require(channel, p, 3)?;
                Sample::FrequencyInput(FrequencyInput {
                    channel,
                    frequency: frequency(be_u24(&p[0..3])),
                })
            }
            c if c.is_analog() => {
                require(channel, p, 2)?;
                Sample::AnalogInput(AnalogInput {
                    channel,
                    voltage: Voltage(be_u16(&p[0..2])),
                })
            }
            _ => {
                trace!(channel = %channel, "no decode rule, passing message through");
                Sample::Raw(message)
            }
        };
        Ok(sample)
    }

    /// `[sec, min, hour, day, month, year_hi, year_lo, tz_quarter_hours]`
    ///
    /// Fields past their range carry into the next unit: month 0 is December
    /// of the year before, hour 24 is midnight of the next day. The offset is
    /// clamped to what `UtcOffset` can hold. `None` when the result falls
    /// outside the years `time` can represent.
    fn date_storage(&self, channel: Channel, p: &[u8]) -> Result<Option<DateStorage>> {
        require(channel, p, 8)?;
        let offset_seconds = (i32::from(p[7] as i8) * 15 * 60)
            .clamp(-MAX_OFFSET_SECONDS, MAX_OFFSET_SECONDS);
        let zone = self
            .zones
            .lookup(offset_seconds)
            .map_err(|err| parse_error(channel, format!("invalid UTC offset: {err}")))?;

        // high byte first, as the logger sends it
        let year = i32::from(be_u16(&p[5..7]));
        Ok(
            calendar(year, p[4], p[3], p[2], p[1], p[0]).map(|time| DateStorage {
                time: time.assume_offset(zone.offset()),
            }),
        )
    }
}

/// Wall-clock time with out-of-range fields rolled over.
fn calendar(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> Option<PrimitiveDateTime> {
    let months = year * 12 + i32::from(month) - 1;
    let month = Month::try_from(u8::try_from(months.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(months.div_euclid(12), month, 1).ok()?;
    let elapsed = Duration::days(i64::from(day) - 1)
        + Duration::hours(i64::from(hour))
        + Duration::minutes(i64::from(minute))
        + Duration::seconds(i64::from(second));
    first.midnight().checked_add(elapsed)
}

impl Default for SampleDecoder {
    fn default() -> Self {
        Self::new(Arc::new(ZoneCache::new()))
    }
}

/// Run status sub-dispatch on the first payload byte.
fn run_status(message: Message) -> Result<Sample> {
    let channel = message.channel;
    let p = message.payload.as_ref();
    require(channel, p, 1)?;
    let selector = p[0];
    let sample = match selector {
        0..=4 => Sample::StartStopInfo(start_stop_info(channel, p)?),
        5 => {
            require(channel, p, 2)?;
            Sample::TrackMarkerFailure(TrackMarkerFailure { code: p[1].into() })
        }
        6 => {
            require(channel, p, 2)?;
            Sample::Status(Status::from_bits(p[1]))
        }
        _ => {
            trace!(selector, "unrecognized run status, passing message through");
            Sample::Raw(message)
        }
    };
    Ok(sample)
}

fn start_stop_info(channel: Channel, p: &[u8]) -> Result<StartStopInfo> {
    require(channel, p, 9)?;
    let (start, stop) = match p[0] {
        0..=3 => (p[0], p[1]),
        // packed as nibbles of the second byte
        4 => (p[1] >> 4, p[1] & 0x0f),
        other => {
            return Err(parse_error(
                channel,
                format!("unknown start method encoding 0x{other:02x}"),
            ))
        }
    };
    Ok(StartStopInfo {
        start_method: start.into(),
        stop_method: stop.into(),
        pre_trigger_loop: p[2].into(),
        pre_trigger_time: TimeOffset(i64::from(p[3]) * 10),
        post_trigger_time: TimeOffset(i64::from(p[4]) * 10),
        auto_start_source: p[5].into(),
        auto_stop_source: p[6].into(),
        lowest_buffer: be_u16(&p[7..9]),
    })
}

fn lap_marker(channel: Channel, p: &[u8]) -> Result<LapMarker> {
    require(channel, p, 16)?;
    Ok(LapMarker {
        marker: p[0],
        latitude: Coordinate(geo(&p[1..5]) * COORDINATE_SCALE),
        longitude: Coordinate(geo(&p[6..10]) * COORDINATE_SCALE),
        heading: Heading(geo(&p[11..15]) * HEADING_SCALE),
    })
}

fn require(channel: Channel, p: &[u8], need: usize) -> Result<()> {
    if p.len() < need {
        return Err(DecodeError::ShortBuffer {
            channel,
            need,
            got: p.len(),
        });
    }
    Ok(())
}

fn parse_error(channel: Channel, reason: String) -> DecodeError {
    DecodeError::Parse { channel, reason }
}

fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

fn be_u24(b: &[u8]) -> u32 {
    u32::from_be_bytes([0, b[0], b[1], b[2]])
}

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Signed geo value: sign bit plus a 31-bit magnitude over four bytes,
/// offset by 2^31 when the sign is set.
pub fn geo(b: &[u8]) -> f64 {
    let magnitude = i64::from(be_u32(b) & 0x7fff_ffff);
    let value = if b[0] & 0x80 != 0 {
        magnitude - (1 << 31)
    } else {
        magnitude
    };
    value as f64
}

/// Integer part in the low 7 bits of the first byte, 1/256ths in the
/// second. A clear top bit means negative.
pub fn acceleration(b: &[u8]) -> Acceleration {
    let value = f64::from(b[0] & 0x7f) + f64::from(b[1]) / 256.0;
    if b[0] & 0x80 == 0 {
        Acceleration(-value)
    } else {
        Acceleration(value)
    }
}

/// Frequency from a pulse count of the reference clock; zero counts read as
/// 0 Hz.
pub fn frequency(count: u32) -> Frequency {
    if count == 0 {
        return Frequency(0.0);
    }
    Frequency(FREQUENCY_CLOCK_HZ / f64::from(count))
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, UtcOffset};

    use super::*;
    use crate::run_status::{AutoMethod, StartMethod, StopMethod, TrackMarkerFailureCode};

    fn decode(channel: Channel, payload: &[u8]) -> Result<Sample> {
        SampleDecoder::default().decode(Message::new(channel, payload.to_vec()))
    }

    #[test]
    fn analog_input_in_millivolts() {
        let sample = decode(Channel(20), &[0x01, 0x2c]).unwrap();
        assert_eq!(
            sample,
            Sample::AnalogInput(AnalogInput {
                channel: Channel(20),
                voltage: Voltage(300),
            })
        );

        let last = decode(Channel(51), &[0xff, 0xff]).unwrap();
        assert!(matches!(last, Sample::AnalogInput(a) if a.voltage == Voltage(65535)));
    }

    #[test]
    fn frequency_from_pulse_count() {
        // 60000 pulses at 6 MHz is a 10 ms period
        let sample = decode(Channel(14), &[0x00, 0xea, 0x60]).unwrap();
        match sample {
            Sample::FrequencyInput(input) => {
                assert_eq!(input.channel, Channel(14));
                assert!((input.frequency.0 - 100.0).abs() < 1e-9);
            }
            other => panic!("expected frequency input, got {other:?}"),
        }
    }

    #[test]
    fn zero_pulse_count_is_zero_hertz() {
        assert_eq!(frequency(0), Frequency(0.0));
        let sample = decode(Channel(18), &[0, 0, 0]).unwrap();
        assert!(matches!(sample, Sample::FrequencyInput(i) if i.frequency == Frequency(0.0)));
    }

    #[test]
    fn timestamp_centiseconds_to_millis() {
        let sample = decode(Channel::TIMESTAMP, &[0x00, 0x01, 0x00]).unwrap();
        assert_eq!(
            sample,
            Sample::Timestamp(Timestamp {
                offset: TimeOffset(2560)
            })
        );
    }

    #[test]
    fn acceleration_sign_and_fraction() {
        assert_eq!(acceleration(&[0x81, 0x80]), Acceleration(1.5));
        assert_eq!(acceleration(&[0x00, 0x40]), Acceleration(-0.25));

        let sample = decode(Channel::ACCELERATIONS, &[0x80, 0x00, 0x02, 0x00]).unwrap();
        match sample {
            Sample::Accelerations(a) => {
                assert_eq!(a.lateral.0, 0.0);
                assert_eq!(a.longitudinal, Acceleration(-2.0));
                assert_eq!(a.vector(), Acceleration(2.0));
            }
            other => panic!("expected accelerations, got {other:?}"),
        }
    }

    #[test]
    fn geo_uses_all_four_bytes() {
        assert_eq!(geo(&[0x00, 0x00, 0x00, 0x01]), 1.0);
        assert_eq!(geo(&[0x01, 0x02, 0x03, 0x04]), 16_909_060.0);
        assert_eq!(geo(&[0xff, 0xff, 0xff, 0xff]), -1.0);
        assert_eq!(geo(&[0x80, 0x00, 0x00, 0x00]), -2_147_483_648.0);
    }

    #[test]
    fn gps_position() {
        let mut payload = Vec::new();
        payload.extend(515_000_000i32.to_be_bytes());
        payload.extend((-1_250_000i32).to_be_bytes());
        payload.extend(1500u32.to_be_bytes());

        match decode(Channel::GPS_POSITION, &payload).unwrap() {
            Sample::GpsPosition(pos) => {
                assert!((pos.latitude.0 - 51.5).abs() < 1e-9);
                assert!((pos.longitude.0 + 0.125).abs() < 1e-9);
                assert_eq!(pos.accuracy, GpsAccuracy(1500));
            }
            other => panic!("expected GPS position, got {other:?}"),
        }
    }

    #[test]
    fn speed_and_altitude() {
        let mut speed = Vec::new();
        speed.extend(2550u32.to_be_bytes());
        speed.extend(40u32.to_be_bytes());
        match decode(Channel::SPEED_DATA, &speed).unwrap() {
            Sample::SpeedData(s) => {
                assert!((s.speed.0 - 25.5).abs() < 1e-9);
                assert_eq!(s.accuracy, SpeedAccuracy(40));
            }
            other => panic!("expected speed data, got {other:?}"),
        }

        let mut altitude = Vec::new();
        altitude.extend(120_000u32.to_be_bytes());
        altitude.extend(900u32.to_be_bytes());
        assert_eq!(
            decode(Channel::GPS_ALTITUDE, &altitude).unwrap(),
            Sample::GpsAltitude(GpsAltitude {
                altitude: Altitude(120_000),
                accuracy: AltitudeAccuracy(900),
            })
        );
    }

    #[test]
    fn course_data_heading() {
        let mut payload = Vec::new();
        payload.extend(9_000_000i32.to_be_bytes());
        payload.extend(50_000i32.to_be_bytes());
        match decode(Channel::COURSE_DATA, &payload).unwrap() {
            Sample::CourseData(c) => {
                assert!((c.heading.0 - 90.0).abs() < 1e-9);
                assert!((c.accuracy.0 - 0.5).abs() < 1e-9);
            }
            other => panic!("expected course data, got {other:?}"),
        }
    }

    #[test]
    fn lap_marker_skips_separator_bytes() {
        let mut payload = vec![3];
        payload.extend(100_000_000i32.to_be_bytes());
        payload.push(0xaa);
        payload.extend(200_000_000i32.to_be_bytes());
        payload.push(0xbb);
        payload.extend(18_000_000i32.to_be_bytes());
        payload.extend([0, 0, 0, 0]);
        assert_eq!(payload.len(), 19);

        match decode(Channel::LAP_MARKER, &payload).unwrap() {
            Sample::LapMarker(m) => {
                assert_eq!(m.marker, 3);
                assert!((m.latitude.0 - 10.0).abs() < 1e-9);
                assert!((m.longitude.0 - 20.0).abs() < 1e-9);
                assert!((m.heading.0 - 180.0).abs() < 1e-9);
            }
            other => panic!("expected lap marker, got {other:?}"),
        }
    }

    #[test]
    fn logger_storage_and_gps_time() {
        assert_eq!(
            decode(Channel::LOGGER_STORAGE, &[0x12, 0x34, 7, 2]).unwrap(),
            Sample::LoggerStorage(LoggerStorage {
                serial_number: 0x1234,
                software_version: 7,
                bootload_version: 2,
            })
        );
        assert_eq!(
            decode(Channel::GPS_TIME_STORAGE, &[0, 0, 0x03, 0xe8]).unwrap(),
            Sample::GpsTimeStorage(GpsTimeStorage {
                time: GpsTime(1000)
            })
        );
        assert_eq!(
            decode(Channel::BEACON_PULSE, &[0x42]).unwrap(),
            Sample::BeaconPulse(BeaconPulse { data: 0x42 })
        );
    }

    #[test]
    fn date_storage_with_offset() {
        // 2019-06-15 13:45:30, UTC+02:00 (8 quarter hours)
        let payload = [30, 45, 13, 15, 6, 0x07, 0xe3, 8];
        match decode(Channel::DATE_STORAGE, &payload).unwrap() {
            Sample::DateStorage(d) => {
                assert_eq!(d.time.year(), 2019);
                assert_eq!(d.time.month(), Month::June);
                assert_eq!(d.time.day(), 15);
                assert_eq!(d.time.hour(), 13);
                assert_eq!(d.time.second(), 30);
                assert_eq!(d.time.offset(), UtcOffset::from_hms(2, 0, 0).unwrap());
            }
            other => panic!("expected date storage, got {other:?}"),
        }
    }

    #[test]
    fn date_storage_negative_offset_uses_shared_zone() {
        let decoder = SampleDecoder::default();
        let payload = [0, 0, 0, 1, 1, 0x07, 0xe4, 0xf6];
        for _ in 0..3 {
            let sample = decoder
                .decode(Message::new(Channel::DATE_STORAGE, payload.to_vec()))
                .unwrap();
            match sample {
                Sample::DateStorage(d) => {
                    assert_eq!(d.time.offset(), UtcOffset::from_hms(-2, -30, 0).unwrap());
                }
                other => panic!("expected date storage, got {other:?}"),
            }
        }
        assert_eq!(decoder.zones().len(), 1);
    }

    fn date_of(payload: [u8; 8]) -> OffsetDateTime {
        match decode(Channel::DATE_STORAGE, &payload).unwrap() {
            Sample::DateStorage(d) => d.time,
            other => panic!("expected date storage, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_date_fields_roll_over() {
        let month_13 = date_of([0, 0, 0, 1, 13, 0x07, 0xe3, 0]);
        assert_eq!(
            (month_13.year(), month_13.month(), month_13.day()),
            (2020, Month::January, 1)
        );

        let february_30 = date_of([0, 0, 0, 30, 2, 0x07, 0xe3, 0]);
        assert_eq!((february_30.month(), february_30.day()), (Month::March, 2));

        let hour_24 = date_of([0, 0, 24, 31, 12, 0x07, 0xe3, 0]);
        assert_eq!(
            (hour_24.year(), hour_24.month(), hour_24.day(), hour_24.hour()),
            (2020, Month::January, 1, 0)
        );
    }

    #[test]
    fn zeroed_date_frame_decodes() {
        // what the logger sends before its first GPS fix
        let zeroed = date_of([0; 8]);
        assert_eq!(
            (zeroed.year(), zeroed.month(), zeroed.day()),
            (-1, Month::November, 30)
        );
        assert_eq!(zeroed.offset(), UtcOffset::UTC);
    }

    #[test]
    fn offset_beyond_utc_range_is_clamped() {
        // -128 quarter hours is -32h
        let time = date_of([0, 0, 0, 1, 1, 0x07, 0xe3, 0x80]);
        assert_eq!(time.offset(), UtcOffset::from_hms(-25, -59, -59).unwrap());

        let time = date_of([0, 0, 0, 1, 1, 0x07, 0xe3, 0x7f]);
        assert_eq!(time.offset(), UtcOffset::from_hms(25, 59, 59).unwrap());
    }

    #[test]
    fn unrepresentable_year_passes_through() {
        let sample = decode(Channel::DATE_STORAGE, &[0, 0, 0, 1, 1, 0xff, 0xff, 0]).unwrap();
        assert!(matches!(sample, Sample::Raw(m) if m.channel == Channel::DATE_STORAGE));
    }

    #[test]
    fn start_stop_info_separate_bytes() {
        let payload = [2, 1, 1, 50, 25, 15, 3, 0x01, 0x00];
        match decode(Channel::RUN_STATUS, &payload).unwrap() {
            Sample::StartStopInfo(info) => {
                assert_eq!(info.start_method, StartMethod::AutoStart);
                assert_eq!(info.stop_method, StopMethod::ButtonStop);
                assert_eq!(info.pre_trigger_time, TimeOffset(500));
                assert_eq!(info.post_trigger_time, TimeOffset(250));
                assert_eq!(info.auto_start_source, AutoMethod::LateralGForce);
                assert_eq!(info.auto_stop_source, AutoMethod::Adc3);
                assert_eq!(info.lowest_buffer, 256);
            }
            other => panic!("expected start/stop info, got {other:?}"),
        }
    }

    #[test]
    fn start_stop_info_packed_nibbles() {
        let payload = [4, 0x3b, 2, 0, 0, 0, 0, 0, 0];
        match decode(Channel::RUN_STATUS, &payload).unwrap() {
            Sample::StartStopInfo(info) => {
                assert_eq!(info.start_method, StartMethod::PreTriggerLoop);
                assert_eq!(info.stop_method, StopMethod::LoopSizeExceeded);
            }
            other => panic!("expected start/stop info, got {other:?}"),
        }
    }

    #[test]
    fn start_stop_info_rejects_unknown_encoding() {
        let payload = [9, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = start_stop_info(Channel::RUN_STATUS, &payload).unwrap_err();
        assert!(matches!(err, DecodeError::Parse { .. }));
        assert!(err.to_string().contains("0x09"));
    }

    #[test]
    fn run_status_sub_dispatch() {
        let failure = decode(Channel::RUN_STATUS, &[5, 2, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            failure,
            Sample::TrackMarkerFailure(TrackMarkerFailure {
                code: TrackMarkerFailureCode::TooManyMarkers
            })
        );

        let status = decode(Channel::RUN_STATUS, &[6, 0xc0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        match status {
            Sample::Status(s) => {
                assert!(s.gps_detected && s.imu_detected);
                assert!(!s.gps1_lock);
            }
            other => panic!("expected status, got {other:?}"),
        }

        let raw = decode(Channel::RUN_STATUS, &[7, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(matches!(raw, Sample::Raw(m) if m.channel == Channel::RUN_STATUS));
    }

    #[test]
    fn channels_without_rules_pass_through() {
        let message = Message::new(Channel::RUN_INFORMATION, vec![1, 2, 3, 4, 5, 6, 7]);
        let sample = SampleDecoder::default().decode(message.clone()).unwrap();
        assert_eq!(sample, Sample::Raw(message));
    }

    #[test]
    fn short_payload_is_reported_with_channel() {
        let err = decode(Channel::GPS_POSITION, &[0; 4]).unwrap_err();
        match err {
            DecodeError::ShortBuffer { channel, need, got } => {
                assert_eq!(channel, Channel::GPS_POSITION);
                assert_eq!(need, 12);
                assert_eq!(got, 4);
            }
            other => panic!("expected short buffer, got {other:?}"),
        }
    }
}
