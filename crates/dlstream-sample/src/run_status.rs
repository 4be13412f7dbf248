//! Run status payloads (channel 2): session start/stop descriptors, track
//! marker failures and receiver status flags.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::units::TimeOffset;

/// Defines a device code enum that is total over `u8`.
///
/// Codes the device does not document land in `Unknown`. The enum
/// serializes as its display label.
macro_rules! device_code {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $code:literal => $label:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Unknown(u8),
        }

        impl $name {
            /// Raw code byte.
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unknown(code) => code,
                }
            }
        }

        impl From<u8> for $name {
            fn from(code: u8) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => f.write_str($label),)+
                    $name::Unknown(code) => write!(f, "{}({code})", stringify!($name)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

device_code! {
    /// How a logging session was started.
    StartMethod {
        ButtonStart = 1 => "Button Start",
        AutoStart = 2 => "Auto Start",
        PreTriggerLoop = 3 => "Pre-Trigger Loop",
    }
}

device_code! {
    /// Why a logging session stopped.
    StopMethod {
        Running = 0 => "Running",
        ButtonStop = 1 => "Button Stop",
        AutoStop = 2 => "Auto Stop",
        PostTriggerExpired = 3 => "Post-Trigger Expired",
        LowBatteryVoltage = 4 => "Low Battery Voltage",
        LowBufferSpace = 5 => "Low Buffer Space",
        GsmCommand = 6 => "GSM Command",
        DiskFull = 7 => "Disk Full",
        DvrSerialCommand = 8 => "DVR Serial Command",
        RemoteRtSerialCommand = 9 => "Remote RT Serial Command",
        FileLimitExceeded = 10 => "File Limit Exceeded",
        LoopSizeExceeded = 11 => "Loop Size Exceeded",
        CamDisconnect = 12 => "CAM Disconnect",
    }
}

device_code! {
    PreTriggerLoopMethod {
        ButtonPress = 1 => "Button Press",
        Autostart = 2 => "Autostart",
    }
}

device_code! {
    /// Signal source for automatic start and stop.
    AutoMethod {
        Adc1 = 1 => "ADC 1",
        Adc2 = 2 => "ADC 2",
        Adc3 = 3 => "ADC 3",
        Adc4 = 4 => "ADC 4",
        Adc5 = 5 => "ADC 5",
        Adc6 = 6 => "ADC 6",
        Adc7 = 7 => "ADC 7",
        Adc8 = 8 => "ADC 8",
        LateralGForce = 15 => "Lateral G-Force",
        LongitudinalGForce = 16 => "Longitudinal G-Force",
    }
}

device_code! {
    /// Reason the logger refused to store a track marker.
    TrackMarkerFailureCode {
        MarkerAlreadyExists = 1 => "Marker Already Exists",
        TooManyMarkers = 2 => "Too Many Markers",
        NotLoggingData = 3 => "Not Logging Data",
        NoCard = 4 => "No Card",
        GpsInaccurate = 5 => "GPS Inaccurate",
        CorrectGpsNotAvailable = 6 => "Correct GPS Not Available",
    }
}

/// How the current logging session started and stopped, plus trigger setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StartStopInfo {
    pub start_method: StartMethod,
    pub stop_method: StopMethod,
    pub pre_trigger_loop: PreTriggerLoopMethod,
    pub pre_trigger_time: TimeOffset,
    pub post_trigger_time: TimeOffset,
    pub auto_start_source: AutoMethod,
    pub auto_stop_source: AutoMethod,
    /// Lowest free buffer level seen during the session.
    pub lowest_buffer: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackMarkerFailure {
    pub code: TrackMarkerFailureCode,
}

/// Receiver and inertial unit status flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub gps_detected: bool,
    pub imu_detected: bool,
    pub gps1_lock: bool,
    pub gps2_lock: bool,
    pub carrier_lock: bool,
    pub rtk_lock: bool,
    pub ins_initialized: bool,
    pub ins_converged: bool,
}

impl Status {
    /// Unpack the flag byte, most significant bit first.
    pub fn from_bits(bits: u8) -> Self {
        let flag = |mask: u8| bits & mask == mask;
        Self {
            gps_detected: flag(0x80),
            imu_detected: flag(0x40),
            gps1_lock: flag(0x20),
            gps2_lock: flag(0x10),
            carrier_lock: flag(0x08),
            rtk_lock: flag(0x04),
            ins_initialized: flag(0x02),
            ins_converged: flag(0x01),
        }
    }
}
