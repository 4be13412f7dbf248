//! Unit-tagged scalar types.
//!
//! Each quantity is a transparent newtype so it serializes as a bare number
//! and renders with its unit suffix. Formatting flags apply to the number:
//! `format!("{:.2}", Speed(12.346))` is `"12.35 m/s"`.

use std::fmt;

use serde::Serialize;

macro_rules! unit {
    ($(#[$meta:meta])* $name:ident($inner:ty) = $suffix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Unit suffix used by `Display`.
            pub const UNIT: &'static str = $suffix;

            pub fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)?;
                write!(f, " {}", $suffix)
            }
        }
    };
}

unit! {
    /// Elapsed time since the logging session started, in milliseconds.
    TimeOffset(i64) = "ms"
}

unit! {
    /// Vehicle speed in metres per second.
    Speed(f64) = "m/s"
}

unit! {
    /// Speed measurement accuracy in millimetres per second.
    SpeedAccuracy(u32) = "mm/s"
}

unit! {
    /// Latitude or longitude in degrees.
    Coordinate(f64) = "°"
}

unit! {
    /// Horizontal position accuracy in millimetres.
    GpsAccuracy(u32) = "mm"
}

unit! {
    /// Direction of travel (or of a marker) in degrees.
    Heading(f64) = "°"
}

unit! {
    HeadingAccuracy(f64) = "°"
}

unit! {
    /// Acceleration in standard gravity.
    Acceleration(f64) = "G"
}

unit! {
    /// Milliseconds since midnight between Saturday and Sunday (GPS week).
    GpsTime(u32) = "ms"
}

unit! {
    /// Analog input reading in millivolts.
    Voltage(u16) = "mV"
}

unit! {
    Frequency(f64) = "Hz"
}

unit! {
    /// Height above sea level in millimetres.
    Altitude(u32) = "mm"
}

unit! {
    AltitudeAccuracy(u32) = "mm"
}
