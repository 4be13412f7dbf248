//! Data channel ids and the channel-length table.
//!
//! A data channel is the one-byte id leading every frame; it selects both the
//! frame length and the decode rule for the payload. Frequency inputs and
//! analog inputs occupy contiguous id blocks.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{FrameError, Result};

/// Smallest total frame length: channel byte, one payload byte, checksum.
pub const MIN_FRAME_LEN: usize = 3;

/// Frequency input channels (Frequency 1-5).
pub const FREQUENCY_CHANNELS: RangeInclusive<u8> = 14..=18;

/// Analog input channels (Analog 1-32).
pub const ANALOG_CHANNELS: RangeInclusive<u8> = 20..=51;

/// Data channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Channel(pub u8);

impl Channel {
    pub const RUN_INFORMATION: Channel = Channel(1);
    pub const RUN_STATUS: Channel = Channel(2);
    pub const NEW_SECTOR_TIME: Channel = Channel(4);
    pub const LAP_MARKER: Channel = Channel(5);
    pub const LOGGER_STORAGE: Channel = Channel(6);
    pub const GPS_TIME_STORAGE: Channel = Channel(7);
    pub const ACCELERATIONS: Channel = Channel(8);
    pub const TIMESTAMP: Channel = Channel(9);
    pub const GPS_POSITION: Channel = Channel(10);
    pub const SPEED_DATA: Channel = Channel(11);
    pub const BEACON_PULSE: Channel = Channel(12);
    pub const FREQUENCY_1: Channel = Channel(*FREQUENCY_CHANNELS.start());
    pub const ANALOG_1: Channel = Channel(*ANALOG_CHANNELS.start());
    pub const DATE_STORAGE: Channel = Channel(55);
    pub const COURSE_DATA: Channel = Channel(56);
    pub const GPS_ALTITUDE: Channel = Channel(57);

    /// Raw channel byte.
    pub fn id(self) -> u8 {
        self.0
    }

    /// Human-readable channel name, or `"Unknown"` for ids the device does
    /// not define.
    pub fn name(self) -> &'static str {
        KNOWN_CHANNELS
            .iter()
            .find(|(id, _, _)| *id == self.0)
            .map(|(_, _, name)| *name)
            .unwrap_or("Unknown")
    }

    pub fn is_frequency(self) -> bool {
        FREQUENCY_CHANNELS.contains(&self.0)
    }

    pub fn is_analog(self) -> bool {
        ANALOG_CHANNELS.contains(&self.0)
    }

    /// 1-based input number within the frequency block.
    pub fn frequency_index(self) -> Option<u8> {
        self.is_frequency()
            .then(|| self.0 - FREQUENCY_CHANNELS.start() + 1)
    }

    /// 1-based input number within the analog block.
    pub fn analog_index(self) -> Option<u8> {
        self.is_analog().then(|| self.0 - ANALOG_CHANNELS.start() + 1)
    }
}

impl From<u8> for Channel {
    fn from(id: u8) -> Self {
        Channel(id)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

/// Channel id, total frame length, name.
const KNOWN_CHANNELS: &[(u8, u8, &str)] = &[
    (1, 9, "Run Information"),
    (2, 11, "Run Status"),
    (4, 7, "New Sector Time"),
    (5, 21, "Lap Marker"),
    (6, 6, "Logger Storage"),
    (7, 6, "GPS Time Storage"),
    (8, 6, "Accelerations"),
    (9, 5, "Timestamp"),
    (10, 14, "GPS Position"),
    (11, 10, "Speed Data"),
    (12, 3, "Beacon Pulse"),
    (14, 5, "Frequency 1"),
    (15, 5, "Frequency 2"),
    (16, 5, "Frequency 3"),
    (17, 5, "Frequency 4"),
    (18, 5, "Frequency 5"),
    (20, 4, "Analog 1"),
    (21, 4, "Analog 2"),
    (22, 4, "Analog 3"),
    (23, 4, "Analog 4"),
    (24, 4, "Analog 5"),
    (25, 4, "Analog 6"),
    (26, 4, "Analog 7"),
    (27, 4, "Analog 8"),
    (28, 4, "Analog 9"),
    (29, 4, "Analog 10"),
    (30, 4, "Analog 11"),
    (31, 4, "Analog 12"),
    (32, 4, "Analog 13"),
    (33, 4, "Analog 14"),
    (34, 4, "Analog 15"),
    (35, 4, "Analog 16"),
    (36, 4, "Analog 17"),
    (37, 4, "Analog 18"),
    (38, 4, "Analog 19"),
    (39, 4, "Analog 20"),
    (40, 4, "Analog 21"),
    (41, 4, "Analog 22"),
    (42, 4, "Analog 23"),
    (43, 4, "Analog 24"),
    (44, 4, "Analog 25"),
    (45, 4, "Analog 26"),
    (46, 4, "Analog 27"),
    (47, 4, "Analog 28"),
    (48, 4, "Analog 29"),
    (49, 4, "Analog 30"),
    (50, 4, "Analog 31"),
    (51, 4, "Analog 32"),
    (52, 67, "Channel Data"),
    (53, 11, "Display Data"),
    (54, 6, "Reflash"),
    (55, 10, "Date Storage"),
    (56, 10, "Course Data"),
    (57, 10, "GPS Altitude"),
    (58, 11, "Extended Frequency 1"),
    (59, 11, "Extended Frequency 2"),
    (60, 11, "Extended Frequency 3"),
    (61, 11, "Extended Frequency 4"),
    (62, 11, "Extended RPM"),
    (63, 3, "Start Run"),
    (64, 5, "Processed Speed Data"),
    (65, 30, "Gear Setup Data"),
    (66, 11, "Bargraph Setup Data"),
    (67, 4, "Dashboard Setup Data 1"),
    (68, 4, "Dashboard Setup Data 2"),
    (69, 42, "New Target Sector Time"),
    (70, 42, "New Target Marker Time"),
    (71, 3, "Auxiliary Input Module Number"),
    (72, 5, "External Temperature"),
    (73, 5, "External Frequency"),
    (74, 5, "External Percentage"),
    (75, 6, "External Time"),
    (76, 24, "New LCD Data"),
    (77, 3, "New LED Data"),
    (78, 6, "Pre-Calculated Distance Data"),
    (79, 4, "Yaw Rates"),
    (80, 4, "Calculated Yaw"),
    (81, 5, "Pitch Rate"),
    (82, 5, "Pitch Angle"),
    (83, 5, "Roll Rate"),
    (84, 5, "Roll Angle"),
    (85, 10, "Gradient"),
    (86, 5, "Pulse Count 1"),
    (87, 5, "Pulse Count 2"),
    (88, 5, "Pulse Count 3"),
    (89, 5, "Pulse Count 4"),
    (90, 6, "Baseline"),
    (91, 5, "Unit Control"),
    (92, 4, "Z Acceleration"),
    (93, 5, "External Angle"),
    (94, 6, "External Pressure"),
    (95, 5, "External Misc"),
    (101, 19, "Sector Definition"),
    (103, 18, "DVR Communications"),
    (104, 6, "Video Frame Index"),
];

/// Mapping from data channel to total frame length (channel byte and
/// checksum included).
///
/// The table is plain data: build it once, wrap it in an `Arc` and hand it
/// to every reader and writer in a pipeline.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelTable {
    lengths: [u8; 256],
}

impl ChannelTable {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self { lengths: [0; 256] }
    }

    /// The built-in table for every channel the logger defines.
    pub fn standard() -> Self {
        let mut lengths = [0u8; 256];
        for (id, length, _) in KNOWN_CHANNELS {
            lengths[usize::from(*id)] = *length;
        }
        Self { lengths }
    }

    /// Return a copy of the table with `channel` mapped to `length`.
    pub fn with_length(mut self, channel: Channel, length: usize) -> Result<Self> {
        if length < MIN_FRAME_LEN || length > usize::from(u8::MAX) {
            return Err(FrameError::InvalidLength { channel, length });
        }
        self.lengths[usize::from(channel.0)] = length as u8;
        Ok(self)
    }

    /// Total frame length for `channel`, if the channel is known.
    pub fn length_of(&self, channel: Channel) -> Option<usize> {
        match self.lengths[usize::from(channel.0)] {
            0 => None,
            length => Some(usize::from(length)),
        }
    }

    /// Payload length for `channel` (total length minus channel and checksum).
    pub fn payload_len(&self, channel: Channel) -> Option<usize> {
        self.length_of(channel).map(|length| length - 2)
    }

    /// Known entries in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, usize)> + '_ {
        self.lengths
            .iter()
            .enumerate()
            .filter(|(_, length)| **length != 0)
            .map(|(id, length)| (Channel(id as u8), usize::from(*length)))
    }

    /// Largest frame length in the table.
    pub fn max_len(&self) -> usize {
        self.lengths.iter().copied().max().map(usize::from).unwrap_or(0)
    }
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ChannelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(c, l)| (c.0, l))).finish()
    }
}
