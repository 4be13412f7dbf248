use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dlstream_epoch::Epoch;
use dlstream_frame::{Channel, Message};
use dlstream_sample::{format_time, Sample};
use serde::Serialize;

pub const EPOCH_SCHEMA: &str = "https://schemas.3leaps.dev/dlstream/cli/v1/epoch.schema.json";
pub const SAMPLE_SCHEMA: &str = "https://schemas.3leaps.dev/dlstream/cli/v1/sample.schema.json";
pub const FRAME_SCHEMA: &str = "https://schemas.3leaps.dev/dlstream/cli/v1/frame.schema.json";
pub const CHANNEL_SCHEMA: &str = "https://schemas.3leaps.dev/dlstream/cli/v1/channel.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One JSON line: the schema id followed by the record's own fields.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_id: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

pub fn print_json<T: Serialize>(schema_id: &str, body: &T) {
    let line = serde_json::to_string(&Envelope { schema_id, body })
        .unwrap_or_else(|_| "{}".to_string());
    println!("{line}");
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub const EPOCH_HEADER: [&str; 10] = [
    "START", "STOP", "TIME", "SPEED", "LATITUDE", "LONGITUDE", "HEADING", "ALTITUDE", "ACCEL", "INPUTS",
];

pub fn epoch_row(epoch: &Epoch) -> Vec<String> {
    vec![
        epoch.start.to_string(),
        epoch.stop.to_string(),
        epoch.time.as_ref().map(format_time).unwrap_or_default(),
        format!("{:.2}", epoch.speed),
        format!("{:.7}", epoch.latitude),
        format!("{:.7}", epoch.longitude),
        format!("{:.1}", epoch.heading),
        epoch.altitude.to_string(),
        format!("{:.3}", epoch.vector_acceleration),
        inputs(epoch),
    ]
}

pub fn epoch_line(epoch: &Epoch) -> String {
    let mut line = format!(
        "epoch {}..{} speed={:.2} pos={:.7},{:.7} heading={:.1} accel={:.3}",
        epoch.start.0,
        epoch.stop.0,
        epoch.speed,
        epoch.latitude.0,
        epoch.longitude.0,
        epoch.heading,
        epoch.vector_acceleration,
    );
    if let Some(time) = &epoch.time {
        line.push_str(&format!(" time={}", format_time(time)));
    }
    let inputs = inputs(epoch);
    if !inputs.is_empty() {
        line.push_str(&format!(" inputs=[{inputs}]"));
    }
    line
}

fn inputs(epoch: &Epoch) -> String {
    let analog = epoch
        .analog_inputs
        .iter()
        .map(|(channel, voltage)| format!("{}={voltage}", channel.name()));
    let frequency = epoch
        .frequency_inputs
        .iter()
        .map(|(channel, frequency)| format!("{}={frequency:.1}", channel.name()));
    analog.chain(frequency).collect::<Vec<_>>().join(", ")
}

pub const SAMPLE_HEADER: [&str; 2] = ["TYPE", "DETAIL"];

pub fn sample_row(sample: &Sample) -> Vec<String> {
    vec![sample.kind().to_string(), sample.to_string()]
}

pub fn sample_line(sample: &Sample) -> String {
    format!("sample {} {sample}", sample.kind())
}

#[derive(Serialize)]
pub struct FrameOutput<'a> {
    pub index: usize,
    pub channel: u8,
    pub channel_name: &'a str,
    pub length: usize,
    pub payload: String,
    pub checksum: u8,
}

impl<'a> FrameOutput<'a> {
    pub fn new(index: usize, message: &'a Message) -> Self {
        Self {
            index,
            channel: message.channel.id(),
            channel_name: message.channel.name(),
            length: message.wire_len(),
            payload: hex(&message.payload),
            checksum: message.checksum,
        }
    }
}

pub const FRAME_HEADER: [&str; 5] = ["#", "CHANNEL", "NAME", "PAYLOAD", "CHECKSUM"];

pub fn frame_row(frame: &FrameOutput<'_>) -> Vec<String> {
    vec![
        frame.index.to_string(),
        frame.channel.to_string(),
        frame.channel_name.to_string(),
        frame.payload.clone(),
        format!("0x{:02x}", frame.checksum),
    ]
}

pub fn frame_line(frame: &FrameOutput<'_>) -> String {
    format!(
        "#{} channel={} ({}) payload={} checksum=0x{:02x}",
        frame.index, frame.channel, frame.channel_name, frame.payload, frame.checksum
    )
}

/// Frame bytes exactly as they appeared on the wire.
pub fn frame_wire(message: &Message) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(message.wire_len());
    bytes.push(message.channel.id());
    bytes.extend_from_slice(&message.payload);
    bytes.push(message.checksum);
    bytes
}

#[derive(Serialize)]
pub struct ChannelOutput {
    pub channel: u8,
    pub name: &'static str,
    pub length: usize,
    pub payload_length: usize,
}

impl ChannelOutput {
    pub fn new(channel: Channel, length: usize) -> Self {
        Self {
            channel: channel.id(),
            name: channel.name(),
            length,
            payload_length: length.saturating_sub(2),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
