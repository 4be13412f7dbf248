use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use dlstream_pipeline::DEFAULT_QUEUE_CAPACITY;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod channels;
pub mod decode;
pub mod frames;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a run file into epochs.
    Decode(DecodeArgs),
    /// List the frames found in a run file.
    Frames(FramesArgs),
    /// Print the built-in channel table.
    Channels(ChannelsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Channels(args) => channels::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Run file to read, or `-` for stdin.
    pub input: PathBuf,
    /// Items each pipeline queue holds before its producer waits.
    #[arg(
        long,
        env = "DLSTREAM_QUEUE_CAPACITY",
        default_value_t = DEFAULT_QUEUE_CAPACITY as u32,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub queue_capacity: u32,
    /// Also print samples that do not feed an epoch (lap markers, beacons, raw frames).
    #[arg(long)]
    pub passthrough: bool,
    /// Stop after N epochs.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Run file to read, or `-` for stdin.
    pub input: PathBuf,
    /// Only show these channel ids (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<u8>>,
    /// Stop after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ChannelsArgs {
    /// Only list frequency and analog input channels.
    #[arg(long)]
    pub inputs: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open `path` for reading; `-` is stdin.
pub(crate) fn open_source(path: &Path) -> CliResult<Box<dyn Read + Send>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
    Ok(Box::new(file))
}

pub(crate) fn raw_unsupported(command: &str) -> CliError {
    CliError::new(
        USAGE,
        format!("--format raw is not supported by {command}; use json, table or pretty"),
    )
}
