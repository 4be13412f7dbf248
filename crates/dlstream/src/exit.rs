use std::fmt;
use std::io;

use dlstream_frame::FrameError;
use dlstream_pipeline::PipelineError;
use dlstream_sample::DecodeError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::UnexpectedEof => FAILURE,
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidLength { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn decode_error(context: &str, err: DecodeError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn pipeline_error(context: &str, err: PipelineError) -> CliError {
    match err {
        PipelineError::Frame(err) => frame_error(context, err),
        PipelineError::Decode(err) => decode_error(context, err),
        PipelineError::Worker(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use dlstream_frame::Channel;

    use super::*;

    #[test]
    fn truncated_stream_is_data_invalid() {
        let err = pipeline_error(
            "decode failed",
            PipelineError::Frame(FrameError::ShortBuffer { need: 5, got: 2 }),
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: "));
    }

    #[test]
    fn io_errors_map_by_kind() {
        let denied = frame_error(
            "read failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(denied.code, PERMISSION_DENIED);

        let missing = io_error("open failed", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, FAILURE);
    }

    #[test]
    fn worker_failure_is_internal() {
        let err = pipeline_error("decode failed", PipelineError::Worker("demux: panicked".into()));
        assert_eq!(err.code, INTERNAL);

        let err = pipeline_error(
            "decode failed",
            PipelineError::Decode(DecodeError::Parse {
                channel: Channel::DATE_STORAGE,
                reason: "invalid UTC offset".into(),
            }),
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
