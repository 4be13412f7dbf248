use dlstream_frame::FrameError;
use dlstream_sample::DecodeError;

/// Terminal error reported by a pipeline worker.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The byte source failed or ended inside a frame.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A worker task panicked or was cancelled.
    #[error("pipeline worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
