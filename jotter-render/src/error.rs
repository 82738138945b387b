use thiserror::Error;

/// Errors originating from rendering, asset I/O, and job dispatch.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown colormap {0:?}")]
    UnknownColormap(String),

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("malformed .npy data: {0}")]
    Npy(String),

    #[error("render cancelled")]
    Cancelled,

    #[error("job {0} was dropped before it produced a result")]
    JobLost(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(jotter_core::CoreError),
}

impl From<jotter_core::CoreError> for RenderError {
    fn from(e: jotter_core::CoreError) -> Self {
        match e {
            jotter_core::CoreError::Cancelled => Self::Cancelled,
            other => Self::Core(other),
        }
    }
}
