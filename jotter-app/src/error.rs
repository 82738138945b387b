use std::process::ExitCode;

use thiserror::Error;

use jotter_core::CoreError;
use jotter_render::RenderError;

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("preferences: {0}")]
    Preferences(String),
}

impl AppError {
    /// Process exit status for this error: 2 for bad user input, 1 otherwise.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Core(_) | Self::Render(RenderError::UnknownColormap(_)) => ExitCode::from(2),
            Self::Render(RenderError::Core(_)) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
