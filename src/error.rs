//! Error types for signal lines
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are raised
//! synchronously at the call that breaks a precondition; construction errors
//! leave nothing behind in the scene.

use thiserror::Error;

use crate::gfx::backend::DrawableHandle;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalLineError {
    #[error("Invalid line path: {reason}")]
    InvalidPath { reason: String },

    #[error("Invalid signal speed {0}: speed must be a finite value greater than 0")]
    InvalidSpeed(f32),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Signal line used after dispose: `{0}` is not valid on a disposed line")]
    UseAfterDispose(&'static str),

    #[error("Drawable {0} is not known to the backend")]
    UnknownDrawable(DrawableHandle),
}

pub type Result<T> = std::result::Result<T, SignalLineError>;

impl SignalLineError {
    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            reason: reason.into(),
        }
    }
}
