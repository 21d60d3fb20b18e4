use std::sync::PoisonError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("{0}")]
    Error(String),

    #[error("StdSyncPoisonError {0}")]
    StdSyncPoisonError(String),

    #[error("Unsupported")]
    Unsupported,

    #[error("No display available")]
    NoDisplay,

    #[error("Platform error: {0}")]
    Platform(String),

    /// The icon loader could not produce a decodable bitmap for the application.
    #[error("No bitmap available for {app_id}: {reason}")]
    NoBitmap { app_id: String, reason: String },

    /// Every pixel carried zero weight, so no average color exists.
    #[error("Degenerate pixel buffer")]
    DegenerateBuffer,

    #[error("Invalid pixel buffer: {0}")]
    InvalidPixelBuffer(String),

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl IndicatorError {
    pub fn new<S: ToString>(err: S) -> Self {
        IndicatorError::Error(err.to_string())
    }

    pub(crate) fn no_bitmap<A: Into<String>, R: ToString>(app_id: A, reason: R) -> Self {
        IndicatorError::NoBitmap {
            app_id: app_id.into(),
            reason: reason.to_string(),
        }
    }
}

pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl<T> From<PoisonError<T>> for IndicatorError {
    fn from(value: PoisonError<T>) -> Self {
        IndicatorError::StdSyncPoisonError(value.to_string())
    }
}
