//! Error types surfaced to the user.
//!
//! Every variant is non-fatal: callers log it, show it in the status line
//! and keep the previous image or canvas untouched.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The requested reference or background image does not exist.
    #[error("image file not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// The file exists but could not be decoded as an image.
    #[error("failed to load image {}: {source}", path.display())]
    ResourceUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Compositing or writing the exported image failed.
    #[error("cannot export image to {}: {reason}", path.display())]
    ExportFailure { path: PathBuf, reason: String },

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;

impl EditorError {
    pub fn export(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        Self::ExportFailure {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
