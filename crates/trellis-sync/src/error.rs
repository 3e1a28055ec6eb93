//! Flush errors

use trellis_ui::UiError;

pub type SyncResult<T> = Result<T, SyncError>;

/// Flush error
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sink rejected the flush: {0}")]
    Sink(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Ui(#[from] UiError),
}
