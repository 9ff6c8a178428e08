use thiserror::Error;

/// Everything a resolution or transfer session can fail with. All variants are
/// terminal for the current session and are surfaced through the notification
/// slot; none are retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid video URL")]
    InvalidUrl,

    /// Metadata request failed or returned a non-2xx/unparseable response.
    #[error("{0}")]
    Resolution(String),

    /// Download request failed, returned non-2xx, or broke mid-stream.
    #[error("{0}")]
    Transfer(String),

    #[error("no downloadable format selected")]
    NoFormatSelected,

    #[error("history store error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("save failed: {0}")]
    Save(#[from] std::io::Error),
}
