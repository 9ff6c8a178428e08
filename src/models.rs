use serde::{Deserialize, Serialize};

/// Metadata for one resolved video, as returned by the remote service.
/// Replaced wholesale on every successful resolution, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub thumbnail: String,
    pub formats: Vec<RenditionDescriptor>,
}

/// One selectable quality/format variant of a resolved video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenditionDescriptor {
    pub format_id: String,
    pub quality: String,
}

impl VideoRecord {
    /// Quality label for a given format id, if that rendition exists.
    pub fn quality_of(&self, format_id: &str) -> Option<String> {
        self.formats
            .iter()
            .find(|f| f.format_id == format_id)
            .map(|f| f.quality.clone())
    }
}

/// A completed transfer as persisted in the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub thumbnail: String,
    /// RFC 3339 timestamp taken at append time.
    pub downloaded_at: String,
    /// Quality label of the downloaded rendition; unset when the selected
    /// format id no longer matched any rendition of the record.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// The single transient notification slot. A new notification replaces any
/// currently displayed one; auto-dismiss clears `visible` after a fixed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible: bool,
}
