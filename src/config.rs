use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the remote metadata/transcoding service, including any path
    /// prefix (`{base}/video-info`, `{base}/download`).
    pub api_base: String,
    /// Sqlite file backing the download history.
    pub history_path: String,
    /// Where completed downloads are delivered.
    pub download_dir: PathBuf,
    /// How long a notification stays visible before auto-dismissal.
    pub notification_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api".to_string(),
            history_path: "vidpull-history.db".to_string(),
            download_dir: PathBuf::from("."),
            notification_ttl: Duration::from_millis(3000),
        }
    }
}
