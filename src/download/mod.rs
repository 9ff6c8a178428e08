use crate::{
    api::ApiClient,
    config::AppConfig,
    errors::EngineError,
    history::HistoryStore,
    models::{HistoryEntry, NotificationKind},
    session::Session,
    validate::is_valid_source_url,
};
use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Where a finished payload is handed off to. The staged file the engine
/// passes in only lives until `deliver` returns; implementations must copy
/// out anything they want to keep.
pub trait SaveSink: Send + Sync {
    fn deliver(&self, staged: &Path, filename: &str) -> Result<(), EngineError>;
}

/// Default sink: copy the payload into a local directory.
pub struct DiskSink {
    pub dir: PathBuf,
}

impl SaveSink for DiskSink {
    fn deliver(&self, staged: &Path, filename: &str) -> Result<(), EngineError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::copy(staged, self.dir.join(filename))?;
        Ok(())
    }
}

/// The streaming-download engine: resolves metadata, pulls the rendition
/// stream chunk by chunk with live progress, delivers the payload through the
/// save sink, and appends completed transfers to the history store. One
/// resolution or transfer at a time; nothing here coordinates overlap.
pub struct Engine<K: SaveSink> {
    api: ApiClient,
    session: Session,
    history: Arc<HistoryStore>,
    sink: K,
}

impl<K: SaveSink> Engine<K> {
    pub fn new(config: &AppConfig, history: Arc<HistoryStore>, sink: K) -> Self {
        Self {
            api: ApiClient::new(config.api_base.clone()),
            session: Session::new(config.notification_ttl),
            history,
            sink,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Metadata phase: validate the URL, fetch its record, and install it with
    /// the first rendition selected. A failed resolution surfaces the error
    /// and leaves any previously resolved record untouched.
    pub async fn resolve(&self, url: &str) -> Result<(), EngineError> {
        if !is_valid_source_url(url) {
            let err = EngineError::InvalidUrl;
            self.session.fail(err.to_string());
            return Err(err);
        }

        tracing::info!(url, "resolving video metadata");
        self.session.update(|s| s.loading = true);

        match self.api.video_info(url).await {
            Ok(record) => {
                self.session.update(|s| {
                    s.selected_format = record.formats.first().map(|f| f.format_id.clone());
                    s.video = Some(record);
                    s.loading = false;
                });
                self.session
                    .notify(NotificationKind::Success, "video info loaded");
                Ok(())
            }
            Err(err) => {
                self.session.update(|s| s.loading = false);
                self.session.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Pick a rendition of the currently resolved record for the next
    /// transfer. Ids not present in the record are rejected.
    pub fn select_format(&self, format_id: &str) -> Result<(), EngineError> {
        let known = self.session.update(|s| {
            let known = s
                .video
                .as_ref()
                .is_some_and(|v| v.formats.iter().any(|f| f.format_id == format_id));
            if known {
                s.selected_format = Some(format_id.to_string());
            }
            known
        });

        if known {
            Ok(())
        } else {
            Err(EngineError::NoFormatSelected)
        }
    }

    /// Transfer phase: stream the selected rendition, save it as
    /// `<title>.mp4`, and append a history entry. Success and failure clean up
    /// identically: downloading flag cleared, progress back to 0.
    pub async fn download(&self, url: &str) -> Result<(), EngineError> {
        let result = self.run_transfer(url).await;

        self.session.update(|s| {
            s.is_downloading = false;
            s.progress_percent = 0.0;
        });

        match result {
            Ok(filename) => {
                self.session
                    .notify(NotificationKind::Success, format!("saved {filename}"));
                Ok(())
            }
            Err(err) => {
                self.session.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn run_transfer(&self, url: &str) -> Result<String, EngineError> {
        let Some(format_id) = self.session.snapshot().selected_format else {
            return Err(EngineError::NoFormatSelected);
        };

        self.session.update(|s| {
            s.is_downloading = true;
            s.progress_percent = 0.0;
        });

        let resp = self.api.open_stream(url, &format_id).await?;
        let declared_len = resp.content_length();
        let payload = accumulate(resp.bytes_stream(), declared_len, &self.session).await?;
        tracing::info!(bytes = payload.len(), format_id, "transfer complete");

        // Filename and history fields come from whatever record is resolved
        // right now, not a snapshot taken when the transfer began. A caller
        // that swaps the record mid-transfer gets the newer title.
        let record = self
            .session
            .snapshot()
            .video
            .ok_or(EngineError::NoFormatSelected)?;
        let filename = format!("{}.mp4", sanitize_title(&record.title));

        let staged = stage_payload(&payload)?;
        let delivered = self.sink.deliver(staged.path(), &filename);
        // Staged payload is released whether or not delivery worked.
        drop(staged);
        delivered?;

        self.history.append(&HistoryEntry {
            title: record.title.clone(),
            thumbnail: record.thumbnail.clone(),
            downloaded_at: Utc::now().to_rfc3339(),
            format: record.quality_of(&format_id),
        })?;

        Ok(filename)
    }
}

/// Sequential pull over the response body: the single suspension point of a
/// transfer. Chunks arrive in order and are appended as-is. When the
/// transport declared a total length, percent-complete is published after
/// every chunk; otherwise progress is left where it was, never fabricated.
pub async fn accumulate<S, E>(
    mut stream: S,
    declared_len: Option<u64>,
    session: &Session,
) -> Result<Vec<u8>, EngineError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut payload: Vec<u8> = Vec::new();
    let mut received: u64 = 0;

    while let Some(next) = stream.next().await {
        let chunk = next.map_err(|e| EngineError::Transfer(e.to_string()))?;
        received += chunk.len() as u64;
        payload.extend_from_slice(&chunk);

        if let Some(total) = declared_len.filter(|t| *t > 0) {
            session.set_progress(100.0 * received as f64 / total as f64);
        }
    }

    Ok(payload)
}

fn stage_payload(payload: &[u8]) -> Result<NamedTempFile, EngineError> {
    let mut staged = NamedTempFile::new()?;
    staged.write_all(payload)?;
    staged.flush()?;
    Ok(staged)
}

fn sanitize_title(title: &str) -> String {
    let cleaned = title.replace(['/', '\\'], "_");
    if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}
