use crate::{errors::EngineError, models::VideoRecord};
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;

/// Shown when a metadata failure carries no usable `detail` body.
pub const RESOLVE_FALLBACK: &str = "failed to fetch metadata";
/// Shown when a download failure carries no usable `detail` body.
pub const DOWNLOAD_FALLBACK: &str = "download failed";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Thin wrapper over the remote metadata/transcoding service. One method per
/// endpoint; non-2xx responses are turned into typed errors here so callers
/// only ever see `VideoRecord`s and open byte streams.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    /// One request/response exchange turning a validated URL into a record of
    /// the video and its selectable renditions.
    pub async fn video_info(&self, url: &str) -> Result<VideoRecord, EngineError> {
        let resp = self
            .client
            .post(format!("{}/video-info", self.base))
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| EngineError::Resolution(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Resolution(
                detail_or(resp, RESOLVE_FALLBACK).await,
            ));
        }

        resp.json::<VideoRecord>()
            .await
            .map_err(|e| EngineError::Resolution(e.to_string()))
    }

    /// Open the binary stream for one rendition. Non-2xx is rejected here,
    /// before any body byte is read.
    pub async fn open_stream(&self, url: &str, format_id: &str) -> Result<Response, EngineError> {
        let resp = self
            .client
            .post(format!("{}/download", self.base))
            .query(&[("format_id", format_id)])
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| EngineError::Transfer(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Transfer(
                detail_or(resp, DOWNLOAD_FALLBACK).await,
            ));
        }

        Ok(resp)
    }
}

async fn detail_or(resp: Response, fallback: &str) -> String {
    match resp.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => fallback.to_string(),
    }
}
