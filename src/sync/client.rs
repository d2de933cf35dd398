use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::audio::AudioClip;
use crate::capture::SlotConfig;
use crate::error::SyncError;
use crate::records::{Expense, Goal, SummaryStats};

/// What the backend said about an uploaded clip.
///
/// The body is primarily logged; every field is optional and absent fields
/// simply mean the backend had nothing extra to say.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadAck {
    pub message: Option<String>,
    pub transcript: Option<String>,
    pub goal_completed: Option<bool>,
    pub exceeded: Option<bool>,
    pub over_by: Option<f64>,
}

/// HTTP client for the ledger backend.
///
/// One instance serves both slots and the list endpoints. Every call carries
/// the configured timeout and aborts when the shutdown token fires, so a
/// stalled backend can never wedge a control permanently.
pub struct SyncClient {
    http: reqwest::Client,
    base_url: String,
    cancel: CancellationToken,
}

impl SyncClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            cancel,
        })
    }

    /// Upload one clip as a single-field multipart form.
    ///
    /// Exactly one POST per call; retry policy belongs to the caller (the
    /// session keeps the clip send-eligible on failure).
    pub async fn upload_clip(
        &self,
        clip: &AudioClip,
        slot: &SlotConfig,
    ) -> Result<UploadAck, SyncError> {
        let url = format!("{}{}", self.base_url, slot.upload_path);

        let part = multipart::Part::bytes(clip.wav_bytes().to_vec())
            .file_name(slot.upload_filename.clone())
            .mime_str(clip.mime_type())?;
        let form = multipart::Form::new().part(slot.field_name.clone(), part);

        debug!(
            url = %url,
            bytes = clip.wav_bytes().len(),
            "Uploading clip {}",
            clip.id(),
        );

        let send = self.http.post(&url).multipart(form).send();
        let resp = tokio::select! {
            _ = self.cancel.cancelled() => return Err(SyncError::Cancelled),
            resp = send => resp?,
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::UploadFailed(status));
        }

        let body: serde_json::Value = resp.json().await?;
        info!(slot = %slot.kind, body = %body, "Upload acknowledged");

        // Known fields are surfaced when present; anything else stays logged.
        let ack: UploadAck = serde_json::from_value(body).unwrap_or_default();
        Ok(ack)
    }

    /// GET the full expense collection
    pub async fn fetch_expenses(&self) -> Result<Vec<Expense>, SyncError> {
        self.get_json("/api/expenses").await
    }

    /// GET the full goal collection
    pub async fn fetch_goals(&self) -> Result<Vec<Goal>, SyncError> {
        self.get_json("/api/goals").await
    }

    /// GET the thirty-day spending summary
    pub async fn fetch_summary(&self) -> Result<SummaryStats, SyncError> {
        self.get_json("/api/analytics/summary").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SyncError> {
        let url = format!("{}{}", self.base_url, path);

        let send = self.http.get(&url).send();
        let resp = tokio::select! {
            _ = self.cancel.cancelled() => return Err(SyncError::Cancelled),
            resp = send => resp?,
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::FetchFailed(status));
        }

        Ok(resp.json().await?)
    }
}
