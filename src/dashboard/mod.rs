//! Dashboard controller
//!
//! Wires the two capture slots, the sync client, and the view together:
//! control actions drive session transitions, a successful upload triggers
//! exactly one refresh of the matching list, and every transition pushes the
//! affected slot's control state to the view.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::audio::{CaptureConfig, CaptureSource};
use crate::capture::{CaptureSession, Controls, SlotConfig, SlotKind};
use crate::config::Config;
use crate::error::SyncError;
use crate::records::{Expense, Goal};
use crate::sync::SyncClient;
use crate::view::{CategoryBreakdown, DashboardView};

pub struct Dashboard {
    expense: CaptureSession,
    goal: CaptureSession,
    sync: SyncClient,
    view: Box<dyn DashboardView>,
}

impl Dashboard {
    /// Build a dashboard capturing from the configured microphone.
    pub fn new(
        config: &Config,
        view: Box<dyn DashboardView>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let source = CaptureSource::Microphone(config.audio.input_device.clone());
        Self::with_sources(config, source.clone(), source, view, cancel)
    }

    /// Build a dashboard with explicit capture sources per slot.
    ///
    /// Lets demos replay files and tests script frames while keeping the
    /// rest of the wiring identical to production.
    pub fn with_sources(
        config: &Config,
        expense_source: CaptureSource,
        goal_source: CaptureSource,
        view: Box<dyn DashboardView>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let sync = SyncClient::new(
            &config.server.base_url,
            Duration::from_secs(config.server.timeout_secs),
            cancel,
        )
        .context("Failed to build sync client")?;

        let capture_config = CaptureConfig {
            target_sample_rate: config.audio.sample_rate,
            target_channels: config.audio.channels,
            buffer_duration_ms: config.audio.buffer_duration_ms,
        };
        let playback_dir = PathBuf::from(&config.audio.playback_dir);

        let expense = CaptureSession::new(
            SlotConfig::expense(),
            expense_source,
            capture_config.clone(),
            playback_dir.clone(),
        );
        let goal = CaptureSession::new(
            SlotConfig::goal(),
            goal_source,
            capture_config,
            playback_dir,
        );

        Ok(Self {
            expense,
            goal,
            sync,
            view,
        })
    }

    pub fn controls(&self, slot: SlotKind) -> Controls {
        self.session(slot).controls()
    }

    fn session(&self, slot: SlotKind) -> &CaptureSession {
        match slot {
            SlotKind::Expense => &self.expense,
            SlotKind::Goal => &self.goal,
        }
    }

    fn session_mut(&mut self, slot: SlotKind) -> &mut CaptureSession {
        match slot {
            SlotKind::Expense => &mut self.expense,
            SlotKind::Goal => &mut self.goal,
        }
    }

    fn push_controls(&mut self, slot: SlotKind) {
        let controls = self.session(slot).controls();
        self.view.update_controls(slot, controls);
    }

    /// Start recording on a slot. Failures (permission, device, bad state)
    /// are surfaced and leave the controls as they were.
    pub async fn start_recording(&mut self, slot: SlotKind) -> Result<()> {
        let res = self.session_mut(slot).start().await;
        if let Err(e) = &res {
            error!(%slot, "Failed to start recording: {}", e);
            self.view
                .show_error(&format!("could not start {} recording: {}", slot, e));
        }
        self.push_controls(slot);
        res.map_err(Into::into)
    }

    /// Stop recording on a slot and finalize its clip. A no-op when the slot
    /// is not recording.
    pub async fn stop_recording(&mut self, slot: SlotKind) -> Result<()> {
        let res = self.session_mut(slot).stop().await;
        match &res {
            Ok(_) => {
                if let Some(path) = self.session(slot).playback_path().map(PathBuf::from) {
                    self.view.playback_ready(slot, &path);
                }
            }
            Err(e) => {
                error!(%slot, "Failed to stop recording: {}", e);
                self.view
                    .show_error(&format!("could not stop {} recording: {}", slot, e));
            }
        }
        self.push_controls(slot);
        res.map(|_| ()).map_err(Into::into)
    }

    /// Send a slot's clip to the backend.
    ///
    /// One POST per call. On success the clip is consumed and the matching
    /// list refreshes once; on failure the clip stays send-eligible and the
    /// send control comes back.
    pub async fn send_recording(&mut self, slot: SlotKind) -> Result<()> {
        let clip = match self.session_mut(slot).begin_upload() {
            Ok(clip) => clip,
            Err(e) => {
                self.view
                    .show_error(&format!("nothing to send for {}: {}", slot, e));
                self.push_controls(slot);
                return Err(e.into());
            }
        };
        // The send control is disabled for the duration of the upload.
        self.push_controls(slot);

        let slot_config = self.session(slot).slot().clone();
        match self.sync.upload_clip(&clip, &slot_config).await {
            Ok(ack) => {
                self.session_mut(slot).finish_upload();
                self.push_controls(slot);

                if let Some(transcript) = &ack.transcript {
                    self.view.show_notice(&format!("heard: \"{}\"", transcript));
                }
                if ack.goal_completed.unwrap_or(false) {
                    let over = ack.over_by.unwrap_or(0.0);
                    let notice = if ack.exceeded.unwrap_or(false) && over > 0.0 {
                        format!("goal reached, ₹{:.2} over target", over)
                    } else {
                        "goal reached".to_string()
                    };
                    self.view.show_notice(&notice);
                }

                // Refresh failures are surfaced by the refresh itself and do
                // not undo a completed upload.
                let refresh = match slot {
                    SlotKind::Expense => self.refresh_expenses().await,
                    SlotKind::Goal => self.refresh_goals().await,
                };
                if let Err(e) = refresh {
                    warn!(%slot, "Post-upload refresh failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                error!(%slot, "Upload failed: {}", e);
                self.session_mut(slot).abort_upload();
                self.view
                    .show_error(&format!("{} upload failed: {} (send again to retry)", slot, e));
                self.push_controls(slot);
                Err(e.into())
            }
        }
    }

    /// Fetch both collections concurrently and render whatever arrived.
    /// Called once at startup; per-list failures are already surfaced.
    pub async fn initial_load(&mut self) {
        info!("Loading initial view");
        let (expenses, goals) =
            futures::future::join(self.sync.fetch_expenses(), self.sync.fetch_goals()).await;
        let _ = self.apply_expenses(expenses);
        let _ = self.apply_goals(goals);
        self.load_summary().await;
        self.push_controls(SlotKind::Expense);
        self.push_controls(SlotKind::Goal);
    }

    /// Re-fetch and re-render the expense list and its chart.
    pub async fn refresh_expenses(&mut self) -> Result<(), SyncError> {
        let res = self.sync.fetch_expenses().await;
        let applied = self.apply_expenses(res);
        self.load_summary().await;
        applied
    }

    /// Re-fetch and re-render the goal list.
    pub async fn refresh_goals(&mut self) -> Result<(), SyncError> {
        let res = self.sync.fetch_goals().await;
        self.apply_goals(res)
    }

    fn apply_expenses(&mut self, res: Result<Vec<Expense>, SyncError>) -> Result<(), SyncError> {
        match res {
            Ok(expenses) => {
                self.view.show_expenses(&expenses);
                self.view
                    .show_chart(&CategoryBreakdown::from_expenses(&expenses));
                Ok(())
            }
            Err(e) => {
                // The view keeps whatever it already shows.
                error!("Expense fetch failed: {}", e);
                self.view
                    .show_error(&format!("could not refresh expenses: {}", e));
                Err(e)
            }
        }
    }

    fn apply_goals(&mut self, res: Result<Vec<Goal>, SyncError>) -> Result<(), SyncError> {
        match res {
            Ok(goals) => {
                self.view.show_goals(&goals);
                Ok(())
            }
            Err(e) => {
                error!("Goal fetch failed: {}", e);
                self.view
                    .show_error(&format!("could not refresh goals: {}", e));
                Err(e)
            }
        }
    }

    async fn load_summary(&mut self) {
        // The summary endpoint is optional; older backends don't have it.
        match self.sync.fetch_summary().await {
            Ok(summary) => self.view.show_summary(&summary),
            Err(e) => debug!("Summary unavailable: {}", e),
        }
    }
}
