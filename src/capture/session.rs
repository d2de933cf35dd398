use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::slot::SlotConfig;
use crate::audio::{
    AudioClip, AudioFrame, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource,
};
use crate::error::CaptureError;

/// Session lifecycle: Idle → Recording → Stopped (clip ready) → Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Stopped,
}

impl SessionState {
    fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Stopped => "stopped",
        }
    }
}

/// Enablement of the three per-slot controls, derived from session state.
///
/// The invariant the dashboard relies on: send is enabled iff the session is
/// stopped with a clip whose upload has not been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub send_enabled: bool,
}

/// One recording slot's capture state machine.
///
/// Owns the backend for the duration of a take, accumulates frames in arrival
/// order, and finalizes them into an [`AudioClip`] on stop. Two sessions
/// (expense, goal) run independently; they share nothing.
pub struct CaptureSession {
    slot: SlotConfig,
    source: CaptureSource,
    capture_config: CaptureConfig,
    playback_dir: PathBuf,

    state: SessionState,
    backend: Option<Box<dyn CaptureBackend>>,
    fragments: Arc<Mutex<Vec<AudioFrame>>>,
    drain_task: Option<JoinHandle<()>>,

    clip: Option<Arc<AudioClip>>,
    playback_path: Option<PathBuf>,
    upload_dispatched: bool,
}

impl CaptureSession {
    pub fn new(
        slot: SlotConfig,
        source: CaptureSource,
        capture_config: CaptureConfig,
        playback_dir: PathBuf,
    ) -> Self {
        Self {
            slot,
            source,
            capture_config,
            playback_dir,
            state: SessionState::Idle,
            backend: None,
            fragments: Arc::new(Mutex::new(Vec::new())),
            drain_task: None,
            clip: None,
            playback_path: None,
            upload_dispatched: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn slot(&self) -> &SlotConfig {
        &self.slot
    }

    pub fn clip(&self) -> Option<&Arc<AudioClip>> {
        self.clip.as_ref()
    }

    pub fn playback_path(&self) -> Option<&Path> {
        self.playback_path.as_deref()
    }

    pub fn controls(&self) -> Controls {
        Controls {
            start_enabled: self.state != SessionState::Recording,
            stop_enabled: self.state == SessionState::Recording,
            send_enabled: self.send_enabled(),
        }
    }

    pub fn send_enabled(&self) -> bool {
        self.state == SessionState::Stopped && self.clip.is_some() && !self.upload_dispatched
    }

    /// Begin a new take.
    ///
    /// Starting from Stopped discards the previous clip's send-eligibility
    /// and removes its playback file before the new backend comes up.
    /// Starting while Recording is rejected; the stop control owns that
    /// transition.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.state == SessionState::Recording {
            return Err(CaptureError::InvalidState {
                state: self.state.label(),
            });
        }

        if self.state == SessionState::Stopped {
            self.discard_clip();
        }

        let mut backend =
            CaptureBackendFactory::create(self.source.clone(), self.capture_config.clone())?;
        let mut frame_rx = backend.start().await?;

        let fragments = Arc::clone(&self.fragments);
        fragments.lock().await.clear();

        // Drain frames as the backend delivers them; the task ends when the
        // backend closes its channel on stop.
        let drain_task = tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                fragments.lock().await.push(frame);
            }
        });

        info!(slot = %self.slot.kind, backend = backend.name(), "Recording started");

        self.backend = Some(backend);
        self.drain_task = Some(drain_task);
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Finish the current take and finalize its clip.
    ///
    /// A no-op outside Recording: repeated stops return the already-finalized
    /// clip (or None when nothing was ever recorded).
    pub async fn stop(&mut self) -> Result<Option<Arc<AudioClip>>, CaptureError> {
        if self.state != SessionState::Recording {
            return Ok(self.clip.clone());
        }

        if let Some(mut backend) = self.backend.take() {
            backend.stop().await?;
        }
        if let Some(task) = self.drain_task.take() {
            if let Err(e) = task.await {
                warn!(slot = %self.slot.kind, "Frame drain task panicked: {}", e);
            }
        }

        let frames = {
            let mut fragments = self.fragments.lock().await;
            std::mem::take(&mut *fragments)
        };

        let clip = AudioClip::from_frames(
            &frames,
            self.capture_config.target_sample_rate,
            self.capture_config.target_channels,
        )?;

        info!(
            slot = %self.slot.kind,
            clip_id = %clip.id(),
            "Recording stopped: {:.1}s, {} fragments",
            clip.duration_seconds(),
            frames.len(),
        );

        self.write_playback_file(&clip)?;

        self.clip = Some(Arc::new(clip));
        self.upload_dispatched = false;
        self.state = SessionState::Stopped;
        Ok(self.clip.clone())
    }

    /// Hand the clip to the uploader and disable further sends until the
    /// outcome is known. Fails unless the send control is enabled.
    pub fn begin_upload(&mut self) -> Result<Arc<AudioClip>, CaptureError> {
        if !self.send_enabled() {
            return Err(CaptureError::InvalidState {
                state: self.state.label(),
            });
        }
        // send_enabled() guarantees the clip is present.
        let clip = self
            .clip
            .clone()
            .ok_or(CaptureError::InvalidState { state: "stopped" })?;
        self.upload_dispatched = true;
        Ok(clip)
    }

    /// The upload succeeded: the clip is consumed. One clip, one upload.
    pub fn finish_upload(&mut self) {
        self.upload_dispatched = false;
        self.clip = None;
    }

    /// The upload failed: the clip stays send-eligible so the user can retry.
    pub fn abort_upload(&mut self) {
        self.upload_dispatched = false;
    }

    fn write_playback_file(&mut self, clip: &AudioClip) -> Result<(), CaptureError> {
        // Remove the previous take's file before writing the new one.
        self.remove_playback_file();

        std::fs::create_dir_all(&self.playback_dir)?;
        let path = self
            .playback_dir
            .join(format!("{}-{}.wav", self.slot.kind, clip.id()));
        clip.write_wav(&path)?;
        self.playback_path = Some(path);
        Ok(())
    }

    fn remove_playback_file(&mut self) {
        if let Some(path) = self.playback_path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), "Failed to remove playback file: {}", e);
                }
            }
        }
    }

    fn discard_clip(&mut self) {
        self.remove_playback_file();
        self.clip = None;
        self.upload_dispatched = false;
        self.state = SessionState::Idle;
    }
}
