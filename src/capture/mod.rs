//! Capture session state machines for the two recording slots
//!
//! Each slot (expense, goal) owns one `CaptureSession` that manages:
//! - Backend acquisition on start (microphone by default)
//! - Fragment accumulation in arrival order while recording
//! - Clip finalization and playback file on stop
//! - Send-eligibility tracking for the uploader

mod session;
mod slot;

pub use session::{CaptureSession, Controls, SessionState};
pub use slot::{SlotConfig, SlotKind};
