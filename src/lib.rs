pub mod audio;
pub mod capture;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod records;
pub mod sync;
pub mod view;

pub use audio::{
    AudioClip, AudioFrame, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource,
};
pub use capture::{CaptureSession, Controls, SessionState, SlotConfig, SlotKind};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{CaptureError, SyncError};
pub use records::{Expense, Goal, SummaryStats};
pub use sync::{SyncClient, UploadAck};
pub use view::{CategoryBreakdown, CategorySlice, DashboardView, TermView};
