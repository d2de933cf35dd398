pub mod backend;
pub mod clip;
pub mod file;
pub mod mic;
pub mod scripted;

pub use backend::{AudioFrame, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource};
pub use clip::AudioClip;
pub use file::FileBackend;
pub use mic::{list_input_devices, MicBackend};
pub use scripted::ScriptedBackend;
