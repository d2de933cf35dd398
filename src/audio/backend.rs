use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::error::CaptureError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (will resample if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Frame size in milliseconds (affects delivery cadence)
    pub buffer_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz, what the transcription side expects
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms frames
        }
    }
}

/// Capture backend trait
///
/// Implementations:
/// - Microphone: cpal input device (all platforms)
/// - File: replay a WAV file as capture frames (batch/demo)
/// - Scripted: pre-baked frames (tests)
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames at the
    /// backend's own cadence until `stop` is called or the source runs dry.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Where a capture session sources its audio
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Microphone input; `None` uses the system default device
    Microphone(Option<String>),
    /// WAV file replayed in real time (demos, batch processing)
    File(PathBuf),
    /// Fixed frame sequence (tests, hardware-free demos)
    Scripted(Vec<AudioFrame>),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create a capture backend for the given source
    pub fn create(
        source: CaptureSource,
        config: CaptureConfig,
    ) -> Result<Box<dyn CaptureBackend>, CaptureError> {
        match source {
            CaptureSource::Microphone(device) => {
                let backend = super::mic::MicBackend::new(device, config);
                Ok(Box::new(backend))
            }
            CaptureSource::File(path) => {
                let backend = super::file::FileBackend::new(path, config);
                Ok(Box::new(backend))
            }
            CaptureSource::Scripted(frames) => {
                let backend = super::scripted::ScriptedBackend::new(frames);
                Ok(Box::new(backend))
            }
        }
    }
}
