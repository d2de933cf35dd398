use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hound::WavReader;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::CaptureError;

/// Capture backend that replays a WAV file as if it were a live device.
///
/// Frames keep the file's own sample rate and channel count and are delivered
/// at the configured frame cadence, so a session behaves the same as with a
/// microphone. Useful for demos and batch runs on machines without audio
/// hardware.
pub struct FileBackend {
    path: PathBuf,
    config: CaptureConfig,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileBackend {
    pub fn new(path: PathBuf, config: CaptureConfig) -> Self {
        Self {
            path,
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::InvalidState { state: "capturing" });
        }

        let path = self.path.clone();
        let (samples, sample_rate, channels) = tokio::task::spawn_blocking(move || {
            let reader = WavReader::open(&path)?;
            let spec = reader.spec();
            let samples: Vec<i16> = reader.into_samples::<i16>().collect::<Result<_, _>>()?;
            Ok::<_, hound::Error>((samples, spec.sample_rate, spec.channels))
        })
        .await
        .map_err(|e| CaptureError::Stream(e.to_string()))??;

        let duration_secs =
            samples.len() as f64 / (sample_rate as f64 * channels.max(1) as f64);
        info!(
            path = %self.path.display(),
            "Replaying audio file: {:.1}s, {}Hz, {} channels",
            duration_secs,
            sample_rate,
            channels,
        );

        let frame_ms = self.config.buffer_duration_ms;
        let frame_samples = (sample_rate as u64 * frame_ms / 1000) as usize * channels as usize;

        let (tx, rx) = mpsc::channel(64);
        let capturing = Arc::clone(&self.capturing);
        capturing.store(true, Ordering::SeqCst);

        let task = tokio::spawn(async move {
            for (i, chunk) in samples.chunks(frame_samples.max(1)).enumerate() {
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms: i as u64 * frame_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(frame_ms)).await;
            }
            capturing.store(false, Ordering::SeqCst);
        });
        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
