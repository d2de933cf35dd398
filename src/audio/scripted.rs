use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::backend::{AudioFrame, CaptureBackend};
use crate::error::CaptureError;

/// Capture backend that emits a fixed frame sequence and then closes the
/// channel. Lets tests and demos drive a session without audio hardware.
pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ScriptedBackend {
    pub fn new(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::InvalidState { state: "capturing" });
        }

        let frames = std::mem::take(&mut self.frames);
        let (tx, rx) = mpsc::channel(64);
        let capturing = Arc::clone(&self.capturing);
        capturing.store(true, Ordering::SeqCst);

        let task = tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            capturing.store(false, Ordering::SeqCst);
        });
        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        // Let the script finish delivering before reporting stopped, so a
        // stop immediately after start still yields every scripted frame.
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
