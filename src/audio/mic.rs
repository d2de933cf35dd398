// Microphone capture via cpal.
//
// The cpal stream is not Send, so it lives on a dedicated worker thread for
// the duration of a take. The audio callback downmixes to mono, resamples to
// the target rate, and pushes fixed-size frames into the session's channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::CaptureError;

/// List available input device names.
pub fn list_input_devices() -> Vec<String> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    if let Ok(devices) = host.input_devices() {
        for dev in devices {
            if let Ok(name) = dev.name() {
                names.push(name);
            }
        }
    }
    names
}

/// Microphone capture backend
pub struct MicBackend {
    device_name: Option<String>,
    config: CaptureConfig,
    capturing: Arc<AtomicBool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicBackend {
    pub fn new(device_name: Option<String>, config: CaptureConfig) -> Self {
        Self {
            device_name,
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl Drop for MicBackend {
    fn drop(&mut self) {
        // Signal the worker even if the session never called stop.
        self.capturing.store(false, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::InvalidState { state: "capturing" });
        }

        let (frame_tx, frame_rx) = mpsc::channel(256);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let device_name = self.device_name.clone();
        let config = self.config.clone();
        let capturing = Arc::clone(&self.capturing);
        capturing.store(true, Ordering::SeqCst);

        let worker = std::thread::spawn(move || {
            run_capture(device_name, config, frame_tx, ready_tx, capturing);
        });
        self.worker = Some(worker);

        // Wait for the worker to report whether the stream came up.
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| CaptureError::Stream(e.to_string()))?
            .map_err(|_| CaptureError::Stream("capture worker exited before reporting".into()))?;

        match ready {
            Ok(()) => {
                info!("Microphone capture started");
                Ok(frame_rx)
            }
            Err(e) => {
                self.capturing.store(false, Ordering::SeqCst);
                if let Some(worker) = self.worker.take() {
                    let _ = worker.join();
                }
                Err(e)
            }
        }
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || worker.join())
                .await
                .map_err(|e| CaptureError::Stream(e.to_string()))?
                .map_err(|_| CaptureError::Stream("capture worker panicked".into()))?;
        }
        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Worker thread body: owns the cpal stream until the capturing flag drops.
fn run_capture(
    device_name: Option<String>,
    config: CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: std::sync::mpsc::Sender<Result<(), CaptureError>>,
    capturing: Arc<AtomicBool>,
) {
    let setup = build_stream(device_name, config, frame_tx);

    match setup {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            while capturing.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            // Dropping the stream drops the callback and with it the frame
            // sender, closing the session's channel.
            drop(stream);
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

fn build_stream(
    device_name: Option<String>,
    config: CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();

    let device = match &device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| CaptureError::Stream(e.to_string()))?
            .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
            .ok_or(CaptureError::DeviceUnavailable)?,
        None => host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)?,
    };

    let dev_name = device.name().unwrap_or_else(|_| "unknown".into());

    let default_config = device
        .default_input_config()
        .map_err(|e| classify_message(e.to_string()))?;

    let native_rate = default_config.sample_rate().0;
    let native_channels = default_config.channels();

    let stream_config = StreamConfig {
        channels: native_channels,
        sample_rate: SampleRate(native_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    info!(
        device = %dev_name,
        native_rate,
        native_channels,
        "Input device config (will resample to {}Hz mono if needed)",
        config.target_sample_rate,
    );

    let target_rate = config.target_sample_rate;
    let frame_samples =
        (config.target_sample_rate as u64 * config.buffer_duration_ms / 1000) as usize;
    let mut pending: Vec<i16> = Vec::with_capacity(frame_samples * 2);
    let mut emitted: u64 = 0;

    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                let mono = to_mono(data, native_channels);
                let resampled = resample_linear(&mono, native_rate, target_rate);

                pending.extend(
                    resampled
                        .iter()
                        .map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
                );

                while pending.len() >= frame_samples {
                    let samples: Vec<i16> = pending.drain(..frame_samples).collect();
                    let timestamp_ms = emitted * 1000 / target_rate as u64;
                    emitted += samples.len() as u64;

                    let frame = AudioFrame {
                        samples,
                        sample_rate: target_rate,
                        channels: 1,
                        timestamp_ms,
                    };

                    // The callback must not block; a full channel drops the frame
                    // and the session catches up on the next one.
                    let _ = frame_tx.try_send(frame);
                }
            },
            move |err| {
                error!("Audio input stream error: {}", err);
            },
            None,
        )
        .map_err(classify_build_error)?;

    stream
        .play()
        .map_err(|e| classify_message(e.to_string()))?;

    Ok(stream)
}

fn classify_build_error(err: cpal::BuildStreamError) -> CaptureError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
        other => classify_message(other.to_string()),
    }
}

/// Map an OS-level capture failure onto the error taxonomy. Access refusals
/// surface as backend-specific message strings, so we key off those.
fn classify_message(msg: String) -> CaptureError {
    let lower = msg.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not permitted") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::Stream(msg)
    }
}

/// Simple linear resampler from `from_rate` to `to_rate`.
/// Operates on mono f32 samples.
fn resample_linear(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return input.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((input.len() as f64) / ratio).floor() as usize;
    let mut output = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src_idx = i as f64 * ratio;
        let idx0 = src_idx.floor() as usize;
        let frac = (src_idx - idx0 as f64) as f32;
        let s0 = input.get(idx0).copied().unwrap_or(0.0);
        let s1 = input.get(idx0 + 1).copied().unwrap_or(s0);
        output.push(s0 + frac * (s1 - s0));
    }
    output
}

/// Down-mix multi-channel audio to mono by averaging channels.
fn to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let ch = channels as usize;
    samples
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}
