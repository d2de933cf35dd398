use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::backend::AudioFrame;
use crate::error::CaptureError;

/// A finalized recording: the immutable result of one capture take.
///
/// Holds the concatenated PCM samples in frame arrival order plus the WAV
/// encoding produced once at finalization. The clip is shared (not copied)
/// with the uploader via `Arc`.
#[derive(Debug, Clone)]
pub struct AudioClip {
    id: Uuid,
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    wav: Vec<u8>,
    captured_at: DateTime<Utc>,
}

impl AudioClip {
    /// Build a clip from the frames delivered between start and stop.
    ///
    /// Sample rate and channel count come from the first frame; the fallbacks
    /// only apply to an empty take, which still yields a valid (silent) clip.
    pub fn from_frames(
        frames: &[AudioFrame],
        fallback_rate: u32,
        fallback_channels: u16,
    ) -> Result<Self, CaptureError> {
        let (sample_rate, channels) = frames
            .first()
            .map(|f| (f.sample_rate, f.channels))
            .unwrap_or((fallback_rate, fallback_channels));

        let samples: Vec<i16> = frames.iter().flat_map(|f| f.samples.iter().copied()).collect();
        let wav = encode_wav(&samples, sample_rate, channels)?;

        Ok(Self {
            id: Uuid::new_v4(),
            samples,
            sample_rate,
            channels,
            wav,
            captured_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// PCM samples in arrival order
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels.max(1) as f64)
    }

    /// The fixed MIME type the upload form tags the clip with
    pub fn mime_type(&self) -> &'static str {
        "audio/wav"
    }

    /// The encoded upload body
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    /// Write the clip to disk for local playback
    pub fn write_wav(&self, path: &Path) -> Result<(), CaptureError> {
        std::fs::write(path, &self.wav)?;
        Ok(())
    }
}

fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>, CaptureError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
