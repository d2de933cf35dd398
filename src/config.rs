use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the ledger backend
    pub base_url: String,
    /// Timeout applied to every upload and fetch
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Capture frame size in milliseconds
    pub buffer_duration_ms: u64,
    /// Input device name; None uses the system default microphone
    pub input_device: Option<String>,
    /// Directory for per-slot playback files
    pub playback_dir: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "voice-ledger".to_string(),
            },
            server: ServerConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                timeout_secs: 15,
            },
            audio: AudioConfig {
                sample_rate: 16000,
                channels: 1,
                buffer_duration_ms: 100,
                input_device: None,
                playback_dir: "playback".to_string(),
            },
        }
    }
}
