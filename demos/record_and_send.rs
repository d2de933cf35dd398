// Demo: record a voice note from the microphone and send it to the backend
//
// This demonstrates the complete capture-and-sync pipeline:
// 1. Start a microphone capture session for the chosen slot
// 2. Record for a fixed number of seconds
// 3. Stop, finalizing the clip and its playback file
// 4. Upload the clip and print the backend's acknowledgement
//
// Usage: cargo run --example record_and_send -- --duration 5 --slot expense

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use voice_ledger::{CaptureConfig, CaptureSession, CaptureSource, SlotConfig, SyncClient};

#[derive(Parser)]
#[command(name = "record_and_send")]
#[command(about = "Record a voice note and upload it")]
struct Args {
    /// Seconds to record
    #[arg(short, long, default_value = "5")]
    duration: u64,

    /// Which slot to send to: expense or goal
    #[arg(short, long, default_value = "expense")]
    slot: String,

    /// Ledger backend base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Input device name (defaults to the system microphone)
    #[arg(long)]
    device: Option<String>,

    /// Playback directory
    #[arg(long, default_value = "~/.voice-ledger/playback")]
    playback_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    let slot = match args.slot.as_str() {
        "goal" => SlotConfig::goal(),
        _ => SlotConfig::expense(),
    };

    // Expand home directory
    let playback_dir = shellexpand::tilde(&args.playback_dir);
    let playback_dir = PathBuf::from(playback_dir.as_ref());

    let mut session = CaptureSession::new(
        slot.clone(),
        CaptureSource::Microphone(args.device),
        CaptureConfig::default(),
        playback_dir,
    );

    info!("Recording {} note for {} seconds...", slot.kind, args.duration);
    session.start().await?;
    sleep(Duration::from_secs(args.duration)).await;

    let Some(clip) = session.stop().await? else {
        anyhow::bail!("no clip was produced");
    };
    info!(
        "Captured {:.1}s of audio ({} bytes as WAV)",
        clip.duration_seconds(),
        clip.wav_bytes().len(),
    );
    if let Some(path) = session.playback_path() {
        info!("Playback file: {}", path.display());
    }

    let sync = SyncClient::new(
        &args.server,
        Duration::from_secs(15),
        CancellationToken::new(),
    )?;

    let ack = sync.upload_clip(&clip, &slot).await?;
    if let Some(message) = ack.message {
        info!("Backend said: {}", message);
    }
    if let Some(transcript) = ack.transcript {
        info!("Transcribed as: {}", transcript);
    }

    Ok(())
}
