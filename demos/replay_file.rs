// Demo: drive the full dashboard with a WAV file instead of a microphone
//
// The file source replays a recording as capture frames, so the whole
// start → stop → send → refresh flow runs end to end on machines without
// audio hardware.
//
// Usage: cargo run --example replay_file -- --file note.wav --duration 3

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use voice_ledger::{CaptureSource, Config, Dashboard, SlotKind, TermView};

#[derive(Parser)]
#[command(name = "replay_file")]
#[command(about = "Replay a WAV file through the dashboard")]
struct Args {
    /// WAV file to replay as the capture source
    #[arg(short, long)]
    file: PathBuf,

    /// Seconds of the file to record before stopping
    #[arg(short, long, default_value = "3")]
    duration: u64,

    /// Ledger backend base URL
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    let mut cfg = Config::default();
    cfg.server.base_url = args.server;

    let cancel = CancellationToken::new();
    let source = CaptureSource::File(args.file);
    let mut dashboard = Dashboard::with_sources(
        &cfg,
        source.clone(),
        source,
        Box::new(TermView::new()),
        cancel,
    )?;

    dashboard.initial_load().await;

    info!("Replaying file into the expense slot for {}s", args.duration);
    dashboard.start_recording(SlotKind::Expense).await?;
    sleep(Duration::from_secs(args.duration)).await;
    dashboard.stop_recording(SlotKind::Expense).await?;
    dashboard.send_recording(SlotKind::Expense).await?;

    Ok(())
}
