use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;
use voice_ledger::{Config, Dashboard, SlotKind, TermView};

#[derive(Parser)]
#[command(name = "voice-ledger")]
#[command(about = "Voice-driven expense and savings dashboard client")]
struct Args {
    /// Config file (without extension)
    #[arg(short, long, default_value = "config/voice-ledger")]
    config: String,

    /// Override the backend base URL from the config file
    #[arg(long)]
    server: Option<String>,

    /// Input device name (defaults to the system microphone)
    #[arg(long)]
    device: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_devices {
        for name in voice_ledger::audio::list_input_devices() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut cfg = Config::load(&args.config)?;
    if let Some(server) = args.server {
        cfg.server.base_url = server;
    }
    if args.device.is_some() {
        cfg.audio.input_device = args.device;
    }

    info!("{} v0.1.0", cfg.service.name);
    info!("Backend: {}", cfg.server.base_url);

    let cancel = CancellationToken::new();
    let mut dashboard = Dashboard::new(&cfg, Box::new(TermView::new()), cancel.clone())?;

    dashboard.initial_load().await;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&mut dashboard, line.trim()).await {
                    break;
                }
            }
        }
    }

    // Abort anything still in flight before exiting.
    cancel.cancel();
    info!("Bye");
    Ok(())
}

/// Execute one console command. Returns false when the user quits.
async fn run_command(dashboard: &mut Dashboard, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let (verb, slot) = (words.next(), words.next().and_then(parse_slot));

    // Failures below are already surfaced through the view.
    match (verb, slot) {
        (Some("start"), Some(slot)) => {
            let _ = dashboard.start_recording(slot).await;
        }
        (Some("stop"), Some(slot)) => {
            let _ = dashboard.stop_recording(slot).await;
        }
        (Some("send"), Some(slot)) => {
            let _ = dashboard.send_recording(slot).await;
        }
        (Some("refresh"), _) => {
            let _ = dashboard.refresh_expenses().await;
            let _ = dashboard.refresh_goals().await;
        }
        (Some("help"), _) => print_help(),
        (Some("quit") | Some("exit"), _) => return false,
        (None, _) => {}
        _ => println!("unrecognized command; try `help`"),
    }
    true
}

fn parse_slot(word: &str) -> Option<SlotKind> {
    match word {
        "expense" => Some(SlotKind::Expense),
        "goal" => Some(SlotKind::Goal),
        _ => None,
    }
}

fn print_help() {
    println!("commands:");
    println!("  start expense|goal   begin recording");
    println!("  stop expense|goal    finish recording (clip becomes sendable)");
    println!("  send expense|goal    upload the clip and refresh the list");
    println!("  refresh              re-fetch both lists");
    println!("  quit");
}
