//! TimeLab Demo Application
//!
//! Terminal host for the time lab engine:
//! - Main clock in a selectable zone
//! - World clocks
//! - Day and year progress bars
//! - Countdown to a chosen date and time

mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use timelab_core::{MemoryBoard, TimezoneSelector};
use timelab_runtime::{init_tracing, HostEvent, RuntimeConfig, TimeLabDriver};

use ui::{DemoUI, TerminalNotifier};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "JSON runtime configuration file")]
    config: Option<PathBuf>,
    #[arg(short, long, help = "Main clock zone at startup: \"local\" or an IANA zone")]
    timezone: Option<String>,
    #[arg(long, help = "Zone standing in for the host: \"system\" or an IANA zone")]
    host_zone: Option<String>,
    #[arg(long, help = "Render this many ticks, print the board and exit")]
    ticks: Option<u64>,
    #[arg(long, help = "Tracing filter directive, overrides RUST_LOG")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(zone) = args.timezone {
        config.initial_timezone = Some(TimezoneSelector::parse(&zone));
    }
    if args.host_zone.is_some() {
        config.host_zone = args.host_zone;
    }
    if args.log.is_some() {
        config.log_filter = args.log;
    }
    init_tracing(config.log_filter.as_deref(), config.json_logs)?;

    let engine = config.build_engine()?;
    let zones = engine.config().world_zones.clone();

    let mut board = MemoryBoard::standard();
    for entry in &zones {
        board.register(entry.target.as_str());
    }
    let board = Arc::new(Mutex::new(board));

    let driver = TimeLabDriver::new(engine, Arc::clone(&board)).with_notifier(TerminalNotifier);
    let mut rendered = driver.subscribe();
    let (tx, rx) = mpsc::channel(16);
    let driver_handle = tokio::spawn(driver.run(rx));

    match args.ticks {
        Some(ticks) => {
            // Headless: the driver ends early only on a render failure
            while *rendered.borrow_and_update() < ticks {
                if rendered.changed().await.is_err() {
                    break;
                }
            }
            for line in ui::panel_lines(&board.lock(), &zones) {
                println!("{}", line);
            }
            let _ = tx.send(HostEvent::Shutdown).await;
        }
        None => {
            let mut ui = DemoUI::new(board, zones, tx, rendered);
            ui.run().await?;
        }
    }

    let stats = driver_handle.await??;
    tracing::info!(ticks = stats.ticks, events = stats.events, "demo finished");
    Ok(())
}
