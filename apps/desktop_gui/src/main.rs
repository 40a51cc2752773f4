use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use session_core::{SessionCommand, SessionConfig, SessionEvent};

mod controller;
mod session_bridge;
mod ui;

use ui::BloodConnectApp;

#[derive(Parser, Debug)]
struct Args {
    /// Simulated broadcast delay in milliseconds.
    #[arg(long, default_value_t = 3000)]
    broadcast_delay_ms: u64,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<SessionCommand>(256);
    let (event_tx, event_rx) = bounded::<SessionEvent>(2048);
    session_bridge::runtime::launch(
        SessionConfig {
            broadcast_delay: Duration::from_millis(args.broadcast_delay_ms),
        },
        cmd_rx,
        event_tx,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Blood Connect")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Blood Connect",
        options,
        Box::new(|_cc| Ok(Box::new(BloodConnectApp::new(cmd_tx, event_rx)))),
    )
}
