//! # FlexVolt Viewer
//!
//! Desktop viewer for EMG recordings saved by the FlexVolt recording plugin.
//!
//! ```bash
//! flexvolt-viewer flexvolt-recorded-data--2019-02-12--14-16-26.txt
//! flexvolt-viewer -vv            # open a file from the File menu, debug logging
//! ```

mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use app::FlexVoltApp;
use clap::Parser;
use eframe::egui;
use log::LevelFilter;

/// FlexVolt Viewer - plot processed and raw EMG channels against time
#[derive(Parser, Debug)]
#[command(name = "flexvolt-viewer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Recording to open on start-up
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the -v level.
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let app = FlexVoltApp::new(cli.path.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FlexVolt Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("viewer exited with an error: {e}"))
}
