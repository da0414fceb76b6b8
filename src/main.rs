mod app;
mod calc;
mod color;
mod config;
mod data;
mod share;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::ColiComparatorApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

/// Compare cost of living across US states and cities.
#[derive(Parser, Debug)]
#[command(name = "coli-comparator", version, about)]
struct Cli {
    /// Config file (default: <config dir>/coli-comparator/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset to load instead of the bundled one (.json or .csv)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Share link or query string to open, e.g. "?states=CA,TX&income=90000&base=TX"
    link: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let data_path = cli.data.or_else(|| config.data.path.clone());
    let dataset = match &data_path {
        Some(path) => data::loader::load_file(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => data::loader::load_bundled()?,
    };
    log::info!(
        "Dataset '{}' ({}): {} states, {} cities",
        dataset.meta.source,
        dataset.meta.last_updated,
        dataset.states.len(),
        dataset.cities.len()
    );

    let mut state = AppState::new(dataset, config);
    if let Some(link) = &cli.link {
        if let Err(e) = state.apply_share_link(link) {
            log::warn!("Ignoring share link: {e}");
            state.status_message = Some(format!("Invalid link: {e}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "US Cost of Living Comparator",
        options,
        Box::new(|_cc| Ok(Box::new(ColiComparatorApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
