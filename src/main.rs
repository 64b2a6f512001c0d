mod app;
mod cli;
mod color;
mod data;
mod export;
mod state;
mod ui;

use anyhow::{Result, anyhow};
use app::{APP_TITLE, LaunchDashApp};
use clap::Parser;
use cli::Cli;
use eframe::egui;
use export::ViewExport;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let loaded = data::loader::load_file(&cli.dataset);

    // Headless: compute both views once and write them out.
    if let Some(out) = &cli.export {
        let dataset = loaded?;
        let filters = cli.filter_state(&dataset)?;
        return ViewExport::compute(&dataset, &filters).write(out);
    }

    let mut state = AppState::default();
    match loaded {
        Ok(dataset) => {
            log::info!(
                "Loaded {} launches from sites {:?}",
                dataset.len(),
                dataset.sites
            );
            let filters = cli.filter_state(&dataset)?;
            state.set_dataset(dataset);
            state.set_filters(filters);
        }
        Err(e) => {
            log::warn!("Starting without data, {}: {e:#}", cli.dataset.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
