mod app;
mod config;
mod data;
mod error;
mod processing;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use app::StationPlotApp;
use clap::Parser;
use config::PlotConfig;
use eframe::egui;
use render::color::FillScheme;

#[derive(Debug, Parser)]
#[command(name = "stationplot", about = "Interactive scatterplot of weather-station observations")]
struct Args {
    /// Station observations file (CSV with a header row).
    #[arg(default_value = "weather.csv")]
    data: PathBuf,

    /// JSON plot configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mark fill rule, overriding the configuration file.
    #[arg(long, value_enum)]
    fill: Option<FillScheme>,
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlotConfig::load(path).unwrap_or_else(|e| {
            tracing::error!("{e}; falling back to defaults");
            PlotConfig::default()
        }),
        None => PlotConfig::default(),
    };
    if let Some(fill) = args.fill {
        config.fill = fill;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Weather Stations")
            .with_inner_size([config.width + 320.0, config.height + 120.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let data_path = Some(args.data);
    eframe::run_native(
        "stationplot",
        options,
        Box::new(move |cc| Ok(Box::new(StationPlotApp::new(cc, config, data_path)))),
    )
}
