mod ui;
mod writer;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use egui::Vec2;
use gridgap::{
    GridgapError, SessionRequest, SessionType, TimingProvider, build_figure,
    config::AppConfig,
    pipeline::provider_from_config,
    presentation::{SvgConfig, export_svg},
};
use log::{error, info};
use ui::GapVisualizerApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Print log output, also in release builds
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cache directory for downloaded timing data, overrides the config file
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum ExportFormat {
    Svg,
    Jsonl,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the gap visualizer window
    Show {
        /// Read timing data from a directory instead of the network
        #[arg(long)]
        offline: Option<PathBuf>,
    },
    /// Classify a session and write the figure or the rows to a file
    Export {
        #[arg(short, long)]
        year: u16,

        #[arg(short, long)]
        event: String,

        /// Session code or name: R, Q, S, FP1, FP2, FP3
        #[arg(short, long, default_value = "R")]
        session: SessionType,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Svg)]
        format: ExportFormat,

        #[arg(long)]
        offline: Option<PathBuf>,
    },
    /// List the events of a season
    Events {
        #[arg(short, long)]
        year: u16,

        #[arg(long)]
        offline: Option<PathBuf>,
    },
}

fn load_config(cache_dir: Option<PathBuf>) -> AppConfig {
    let mut app_config = AppConfig::load_or_default();
    if cache_dir.is_some() {
        app_config.cache_dir = cache_dir;
    }
    app_config
}

fn show(app_config: AppConfig, provider: Box<dyn TimingProvider>) -> Result<(), GridgapError> {
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("Grid Gap")
        .with_inner_size(Vec2::new(1400., 700.));

    eframe::run_native(
        "Grid Gap",
        native_options,
        Box::new(|cc| Ok(Box::new(GapVisualizerApp::new(provider, app_config, cc)))),
    )
    .map_err(|e| GridgapError::WindowError {
        reason: e.to_string(),
    })
}

fn export(
    provider: &dyn TimingProvider,
    request: &SessionRequest,
    output: &Path,
    format: ExportFormat,
) -> Result<(), GridgapError> {
    let result = build_figure(provider, request)?;
    match format {
        ExportFormat::Svg => export_svg(&result.figure, output, &SvgConfig::default())?,
        ExportFormat::Jsonl => writer::write_classification(output, &result.rows)?,
    }
    info!("Exported {} to {:?}", result.figure.chart.title, output);
    Ok(())
}

fn events(provider: &dyn TimingProvider, year: u16) -> Result<(), GridgapError> {
    for event in provider.event_schedule(year)? {
        let sprint = if event.has_sprint { " (sprint)" } else { "" };
        println!(
            "{:>2}  {}  [{}, {}]{}",
            event.round, event.event_name, event.locality, event.country, sprint
        );
    }
    Ok(())
}

fn run(cli: Args) -> Result<(), GridgapError> {
    let app_config = load_config(cli.cache_dir);
    match cli.command {
        Commands::Show { offline } => {
            let provider = provider_from_config(&app_config, offline)?;
            show(app_config, provider)
        }
        Commands::Export {
            year,
            event,
            session,
            output,
            format,
            offline,
        } => {
            let provider = provider_from_config(&app_config, offline)?;
            let request = SessionRequest::new(year, &event, session);
            export(provider.as_ref(), &request, &output, format)
        }
        Commands::Events { year, offline } => {
            let provider = provider_from_config(&app_config, offline)?;
            events(provider.as_ref(), year)
        }
    }
}

fn main() {
    let cli = Args::parse();

    if cfg!(debug_assertions) || cli.verbose {
        colog::init();
    }

    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        if e.is_provider_error() {
            eprintln!("Timing data could not be loaded; --offline <DIR> reads it from disk instead");
        }
        std::process::exit(1);
    }
}
