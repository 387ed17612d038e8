//! Tourism Admin - desktop administration dashboard for a tourism platform.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tourism_admin as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::App;

/// Desktop administration dashboard for a tourism platform.
#[derive(Parser)]
#[command(name = "tourism-admin")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Path to a config file, overrides --dev
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging();

    tracing::info!("Tourism Admin starting...");

    // Determine config path based on mode
    let config_path = match cli.config {
        Some(path) => path,
        None if cli.dev => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        None => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, using defaults");
            AppConfig::default()
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid, using defaults: {}", e);
            AppConfig::default()
        }
    };

    run_app(config, config_path)
}

/// Log to stdout and to a daily file. File logging is skipped if the
/// log directory cannot be created.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let stdout = tracing_subscriber::fmt::layer().with_target(false);

    let log_dir = AppConfig::log_dir();
    match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, "tourism-admin.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(filter).with(stdout).init();
            tracing::warn!("File logging disabled, cannot create {:?}: {}", log_dir, e);
            None
        }
    }
}

/// Run the main application.
fn run_app(config: AppConfig, config_path: PathBuf) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Tourism Admin")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let dark_mode = config.ui.dark_mode;
    let app = App::new(config, config_path, rt).context("Failed to initialize application")?;

    eframe::run_native(
        "Tourism Admin",
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            let visuals = if dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            };
            cc.egui_ctx.set_visuals(visuals);

            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {e}"))
}
