// AnomalyDash - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml + CLI/env overrides)
// 3. Logging initialisation (debug mode support)
// 4. Inference client construction
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use anomalydash::app;

pub use anomalydash::core;
pub use anomalydash::platform;
pub use anomalydash::ui;
pub use anomalydash::util;

use crate::app::api::{ApiClient, ApiConfig};
use crate::app::detect::DetectionManager;
use crate::core::model::ModelId;
use crate::platform::config::{self, AppConfig, ThemePreference};
use crate::util::error::{DashboardError, Result};
use clap::Parser;
use std::path::PathBuf;

/// AnomalyDash - desktop dashboard for an anomaly-detection service.
///
/// Pick an image, choose a model, and submit it to the inference service;
/// recent verdicts are charted alongside an anomaly counter.
#[derive(Parser, Debug)]
#[command(name = "AnomalyDash", version, about)]
struct Cli {
    /// Base URL of the inference service (overrides config.toml).
    #[arg(short = 'e', long = "endpoint", env = "ANOMALYDASH_ENDPOINT")]
    endpoint: Option<String>,

    /// Initially selected model: padim, efficientad or uninet.
    #[arg(short = 'm', long = "model")]
    model: Option<ModelId>,

    /// Initial theme: dark, light or system.
    #[arg(short = 't', long = "theme")]
    theme: Option<ThemePreference>,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Fold CLI overrides into the validated config. Problems become warnings.
fn apply_cli_overrides(cli: &Cli, config: &mut AppConfig, warnings: &mut Vec<String>) {
    if let Some(ref endpoint) = cli.endpoint {
        match config::normalise_base_url(endpoint) {
            Ok(url) => config.api_base_url = url,
            Err(reason) => warnings.push(format!("--endpoint {reason}; using {}", config.api_base_url)),
        }
    }
    if let Some(model) = cli.model {
        if !config.offered_models.contains(&model) {
            config.offered_models.push(model);
        }
        config.default_model = model;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_dir);
    let (mut app_config, mut warnings) = config::load_config(&config_dir);
    apply_cli_overrides(&cli, &mut app_config, &mut warnings);

    // Logging starts after config so the config level can apply; warnings
    // gathered so far are replayed below.
    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        endpoint = %app_config.api_base_url,
        "AnomalyDash starting"
    );
    for w in &warnings {
        tracing::warn!(warning = %w, "Configuration warning");
    }

    let client = ApiClient::new(&ApiConfig::from(&app_config))?;
    let detector = DetectionManager::new(client);
    let endpoint = detector.endpoint().to_string();
    let theme = app_config.theme;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_TITLE,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            let system_dark = cc
                .egui_ctx
                .system_theme()
                .map(|t| t == egui::Theme::Dark);
            let dark_mode = theme.resolve(system_dark);
            tracing::debug!(?theme, ?system_dark, dark_mode, "Initial theme resolved");

            let mut state = app::state::AppState::new(&app_config, dark_mode, endpoint);
            state.warnings = warnings;
            Ok(Box::new(gui::DashboardApp::new(state, detector)))
        }),
    )
    .map_err(|e| DashboardError::Gui {
        message: e.to_string(),
    })
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "AnomalyDash failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
