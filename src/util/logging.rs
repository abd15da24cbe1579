// AnomalyDash - util/logging.rs
//
// Structured logging scoped to the dashboard crate.
//
// Activation:
//   - Environment variable: RUST_LOG (taken verbatim)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// The chosen level applies to `anomalydash` targets only. HTTP and windowing
// dependencies (reqwest, hyper, winit, eframe) stay at warn so a debug run
// shows submissions and outcomes, not connection-pool or frame chatter.
// Image bytes and response bodies beyond a short preview are never logged.

use super::constants;
use tracing_subscriber::EnvFilter;

/// Level applied to every target other than this crate.
const DEPENDENCY_LEVEL: &str = "warn";

/// Filter directive for the dashboard at `level`, e.g. `warn,anomalydash=debug`.
///
/// Priority: CLI --debug flag > config level > default "info".
pub fn filter_directive(debug_flag: bool, config_level: Option<&str>) -> String {
    let level = if debug_flag {
        "debug"
    } else {
        config_level.unwrap_or(constants::DEFAULT_LOG_LEVEL)
    };
    format!("{DEPENDENCY_LEVEL},{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Initialise the logging subsystem. RUST_LOG, when set, overrides everything.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(filter_directive(debug_flag, config_level))
    };

    // try_init: a second call (e.g. from tests) must not panic.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .compact()
        .try_init();

    tracing::debug!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        debug = debug_flag,
        "Logging initialised"
    );
}
