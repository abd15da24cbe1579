// AnomalyDash - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "AnomalyDash";

/// Window and top-bar title.
pub const APP_TITLE: &str = "Anomaly Detection System";

/// Application identifier used for config directories.
pub const APP_ID: &str = "AnomalyDash";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Inference service
// =============================================================================

/// Base URL of the inference service when neither CLI nor config override it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Path of the prediction endpoint, appended to the base URL.
pub const PREDICT_PATH: &str = "/predict";

/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the model identifier.
pub const MODEL_FIELD: &str = "model";

/// Minimum user-configurable request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Maximum number of response body characters quoted in a server-error message.
pub const MAX_ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// Uploads
// =============================================================================

/// Default upper bound on the size of an image accepted for upload.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024; // 32 MiB

/// Minimum user-configurable upload limit.
pub const MIN_MAX_IMAGE_BYTES: u64 = 1024; // 1 KiB

/// Maximum user-configurable upload limit.
pub const ABSOLUTE_MAX_IMAGE_BYTES: u64 = 256 * 1024 * 1024; // 256 MiB

/// Extensions offered by the file dialog's image filter.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp", "gif",
];

// =============================================================================
// History
// =============================================================================

/// Number of detections kept for the chart and the anomaly counter.
pub const HISTORY_CAPACITY: usize = 10;

/// Format of the chart point time label (local time).
pub const CHART_TIME_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// UI
// =============================================================================

/// How often the UI re-polls the detection worker while a request is pending (ms).
pub const DETECTION_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
