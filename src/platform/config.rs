// AnomalyDash - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ModelId;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Resolved platform paths for AnomalyDash configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/anomalydash/ or %APPDATA%\AnomalyDash\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// Theme preference
// =============================================================================

/// Initial palette choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
    /// Follow the OS preference when the windowing backend reports one.
    System,
}

impl ThemePreference {
    /// Resolve to a dark-mode flag given the OS preference, if known.
    /// `System` without a reported preference falls back to dark.
    pub fn resolve(self, system_prefers_dark: Option<bool>) -> bool {
        match self {
            Self::Dark => true,
            Self::Light => false,
            Self::System => system_prefers_dark.unwrap_or(true),
        }
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "system" => Ok(Self::System),
            other => Err(format!(
                "theme \"{other}\" is not recognised. Expected \"dark\", \"light\" or \"system\""
            )),
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub api: ApiSection,
    pub ui: UiSection,
    pub models: ModelsSection,
    pub upload: UploadSection,
    pub logging: LoggingSection,
}

/// `[api]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the inference service.
    pub base_url: Option<String>,
    /// Request timeout in seconds (absent = transport default).
    pub timeout_secs: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark", "light" or "system".
    pub theme: Option<String>,
}

/// `[models]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ModelsSection {
    /// Model identifiers offered in the selector, in display order.
    pub offered: Option<Vec<String>>,
    /// Model selected at startup.
    pub default: Option<String>,
}

/// `[upload]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UploadSection {
    /// Largest image accepted for upload, in bytes.
    pub max_image_bytes: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- API --
    /// Base URL without a trailing slash.
    pub api_base_url: String,
    /// Request timeout; `None` leaves the HTTP client default in place.
    pub request_timeout_secs: Option<u64>,

    // -- UI --
    pub theme: ThemePreference,

    // -- Models --
    /// Models offered in the selector. Never empty.
    pub offered_models: Vec<ModelId>,
    /// Initially selected model. Always one of `offered_models`.
    pub default_model: ModelId,

    // -- Upload --
    pub max_image_bytes: u64,

    // -- Logging --
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            theme: ThemePreference::default(),
            offered_models: ModelId::default_offered(),
            default_model: ModelId::default(),
            max_image_bytes: constants::DEFAULT_MAX_IMAGE_BYTES,
            log_level: None,
        }
    }
}

/// Normalise and check a service base URL. Returns it without a trailing slash.
pub fn normalise_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split("://").nth(1).is_some_and(|rest| !rest.is_empty());
    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(format!(
            "\"{raw}\" is not an http(s) URL (e.g. \"{}\")",
            constants::DEFAULT_API_BASE_URL
        ))
    }
}

/// Read and parse `path`. `Ok(None)` means the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run); an unreadable
/// or unparseable file yields defaults and a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    match read_raw_config(&config_path) {
        Ok(None) => {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
            (AppConfig::default(), Vec::new())
        }
        Ok(Some(raw)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();
    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(
            ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value,
                expected,
            }
            .to_string(),
        );
    };

    // -- API: base_url --
    if let Some(ref url) = raw.api.base_url {
        match normalise_base_url(url) {
            Ok(u) => config.api_base_url = u,
            Err(reason) => out_of_range("api.base_url", url.clone(), reason),
        }
    }

    // -- API: timeout_secs --
    if let Some(secs) = raw.api.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.request_timeout_secs = Some(secs);
        } else {
            out_of_range(
                "api.timeout_secs",
                secs.to_string(),
                format!(
                    "{}-{} (using the HTTP client default)",
                    constants::MIN_REQUEST_TIMEOUT_SECS,
                    constants::MAX_REQUEST_TIMEOUT_SECS
                ),
            );
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.parse::<ThemePreference>() {
            Ok(t) => config.theme = t,
            Err(reason) => out_of_range("ui.theme", theme.clone(), reason),
        }
    }

    // -- Models: offered --
    if let Some(ref offered) = raw.models.offered {
        let mut models: Vec<ModelId> = Vec::new();
        for id in offered {
            match id.parse::<ModelId>() {
                Ok(m) if !models.contains(&m) => models.push(m),
                Ok(_) => {}
                Err(reason) => out_of_range("models.offered", id.clone(), reason),
            }
        }
        if models.is_empty() {
            out_of_range(
                "models.offered",
                format!("{offered:?}"),
                "at least one known model (using default list)".to_string(),
            );
        } else {
            config.offered_models = models;
        }
    }

    // -- Models: default --
    if let Some(ref id) = raw.models.default {
        match id.parse::<ModelId>() {
            Ok(m) if config.offered_models.contains(&m) => config.default_model = m,
            Ok(_) => out_of_range(
                "models.default",
                id.clone(),
                "one of the offered models".to_string(),
            ),
            Err(reason) => out_of_range("models.default", id.clone(), reason),
        }
    }
    if !config.offered_models.contains(&config.default_model) {
        config.default_model = config.offered_models[0];
    }

    // -- Upload: max_image_bytes --
    if let Some(bytes) = raw.upload.max_image_bytes {
        if (constants::MIN_MAX_IMAGE_BYTES..=constants::ABSOLUTE_MAX_IMAGE_BYTES).contains(&bytes)
        {
            config.max_image_bytes = bytes;
        } else {
            out_of_range(
                "upload.max_image_bytes",
                bytes.to_string(),
                format!(
                    "{}-{} (using default {})",
                    constants::MIN_MAX_IMAGE_BYTES,
                    constants::ABSOLUTE_MAX_IMAGE_BYTES,
                    constants::DEFAULT_MAX_IMAGE_BYTES
                ),
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug or trace".to_string(),
            );
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), body).unwrap();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.theme, ThemePreference::Dark);
    }

    #[test]
    fn test_valid_config_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [api]
            base_url = "http://inference.local:8080/"
            timeout_secs = 30

            [ui]
            theme = "light"

            [models]
            offered = ["padim", "efficientad", "uninet"]
            default = "efficientad"

            [upload]
            max_image_bytes = 4096

            [logging]
            level = "DEBUG"
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.api_base_url, "http://inference.local:8080");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.theme, ThemePreference::Light);
        assert_eq!(config.offered_models.len(), 3);
        assert_eq!(config.default_model, ModelId::EfficientAd);
        assert_eq!(config.max_image_bytes, 4096);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [api]
            base_url = "ftp://nope"
            timeout_secs = 0

            [ui]
            theme = "sepia"

            [upload]
            max_image_bytes = 1
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 4, "warnings: {warnings:?}");
        assert_eq!(config.api_base_url, constants::DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.theme, ThemePreference::Dark);
        assert_eq!(config.max_image_bytes, constants::DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_default_model_must_be_offered() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [models]
            offered = ["uninet"]
            default = "padim"
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.offered_models, vec![ModelId::UniNet]);
        assert_eq!(config.default_model, ModelId::UniNet);
    }

    #[test]
    fn test_unknown_models_dropped() {
        let (config, warnings) = validate(RawConfig {
            models: ModelsSection {
                offered: Some(vec!["resnet".to_string()]),
                default: None,
            },
            ..Default::default()
        });
        // One for the unknown id, one for the empty result.
        assert_eq!(warnings.len(), 2);
        assert_eq!(config.offered_models, ModelId::default_offered());
    }

    #[test]
    fn test_unparseable_file_yields_defaults_with_warning() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[api\nbase_url = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }

    #[test]
    fn test_theme_preference_resolution() {
        assert!(ThemePreference::Dark.resolve(Some(false)));
        assert!(!ThemePreference::Light.resolve(Some(true)));
        assert!(!ThemePreference::System.resolve(Some(false)));
        assert!(ThemePreference::System.resolve(None));
    }

    #[test]
    fn test_normalise_base_url() {
        assert_eq!(
            normalise_base_url(" https://host:5000// ").unwrap(),
            "https://host:5000"
        );
        assert!(normalise_base_url("http://").is_err());
        assert!(normalise_base_url("localhost:5000").is_err());
    }
}
