// AnomalyDash - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for startup and orchestration failures.
#[derive(Debug)]
pub enum DashboardError {
    /// The inference client could not be built or a prediction failed.
    Predict(PredictError),

    /// The native window could not be created.
    Gui { message: String },
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predict(e) => write!(f, "Prediction error: {e}"),
            Self::Gui { message } => write!(f, "GUI error: {message}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Predict(e) => Some(e),
            Self::Gui { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction errors
// ---------------------------------------------------------------------------

/// Coarse failure classification kept alongside a failed detection.
///
/// The display layer collapses every failure into the `error` verdict; this
/// tag is what survives for the result block, logs, and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request could not be constructed (unreadable or unsupported file).
    Input,
    /// The service could not be reached or the transfer broke off.
    Network,
    /// The service answered with a non-2xx status.
    Server,
    /// The service answered 2xx but the body was not a valid detection.
    Parse,
}

impl FailureKind {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "Input error",
            Self::Network => "Network error",
            Self::Server => "Server error",
            Self::Parse => "Parse error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors produced while submitting an image to the inference service.
#[derive(Debug)]
pub enum PredictError {
    /// The image file could not be read.
    ReadImage { path: PathBuf, source: io::Error },

    /// The image file exceeds the configured upload limit.
    ImageTooLarge { path: PathBuf, size: u64, max: u64 },

    /// Neither the content nor the extension identifies an image format.
    UnsupportedImage { path: PathBuf },

    /// The HTTP client could not be constructed.
    ClientBuild { source: reqwest::Error },

    /// The request could not be sent or no response arrived.
    Request { url: String, source: reqwest::Error },

    /// The response body could not be read.
    Body { url: String, source: reqwest::Error },

    /// The service answered with a non-success status.
    Server { status: u16, body: String },

    /// The response body was not valid JSON of the expected shape.
    MalformedResponse { source: serde_json::Error },

    /// The response parsed but carried unusable values.
    InvalidResponse { reason: String },
}

impl PredictError {
    /// Classify this error for display and logging.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ReadImage { .. } | Self::ImageTooLarge { .. } | Self::UnsupportedImage { .. } => {
                FailureKind::Input
            }
            Self::ClientBuild { .. } | Self::Request { .. } | Self::Body { .. } => {
                FailureKind::Network
            }
            Self::Server { .. } => FailureKind::Server,
            Self::MalformedResponse { .. } | Self::InvalidResponse { .. } => FailureKind::Parse,
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadImage { path, source } => {
                write!(f, "Cannot read image '{}': {source}", path.display())
            }
            Self::ImageTooLarge { path, size, max } => write!(
                f,
                "Image '{}' is {size} bytes, exceeds upload limit of {max} bytes",
                path.display()
            ),
            Self::UnsupportedImage { path } => {
                write!(f, "'{}' is not a recognised image format", path.display())
            }
            Self::ClientBuild { source } => write!(f, "Cannot build HTTP client: {source}"),
            Self::Request { url, source } => write!(f, "Request to '{url}' failed: {source}"),
            Self::Body { url, source } => {
                write!(f, "Reading response from '{url}' failed: {source}")
            }
            Self::Server { status, body } => {
                if body.is_empty() {
                    write!(f, "Service returned HTTP {status}")
                } else {
                    write!(f, "Service returned HTTP {status}: {body}")
                }
            }
            Self::MalformedResponse { source } => {
                write!(f, "Malformed response body: {source}")
            }
            Self::InvalidResponse { reason } => write!(f, "Invalid response: {reason}"),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadImage { source, .. } => Some(source),
            Self::ClientBuild { source } => Some(source),
            Self::Request { source, .. } => Some(source),
            Self::Body { source, .. } => Some(source),
            Self::MalformedResponse { source } => Some(source),
            _ => None,
        }
    }
}

impl From<PredictError> for DashboardError {
    fn from(e: PredictError) -> Self {
        Self::Predict(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for AnomalyDash results.
pub type Result<T> = std::result::Result<T, DashboardError>;
