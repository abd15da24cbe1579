// AnomalyDash - app/api.rs
//
// Client for the remote inference service.
//
// One blocking POST per call: multipart body with an `image` file part and a
// `model` text field, sent to `<base_url>/predict`. Callers run it on a
// worker thread (see app/detect.rs); the UI thread never blocks on it.
//
// Two entry points:
//   - `try_predict_image` keeps the failure kind (input/network/server/parse).
//   - `predict_image` never fails: any error is logged and collapsed into
//     the `{result: error, score: 0}` sentinel.
// No retries are attempted.

use crate::core::model::{DetectionResult, ModelId, Verdict};
use crate::core::uploader::SelectedImage;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::PredictError;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Largest image the client will upload.
    pub max_image_bytes: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
            max_image_bytes: constants::DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(c: &AppConfig) -> Self {
        Self {
            base_url: c.api_base_url.clone(),
            timeout_secs: c.request_timeout_secs,
            max_image_bytes: c.max_image_bytes,
        }
    }
}

/// Body of a successful `/predict` response.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    result: String,
    score: f64,
}

impl PredictResponse {
    fn into_result(self) -> Result<DetectionResult, PredictError> {
        let verdict = match self.result.as_str() {
            "defect" => Verdict::Defect,
            "good" => Verdict::Good,
            other => {
                return Err(PredictError::InvalidResponse {
                    reason: format!("unknown result '{other}'"),
                })
            }
        };
        if !self.score.is_finite() {
            return Err(PredictError::InvalidResponse {
                reason: format!("score {} is not a finite number", self.score),
            });
        }
        Ok(DetectionResult {
            result: verdict,
            score: self.score,
        })
    }
}

/// Reusable client for the inference service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    predict_url: String,
    max_image_bytes: u64,
}

impl ApiClient {
    /// Build a client for `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, PredictError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| PredictError::ClientBuild { source: e })?;
        let predict_url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            constants::PREDICT_PATH
        );
        tracing::debug!(url = %predict_url, timeout = ?config.timeout_secs, "API client ready");
        Ok(Self {
            http,
            predict_url,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Submit `image` for classification by `model`, keeping the failure kind.
    pub fn try_predict_image(
        &self,
        image: &SelectedImage,
        model: ModelId,
    ) -> Result<DetectionResult, PredictError> {
        let bytes = fs::read_image(&image.path, self.max_image_bytes)?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(image.name.clone())
            .mime_str(&image.mime_type)
            .map_err(|_| PredictError::UnsupportedImage {
                path: image.path.clone(),
            })?;
        let form = Form::new()
            .part(constants::IMAGE_FIELD, part)
            .text(constants::MODEL_FIELD, model.wire_name());

        tracing::info!(
            url = %self.predict_url,
            file = %image.name,
            bytes = size,
            model = model.wire_name(),
            "Submitting image for detection"
        );

        let response = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .map_err(|e| PredictError::Request {
                url: self.predict_url.clone(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| PredictError::Body {
            url: self.predict_url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(PredictError::Server {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let parsed: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| PredictError::MalformedResponse { source: e })?;
        let result = parsed.into_result()?;

        tracing::info!(
            result = ?result.result,
            score = result.score,
            "Detection received"
        );
        Ok(result)
    }

    /// Submit `image` for classification by `model`.
    ///
    /// Never fails: any error is logged and replaced by the error sentinel.
    pub fn predict_image(&self, image: &SelectedImage, model: ModelId) -> DetectionResult {
        self.try_predict_image(image, model).unwrap_or_else(|e| {
            tracing::warn!(kind = %e.kind(), error = %e, "Detection failed");
            DetectionResult::error_sentinel()
        })
    }
}

/// Shorten a response body for inclusion in an error message.
fn preview(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(constants::MAX_ERROR_BODY_PREVIEW) {
        Some((cut, _)) => format!("{}\u{2026}", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url_joins_base() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://example.test:5000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.predict_url(), "http://example.test:5000/predict");
    }

    #[test]
    fn test_default_endpoint() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(client.predict_url(), "http://localhost:5000/predict");
    }

    #[test]
    fn test_response_rejects_unknown_verdict() {
        let r = PredictResponse {
            result: "error".to_string(),
            score: 0.0,
        };
        assert!(matches!(
            r.into_result(),
            Err(PredictError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_response_accepts_defect() {
        let r = PredictResponse {
            result: "defect".to_string(),
            score: 0.91,
        };
        let result = r.into_result().unwrap();
        assert!(result.is_anomaly());
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(constants::MAX_ERROR_BODY_PREVIEW + 50);
        let p = preview(&long);
        assert_eq!(p.chars().count(), constants::MAX_ERROR_BODY_PREVIEW + 1);
        assert_eq!(preview("  short  "), "short");
    }
}
