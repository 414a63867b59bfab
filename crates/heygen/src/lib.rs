//! Vidpipe Video API Service
//!
//! Provides access to a HeyGen-compatible video generation API:
//! - HTTP client for the production API (and for proxies exposing the same surface)
//! - Programmable mock for testing polling and notification flows
//! - Configurable provider, base URL, and bearer token

pub mod client;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default base URL of the HeyGen API
pub const DEFAULT_BASE_URL: &str = "https://api.heygen.com";

#[derive(Error, Debug)]
pub enum HeygenError {
    #[error("Video API configuration error: {0}")]
    Configuration(String),

    #[error("Video API request error: {0}")]
    Request(String),

    #[error("Video API returned {status}: {message}")]
    Response { status: u16, message: String },

    #[error("Video API response could not be decoded: {0}")]
    Decode(String),
}

/// Body of `POST /v1/videos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVideoRequest {
    pub template_id: String,
    pub voice_id: String,
    pub script_text: String,
}

/// Response of `POST /v1/videos`.
///
/// The identifier is optional here; callers decide whether its absence is fatal.
/// Numeric identifiers are accepted and kept in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedVideo {
    #[serde(default, alias = "id", deserialize_with = "string_or_number")]
    pub video_id: Option<String>,
}

/// Accept a string or a number; any other JSON type reads as absent
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Response of `GET /v1/videos/{id}/status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatusReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "url")]
    pub video_url: Option<String>,
}

impl VideoStatusReport {
    pub fn new(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            video_url: None,
        }
    }

    pub fn with_video_url(mut self, url: &str) -> Self {
        self.video_url = Some(url.to_string());
        self
    }
}

/// One entry of `GET /v1/videos`.
///
/// The listing format is loosely specified upstream, so loosely typed fields
/// stay as JSON values and are normalised by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default, alias = "video_id")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub voice_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
    #[serde(default)]
    pub completed_at: Option<serde_json::Value>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

/// One entry of `GET /v2/templates`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, alias = "id")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Video API configuration
#[derive(Clone)]
pub struct HeygenConfig {
    /// Video API provider (heygen, mock)
    pub provider: String,
    /// Bearer token sent in the Authorization header
    pub api_key: String,
    /// Base URL of the API or of a proxy exposing the same surface
    pub base_url: String,
}

impl std::fmt::Debug for HeygenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeygenConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HeygenConfig {
    /// Create video API config from environment variables
    pub fn from_env() -> Result<Self, HeygenError> {
        use vidpipe_common::config::{optional_var, var_or};

        let provider = var_or("VIDEO_API_PROVIDER", "heygen");
        let api_key = optional_var("HEYGEN_API_KEY").unwrap_or_else(|| {
            if provider == "mock" {
                "mock-api-key".to_string()
            } else {
                String::new()
            }
        });
        let base_url = var_or("HEYGEN_BASE_URL", DEFAULT_BASE_URL);

        if provider != "mock" && api_key.is_empty() {
            return Err(HeygenError::Configuration(
                "HEYGEN_API_KEY is required for the heygen provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            base_url,
        })
    }

    /// Config for an explicit endpoint, e.g. a deployed proxy
    pub fn for_endpoint(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: "heygen".to_string(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Video API trait for different backends
#[async_trait::async_trait]
pub trait VideoApi: Send + Sync {
    /// Submit a video generation job
    async fn create_video(&self, request: &CreateVideoRequest) -> Result<CreatedVideo, HeygenError>;

    /// Fetch the current status of a job
    async fn video_status(&self, video_id: &str) -> Result<VideoStatusReport, HeygenError>;

    /// List videos known to the account
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, HeygenError>;

    /// List templates available to the account
    async fn list_templates(&self) -> Result<Vec<Template>, HeygenError>;
}

/// Factory for creating VideoApi implementations
pub struct VideoApiFactory;

impl VideoApiFactory {
    pub fn create(config: HeygenConfig) -> Result<Box<dyn VideoApi>, HeygenError> {
        match config.provider.as_str() {
            "heygen" => {
                tracing::info!(base_url = %config.base_url, "Creating HeyGen video API client");
                if config.api_key.is_empty() {
                    return Err(HeygenError::Configuration(
                        "HEYGEN_API_KEY is required for the heygen provider".to_string(),
                    ));
                }
                Ok(Box::new(client::HeygenClient::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock video API");
                Ok(Box::new(mock::MockVideoApi::new()))
            }
            provider => Err(HeygenError::Configuration(format!(
                "Unknown video API provider: {}. Supported providers: heygen, mock",
                provider
            ))),
        }
    }
}
