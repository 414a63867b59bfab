//! HeyGen HTTP Client Implementation
//!
//! Calls the video API at `{base_url}/v1/...` with a bearer token.
//! Responses may arrive bare or wrapped in a `{"data": ...}` envelope;
//! both shapes are accepted.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    CreateVideoRequest, CreatedVideo, HeygenConfig, HeygenError, Template, VideoApi, VideoRecord,
    VideoStatusReport,
};

/// Real HTTP client for the video API
pub struct HeygenClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HeygenClient {
    pub fn new(config: HeygenConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    /// `base_url` with `segments` appended; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, HeygenError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| HeygenError::Configuration(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                HeygenError::Configuration(format!("Base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, HeygenError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(HeygenError::Response {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HeygenError::Decode(e.to_string()))
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value, HeygenError> {
        let response = self
            .http
            .get(self.endpoint(segments)?)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| HeygenError::Request(e.to_string()))?;

        Self::read_json(response).await
    }
}

/// Strip a `{"data": ...}` envelope if present
pub(crate) fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ (Value::Object(_) | Value::Array(_))) => data,
            _ => Value::Object(map),
        },
        other => other,
    }
}

/// Find a list under `key`, or accept a bare array. Anything else is empty.
pub(crate) fn extract_list(value: Value, key: &str) -> Vec<Value> {
    match unwrap_data(value) {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, HeygenError> {
    serde_json::from_value(unwrap_data(value)).map_err(|e| HeygenError::Decode(e.to_string()))
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>, kind: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(kind, error = %e, "Skipping malformed list entry");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl VideoApi for HeygenClient {
    async fn create_video(&self, request: &CreateVideoRequest) -> Result<CreatedVideo, HeygenError> {
        tracing::debug!(template_id = %request.template_id, voice_id = %request.voice_id, "Submitting video generation request");

        let response = self
            .http
            .post(self.endpoint(&["v1", "videos"])?)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| HeygenError::Request(e.to_string()))?;

        decode(Self::read_json(response).await?)
    }

    async fn video_status(&self, video_id: &str) -> Result<VideoStatusReport, HeygenError> {
        let value = self
            .get_json(&["v1", "videos", video_id, "status"])
            .await?;
        decode(value)
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>, HeygenError> {
        let value = self.get_json(&["v1", "videos"]).await?;
        Ok(decode_items(extract_list(value, "videos"), "video"))
    }

    async fn list_templates(&self) -> Result<Vec<Template>, HeygenError> {
        let value = self.get_json(&["v2", "templates"]).await?;
        Ok(decode_items(extract_list(value, "templates"), "template"))
    }
}
