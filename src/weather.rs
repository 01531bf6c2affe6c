//! Weather passthrough to an external API
//!
//! Stateless proxy: forwards the city query upstream and falls back to mock
//! data when the upstream answers with anything other than a JSON 200.

use crate::config::WeatherConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_CITY: &str = "London";

/// Result returned to callers of the weather endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExternalApiResponse {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(error: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(http: Client, config: WeatherConfig) -> Self {
        Self { http, config }
    }

    /// Fetch current weather for `city`
    ///
    /// Never fails: transport problems are reported inside the response.
    pub async fn fetch(&self, city: &str) -> ExternalApiResponse {
        tracing::info!(city = %city, "Fetching weather data");

        let result = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::error!(city = %city, "Timeout fetching weather data");
                return ExternalApiResponse::failed("Request timeout");
            }
            Err(e) => {
                tracing::error!(city = %city, error = %e, "Weather request error");
                return ExternalApiResponse::failed("Request failed");
            }
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<Value>().await {
                Ok(data) => {
                    tracing::info!(city = %city, "Weather data retrieved");
                    return ExternalApiResponse::ok(data);
                }
                Err(e) if e.is_timeout() => {
                    tracing::error!(city = %city, "Timeout reading weather data");
                    return ExternalApiResponse::failed("Request timeout");
                }
                Err(_) => {}
            }
        }

        tracing::warn!(
            city = %city,
            status = status.as_u16(),
            "Using mock weather data"
        );
        ExternalApiResponse::ok(mock_weather(city))
    }
}

/// Placeholder data served when the upstream is unusable
pub fn mock_weather(city: &str) -> Value {
    json!({
        "city": city,
        "temperature": 20.5,
        "description": "Partly cloudy",
        "humidity": 65,
        "note": "This is mock data - replace with actual API key for real data"
    })
}
