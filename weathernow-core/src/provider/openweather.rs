use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::{
    config::{Config, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    model::WeatherReading,
    normalize::normalize,
    query::{LocationQuery, OPENWEATHER_CURRENT_URL, build_request},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: Url,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        let endpoint = Url::parse(OPENWEATHER_CURRENT_URL).context("Invalid OpenWeather URL")?;
        Self::with_endpoint(api_key, endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_endpoint(api_key: String, endpoint: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, endpoint, http })
    }

    /// Construct a provider from config, failing early when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weathernow configure` or set {}.",
                crate::config::API_KEY_ENV
            )
        })?;

        let endpoint = config
            .openweather
            .endpoint
            .as_deref()
            .unwrap_or(OPENWEATHER_CURRENT_URL);
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid OpenWeather endpoint in config: {endpoint}"))?;

        Self::with_endpoint(
            api_key.to_owned(),
            endpoint,
            Duration::from_secs(config.timeout_secs()),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        let query = LocationQuery::parse(location)?;
        let request = build_request(&self.endpoint, &query, &self.api_key);

        let res = self
            .http
            .get(request.url().clone())
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let e = e.without_url();
                warn!(error = %e, "Failed to send request to OpenWeather");
                WeatherError::transient(e.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            warn!(error = %e, "Failed to read OpenWeather response body");
            WeatherError::transient(e.to_string())
        })?;

        let reading = normalize(status, &body)?;
        info!(
            location = %reading.display_name(),
            condition = %reading.condition,
            "Fetched current weather"
        );

        Ok(reading)
    }
}
