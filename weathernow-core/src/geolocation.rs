//! "Where am I" as a one-shot async call.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};
use url::Url;

use crate::{config::Config, error::WeatherError, model::GeoPosition};

/// Free IP geolocation endpoint; only the fields we read are requested.
pub const IP_LOOKUP_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Resolve the current position once. Failures are `GeolocationDenied`.
    async fn current_position(&self) -> Result<GeoPosition, WeatherError>;
}

/// Always answers with the same position, e.g. a configured home location.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub GeoPosition);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<GeoPosition, WeatherError> {
        Ok(self.0)
    }
}

/// Approximates the position from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: Url,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { endpoint, http })
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<GeoPosition, WeatherError> {
        let res = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| WeatherError::denied(format!("IP lookup request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::denied(format!("IP lookup responded with status {status}")));
        }

        let body: IpLookupResponse = res
            .json()
            .await
            .map_err(|e| WeatherError::denied(format!("IP lookup returned bad JSON: {e}")))?;

        if body.status != "success" {
            return Err(WeatherError::denied(format!(
                "IP lookup failed: {}",
                body.message.as_deref().unwrap_or("no reason given")
            )));
        }

        let position = match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => GeoPosition::new(lat, lon),
            _ => None,
        }
        .ok_or_else(|| WeatherError::denied("IP lookup returned no usable coordinates"))?;

        debug!(%position, "Resolved position from IP address");
        Ok(position)
    }
}

/// Pick the geolocation capability the config allows.
///
/// `None` means the capability is absent, not that it failed.
pub fn geolocator_from_config(config: &Config) -> Option<Box<dyn Geolocator>> {
    if let Some(home) = config.home_position() {
        return Some(Box::new(FixedGeolocator(home)));
    }

    if !config.location.use_ip_lookup {
        return None;
    }

    let url = config.location.ip_lookup_url.as_deref().unwrap_or(IP_LOOKUP_URL);
    let built = Url::parse(url)
        .context("Invalid IP lookup URL in config")
        .and_then(|endpoint| IpGeolocator::new(endpoint, Duration::from_secs(config.timeout_secs())));

    match built {
        Ok(geo) => Some(Box::new(geo)),
        Err(e) => {
            warn!(error = %e, "IP geolocation disabled");
            None
        }
    }
}
