//! Display state for one weather surface.
//!
//! A session holds at most one reading and at most one error. Every action
//! starts by clearing both, so a stale result is never shown next to a new
//! error. Errors are stored, never returned.

use tracing::debug;

use crate::{
    error::WeatherError, geolocation::Geolocator, model::WeatherReading,
    provider::WeatherProvider,
};

#[derive(Debug, Default)]
pub struct WeatherSession {
    reading: Option<WeatherReading>,
    error: Option<WeatherError>,
}

impl WeatherSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reading(&self) -> Option<&WeatherReading> {
        self.reading.as_ref()
    }

    pub fn error(&self) -> Option<&WeatherError> {
        self.error.as_ref()
    }

    /// Banner text for the current error.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Search by place name or `"<lat>,<lon>"`.
    pub async fn search(
        &mut self,
        provider: &dyn WeatherProvider,
        input: &str,
    ) -> Option<&WeatherReading> {
        self.clear();

        if input.trim().is_empty() {
            self.error = Some(WeatherError::EmptyInput);
            return None;
        }

        let outcome = provider.fetch_weather(input).await;
        self.settle(outcome)
    }

    /// Look up the weather wherever the geolocator says we are.
    ///
    /// `None` for `geolocator` means the capability is missing on this system.
    pub async fn use_my_location(
        &mut self,
        provider: &dyn WeatherProvider,
        geolocator: Option<&dyn Geolocator>,
    ) -> Option<&WeatherReading> {
        self.clear();

        let Some(geolocator) = geolocator else {
            self.error = Some(WeatherError::GeolocationUnsupported);
            return None;
        };

        let position = match geolocator.current_position().await {
            Ok(position) => position,
            Err(e) => {
                debug!(error = ?e, "Geolocation failed");
                self.error = Some(e);
                return None;
            }
        };

        let outcome = provider.fetch_weather_at(position).await;
        self.settle(outcome)
    }

    fn clear(&mut self) {
        self.reading = None;
        self.error = None;
    }

    fn settle(&mut self, outcome: Result<WeatherReading, WeatherError>) -> Option<&WeatherReading> {
        match outcome {
            Ok(reading) => {
                self.reading = Some(reading);
            }
            Err(e) => {
                debug!(error = ?e, "Weather lookup failed");
                self.error = Some(e);
            }
        }
        self.reading.as_ref()
    }
}
