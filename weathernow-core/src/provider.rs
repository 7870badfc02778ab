use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherError, WeatherReading, model::GeoPosition};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of current conditions.
///
/// One call is one network attempt; implementations never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Look up a free-text place name or a `"<lat>,<lon>"` pair.
    async fn fetch_weather(&self, location: &str) -> Result<WeatherReading, WeatherError>;

    async fn fetch_weather_at(&self, position: GeoPosition) -> Result<WeatherReading, WeatherError> {
        self.fetch_weather(&position.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recording {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherProvider for Recording {
        async fn fetch_weather(&self, location: &str) -> Result<WeatherReading, WeatherError> {
            self.inputs.lock().unwrap().push(location.to_string());
            Err(WeatherError::NotFound)
        }
    }

    #[tokio::test]
    async fn position_lookup_goes_through_coordinate_input() {
        let provider = Recording::default();
        let pos = GeoPosition::new(51.5, -0.12).unwrap();

        let _ = provider.fetch_weather_at(pos).await;

        assert_eq!(*provider.inputs.lock().unwrap(), vec!["51.5,-0.12".to_string()]);
    }
}
