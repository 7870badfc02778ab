//! Turns the user's location input into an upstream request.
//!
//! A comma marks a coordinate pair (`"51.5,-0.12"`); anything else is a
//! place name. Nothing here touches the network.

use std::str::FromStr;

use tracing::debug;
use url::Url;

use crate::{error::WeatherError, model::GeoPosition};

/// OpenWeather "current weather" endpoint.
pub const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// What the user asked for, after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates(GeoPosition),
}

impl LocationQuery {
    pub fn parse(input: &str) -> Result<Self, WeatherError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::EmptyInput);
        }

        if !trimmed.contains(',') {
            return Ok(Self::Place(trimmed.to_string()));
        }

        let invalid = || WeatherError::InvalidCoordinates { input: trimmed.to_string() };

        let mut parts = trimmed.split(',').map(str::trim);
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let lat: f64 = lat.parse().map_err(|_| invalid())?;
        let lon: f64 = lon.parse().map_err(|_| invalid())?;

        GeoPosition::new(lat, lon).map(Self::Coordinates).ok_or_else(invalid)
    }
}

impl FromStr for LocationQuery {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<GeoPosition> for LocationQuery {
    fn from(position: GeoPosition) -> Self {
        Self::Coordinates(position)
    }
}

/// A fully-built upstream GET: endpoint plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Url,
}

impl RequestDescriptor {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The encoded query string, e.g. `q=London&units=metric&appid=KEY`.
    pub fn query_string(&self) -> &str {
        self.url.query().unwrap_or_default()
    }

    /// Decoded value of the first parameter called `name`.
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

pub fn build_request(endpoint: &Url, query: &LocationQuery, api_key: &str) -> RequestDescriptor {
    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        match query {
            LocationQuery::Place(name) => {
                pairs.append_pair("q", name);
            }
            LocationQuery::Coordinates(pos) => {
                pairs
                    .append_pair("lat", &pos.latitude.to_string())
                    .append_pair("lon", &pos.longitude.to_string());
            }
        }
        pairs.append_pair("units", "metric").append_pair("appid", api_key);
    }

    let kind = match query {
        LocationQuery::Place(_) => "place",
        LocationQuery::Coordinates(_) => "coordinates",
    };
    debug!(endpoint = %endpoint, kind, "Built upstream weather request");

    RequestDescriptor { url }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse(OPENWEATHER_CURRENT_URL).unwrap()
    }

    fn build(input: &str) -> Result<RequestDescriptor, WeatherError> {
        let query = LocationQuery::parse(input)?;
        Ok(build_request(&endpoint(), &query, "KEY"))
    }

    #[test]
    fn city_name_builds_place_query() {
        let req = build("London").unwrap();
        assert_eq!(req.query_string(), "q=London&units=metric&appid=KEY");
        assert_eq!(req.url().path(), "/data/2.5/weather");
    }

    #[test]
    fn coordinates_build_lat_lon_query() {
        let req = build("51.5,-0.12").unwrap();
        assert_eq!(req.query_string(), "lat=51.5&lon=-0.12&units=metric&appid=KEY");
    }

    #[test]
    fn coordinate_tokens_are_trimmed() {
        let query = LocationQuery::parse("  40.7128 , -74.006 ").unwrap();
        assert_eq!(
            query,
            LocationQuery::Coordinates(GeoPosition { latitude: 40.7128, longitude: -74.006 })
        );
    }

    #[test]
    fn place_names_never_produce_coordinate_params() {
        for city in ["London", "New York", "São Paulo", "Ho Chi Minh City", "St. John's", "O'Fallon"] {
            let req = build(city).unwrap();
            assert_eq!(req.param("q").as_deref(), Some(city));
            assert!(req.param("lat").is_none(), "{city} produced a lat param");
            assert!(req.param("lon").is_none(), "{city} produced a lon param");
        }
    }

    #[test]
    fn place_names_are_percent_encoded() {
        let req = build("São Paulo").unwrap();
        assert!(req.query_string().starts_with("q=S%C3%A3o+Paulo&"));

        let req = build("Rock & Roll").unwrap();
        assert!(req.query_string().starts_with("q=Rock+%26+Roll&"));
    }

    #[test]
    fn surrounding_whitespace_is_dropped_from_place() {
        let req = build("  Paris \n").unwrap();
        assert_eq!(req.param("q").as_deref(), Some("Paris"));
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(LocationQuery::parse(""), Err(WeatherError::EmptyInput));
        assert_eq!(LocationQuery::parse("   \t\n"), Err(WeatherError::EmptyInput));
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        for input in ["Paris,France", "51.5,", ",0", "1,2,3", "95,0", "0,181", "NaN,0"] {
            let err = LocationQuery::parse(input).unwrap_err();
            assert!(
                matches!(err, WeatherError::InvalidCoordinates { .. }),
                "{input} gave {err:?}"
            );
        }
    }

    #[test]
    fn geo_position_converts_into_coordinate_query() {
        let pos = GeoPosition::new(-33.87, 151.21).unwrap();
        let req = build_request(&endpoint(), &pos.into(), "KEY");
        assert_eq!(req.param("lat").as_deref(), Some("-33.87"));
        assert_eq!(req.param("lon").as_deref(), Some("151.21"));
        assert_eq!(req.param("units").as_deref(), Some("metric"));
    }

    #[test]
    fn from_str_matches_parse() {
        let q: LocationQuery = "Berlin".parse().unwrap();
        assert_eq!(q, LocationQuery::Place("Berlin".into()));
    }
}
