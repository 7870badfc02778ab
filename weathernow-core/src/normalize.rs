//! Maps an upstream HTTP outcome onto a [`WeatherReading`] or a [`WeatherError`].

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use crate::{
    error::WeatherError,
    model::{ConditionCategory, WeatherReading},
};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

impl From<OwCurrentResponse> for WeatherReading {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition, description) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (ConditionCategory::from(w.main), w.description))
            .unwrap_or_else(|| (ConditionCategory::Other("Unknown".into()), "Unknown".into()));

        Self {
            location_name: parsed.name,
            country_code: parsed.sys.country,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility,
            condition,
            description,
            observed_at_epoch: parsed.dt,
            timezone_offset_s: parsed.timezone,
        }
    }
}

/// Classify one upstream response.
///
/// 404 and 401 are reported regardless of the body; every other failure,
/// including an unparseable success body, is a transient failure.
pub fn normalize(status: StatusCode, body: &str) -> Result<WeatherReading, WeatherError> {
    match status {
        s if s.is_success() => serde_json::from_str::<OwCurrentResponse>(body)
            .map(WeatherReading::from)
            .map_err(|e| {
                warn!(error = %e, "Upstream returned an unparseable weather body");
                WeatherError::transient(format!("failed to parse OpenWeather current JSON: {e}"))
            }),
        StatusCode::NOT_FOUND => Err(WeatherError::NotFound),
        StatusCode::UNAUTHORIZED => {
            warn!("Upstream rejected the configured API key");
            Err(WeatherError::Unauthorized)
        }
        other => {
            warn!(status = %other, body = %truncate_body(body), "Upstream weather request failed");
            Err(WeatherError::transient(format!("OpenWeather responded with status {other}")))
        }
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london_body() -> serde_json::Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [
                { "id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d" }
            ],
            "base": "stations",
            "main": {
                "temp": 15.2,
                "feels_like": 14.6,
                "temp_min": 13.9,
                "temp_max": 16.4,
                "pressure": 1012,
                "humidity": 72
            },
            "visibility": 10000,
            "wind": { "speed": 4.12, "deg": 250 },
            "clouds": { "all": 100 },
            "dt": 1714564800,
            "sys": { "type": 2, "id": 2075535, "country": "GB", "sunrise": 1714537000, "sunset": 1714591000 },
            "timezone": 3600,
            "id": 2643743,
            "name": "London",
            "cod": 200
        })
    }

    fn body_for(reading: &WeatherReading) -> String {
        json!({
            "name": reading.location_name,
            "sys": { "country": reading.country_code },
            "main": {
                "temp": reading.temperature_c,
                "feels_like": reading.feels_like_c,
                "temp_min": reading.temp_min_c,
                "temp_max": reading.temp_max_c,
                "pressure": reading.pressure_hpa,
                "humidity": reading.humidity_pct
            },
            "wind": { "speed": reading.wind_speed_mps },
            "visibility": reading.visibility_m,
            "weather": [
                { "main": reading.condition.as_str(), "description": reading.description }
            ],
            "dt": reading.observed_at_epoch,
            "timezone": reading.timezone_offset_s
        })
        .to_string()
    }

    #[test]
    fn ok_body_is_parsed_into_reading() {
        let reading = normalize(StatusCode::OK, &london_body().to_string()).unwrap();

        assert_eq!(reading.location_name, "London");
        assert_eq!(reading.country_code, "GB");
        assert_eq!(reading.temperature_c, 15.2);
        assert_eq!(reading.feels_like_c, 14.6);
        assert_eq!(reading.temp_min_c, 13.9);
        assert_eq!(reading.temp_max_c, 16.4);
        assert_eq!(reading.humidity_pct, 72);
        assert_eq!(reading.pressure_hpa, 1012);
        assert_eq!(reading.wind_speed_mps, 4.12);
        assert_eq!(reading.visibility_m, Some(10_000));
        assert_eq!(reading.condition, ConditionCategory::Clouds);
        assert_eq!(reading.description, "overcast clouds");
        assert_eq!(reading.observed_at_epoch, 1_714_564_800);
        assert_eq!(reading.timezone_offset_s, 3600);
    }

    #[test]
    fn reading_survives_a_trip_through_the_upstream_shape() {
        let readings = [
            normalize(StatusCode::OK, &london_body().to_string()).unwrap(),
            WeatherReading {
                location_name: "Reykjavík".into(),
                country_code: "IS".into(),
                temperature_c: -3.5,
                feels_like_c: -9.25,
                temp_min_c: -4.0,
                temp_max_c: -2.0,
                humidity_pct: 93,
                pressure_hpa: 987,
                wind_speed_mps: 11.3,
                visibility_m: None,
                condition: ConditionCategory::Other("Squall".into()),
                description: "squalls".into(),
                observed_at_epoch: 1_700_000_000,
                timezone_offset_s: 0,
            },
        ];

        for reading in readings {
            let back = normalize(StatusCode::OK, &body_for(&reading)).unwrap();
            assert_eq!(back, reading);
        }
    }

    #[test]
    fn missing_weather_entry_falls_back_to_unknown() {
        let mut body = london_body();
        body["weather"] = json!([]);

        let reading = normalize(StatusCode::OK, &body.to_string()).unwrap();
        assert_eq!(reading.condition, ConditionCategory::Other("Unknown".into()));
        assert_eq!(reading.description, "Unknown");
    }

    #[test]
    fn not_found_ignores_body() {
        let full = london_body().to_string();
        for body in ["", r#"{"cod":"404","message":"city not found"}"#, "<html>", full.as_str()] {
            assert_eq!(normalize(StatusCode::NOT_FOUND, body), Err(WeatherError::NotFound));
        }
    }

    #[test]
    fn unauthorized_maps_to_credentials_error() {
        let body = r#"{"cod":401,"message":"Invalid API key."}"#;
        assert_eq!(normalize(StatusCode::UNAUTHORIZED, body), Err(WeatherError::Unauthorized));
    }

    #[test]
    fn other_statuses_are_transient() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_REQUEST,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::FORBIDDEN,
        ] {
            let err = normalize(status, "oops").unwrap_err();
            assert!(matches!(err, WeatherError::TransientFailure { .. }), "{status} gave {err:?}");
        }
    }

    #[test]
    fn malformed_success_body_is_transient() {
        for body in ["", "not json", r#"{"name":"London"}"#] {
            let err = normalize(StatusCode::OK, body).unwrap_err();
            assert!(matches!(err, WeatherError::TransientFailure { .. }));
        }
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
