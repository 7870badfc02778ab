//! Human-friendly output: the weather card and the error banner.

use weathernow_core::{ConditionCategory, WeatherReading};

/// Round to the nearest whole degree, halves going up (`2.5 → 3`, `-0.5 → 0`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn celsius(value: f64) -> String {
    format!("{}°C", round_half_up(value))
}

pub fn visibility_km(meters: Option<u32>) -> String {
    match meters {
        Some(m) => format!("{:.1} km", f64::from(m) / 1000.0),
        None => "n/a".to_string(),
    }
}

/// Upper-case the first letter of every word: "light rain" → "Light Rain".
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn glyph(condition: &ConditionCategory) -> &'static str {
    match condition.icon_name() {
        "sun" => "☀️",
        "cloud_rain" => "🌧️",
        "cloud_drizzle" => "🌦️",
        "cloud_snow" => "❄️",
        "cloud_lightning" => "⛈️",
        "cloud_fog" => "🌫️",
        "wind" => "💨",
        _ => "☁️",
    }
}

pub fn card(reading: &WeatherReading) -> String {
    let local_time = reading
        .local_time()
        .map(|t| t.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string());

    let mut out = String::new();
    out.push_str(&format!("📍 {}    🕒 {}\n", reading.display_name(), local_time));
    out.push_str(&format!(
        "{}  {}  {}\n",
        glyph(&reading.condition),
        celsius(reading.temperature_c),
        title_case(&reading.description)
    ));
    out.push_str(&format!(
        "Feels like {} · High {} · Low {}\n\n",
        celsius(reading.feels_like_c),
        celsius(reading.temp_max_c),
        celsius(reading.temp_min_c)
    ));
    out.push_str(&format!("{:<12}{}%\n", "Humidity", reading.humidity_pct));
    out.push_str(&format!("{:<12}{} m/s\n", "Wind Speed", reading.wind_speed_mps));
    out.push_str(&format!("{:<12}{} hPa\n", "Pressure", reading.pressure_hpa));
    out.push_str(&format!("{:<12}{}\n", "Visibility", visibility_km(reading.visibility_m)));
    out
}

pub fn banner(message: &str) -> String {
    format!("✖ {message}")
}
