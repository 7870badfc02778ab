use thiserror::Error;

/// Everything that can end a weather lookup.
///
/// `Display` yields the message shown to the user. Variants that carry a
/// `reason` keep the diagnostic detail for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Please enter a city name")]
    EmptyInput,

    #[error("Invalid coordinates '{input}'. Use the form <latitude>,<longitude>.")]
    InvalidCoordinates { input: String },

    #[error("Location not found. Please check the spelling and try again.")]
    NotFound,

    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,

    #[error("Failed to fetch weather data. Please try again later.")]
    TransientFailure { reason: String },

    #[error("Geolocation is not supported on this system")]
    GeolocationUnsupported,

    #[error("Unable to retrieve your location")]
    GeolocationDenied { reason: String },
}

impl WeatherError {
    pub(crate) fn transient(reason: impl Into<String>) -> Self {
        Self::TransientFailure { reason: reason.into() }
    }

    pub(crate) fn denied(reason: impl Into<String>) -> Self {
        Self::GeolocationDenied { reason: reason.into() }
    }

    /// True for failures that originate from the user's input rather than the upstream.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::InvalidCoordinates { .. })
    }
}
