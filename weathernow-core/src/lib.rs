//! Core library for the `weathernow` lookup tool.
//!
//! This crate defines:
//! - Query building for place names and coordinate pairs
//! - Normalization of upstream responses into readings or user-facing errors
//! - The provider and geolocation seams, with OpenWeather and IP-lookup implementations
//! - Display state for a weather surface
//! - Configuration & credentials handling
//!
//! It is used by `weathernow-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod session;

pub use config::Config;
pub use error::WeatherError;
pub use geolocation::{Geolocator, geolocator_from_config};
pub use model::{ConditionCategory, GeoPosition, WeatherReading};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use query::{LocationQuery, RequestDescriptor};
pub use session::WeatherSession;
