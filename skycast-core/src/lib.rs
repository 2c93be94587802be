//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Query validation (city name or coordinate pair)
//! - The HTTP client for the weather backend and its failure taxonomy
//! - The single-owner state store driven by a pure reducer
//! - Read-only projections that views derive presentation data from
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod projection;
pub mod query;
pub mod store;

pub use client::{WeatherApi, WeatherClient};
pub use config::Config;
pub use controller::WeatherController;
pub use error::{FetchError, ValidationError};
pub use model::{
    AirQuality, AppState, CurrentConditions, ForecastEntry, LocationInfo, WeatherData,
    WeatherPayload,
};
pub use query::Query;
pub use store::{Action, RequestToken, WeatherStore, reduce};
