///! Conditions, forecast and alerts from the US National Weather Service
///!
///! api.weather.gov resolves a coordinate to a forecast office grid and a
///! list of nearby observation stations; the nearest station supplies the
///! current conditions.

pub mod client;
pub mod parser;

pub use client::WeatherGov;
