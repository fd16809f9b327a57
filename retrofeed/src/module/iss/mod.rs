///! ISS pass predictions from NASA's Spot the Station RSS feeds

pub mod client;
pub mod parser;

pub use client::SpotTheStation;
