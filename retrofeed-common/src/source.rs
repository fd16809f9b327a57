///! Data-source contracts called from a feed's fetch step
///!
///! Each call returns a complete snapshot stamped with `fetched_on`, or an
///! error that the caller propagates as-is. Sources own their own timeouts.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{FinanceSnapshot, NewsSnapshot, SightingSnapshot, WeatherSnapshot};

#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_markets(&self, symbols: &[String]) -> Result<FinanceSnapshot>;
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the headline list published at `url`
    async fn fetch_news(&self, url: &str) -> Result<NewsSnapshot>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// `location` overrides the place name reported by the source when set
    async fn fetch_weather(
        &self,
        lat: f64,
        lon: f64,
        location: Option<&str>,
    ) -> Result<WeatherSnapshot>;
}

#[async_trait]
pub trait SightingSource: Send + Sync {
    async fn fetch_sightings(
        &self,
        country: &str,
        region: &str,
        city: &str,
    ) -> Result<SightingSnapshot>;
}

/// The set of sources handed to feed factories at startup
#[derive(Clone)]
pub struct Sources {
    pub market: Arc<dyn MarketSource>,
    pub news: Arc<dyn NewsSource>,
    pub weather: Arc<dyn WeatherSource>,
    pub sightings: Arc<dyn SightingSource>,
}
