///! HTTP data sources
///!
///! One submodule per upstream service. Each splits into a `parser` that
///! turns a response body into snapshot types and a `client` that performs
///! the requests and implements the matching source trait.

pub mod finance;
pub mod http;
pub mod iss;
pub mod news;
pub mod rss;
pub mod weather;

use anyhow::Result;
use retrofeed_common::Sources;
use std::sync::Arc;

pub use finance::YahooFinance;
pub use iss::SpotTheStation;
pub use news::RssNews;
pub use weather::WeatherGov;

/// Sources backed by the live services, sharing one HTTP client
pub fn http_sources() -> Result<Sources> {
    let client = http::build_client()?;
    Ok(Sources {
        market: Arc::new(YahooFinance::new(client.clone())),
        news: Arc::new(RssNews::new(client.clone())),
        weather: Arc::new(WeatherGov::new(client.clone())),
        sightings: Arc::new(SpotTheStation::new(client)),
    })
}
