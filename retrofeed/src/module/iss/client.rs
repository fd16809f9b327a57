use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use retrofeed_common::{SightingSnapshot, SightingSource};

use super::parser::{display_location, parse_sightings};
use crate::module::http::get_text;

const SIGHTINGS_URL: &str = "https://spotthestation.nasa.gov/sightings/xml_files";

pub struct SpotTheStation {
    client: Client,
}

impl SpotTheStation {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SightingSource for SpotTheStation {
    async fn fetch_sightings(
        &self,
        country: &str,
        region: &str,
        city: &str,
    ) -> Result<SightingSnapshot> {
        let url = format!("{}/{}_{}_{}.xml", SIGHTINGS_URL, country, region, city);
        let body = get_text(&self.client, &url).await?;
        parse_sightings(&body, display_location(region, city))
            .with_context(|| format!("Failed to parse ISS sightings from {}", url))
    }
}
