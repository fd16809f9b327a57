use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use retrofeed_common::{WeatherSnapshot, WeatherSource};

use super::parser::{parse_alerts, parse_forecast, parse_observation, parse_point, parse_stations};
use crate::module::http::get_text;

const NWS_API_URL: &str = "https://api.weather.gov";

pub struct WeatherGov {
    client: Client,
}

impl WeatherGov {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WeatherSource for WeatherGov {
    async fn fetch_weather(
        &self,
        lat: f64,
        lon: f64,
        location: Option<&str>,
    ) -> Result<WeatherSnapshot> {
        // The API redirects anything with more than four decimals
        let coords = format!("{:.4},{:.4}", lat, lon);

        let point_url = format!("{}/points/{}", NWS_API_URL, coords);
        let point = parse_point(&get_text(&self.client, &point_url).await?)
            .with_context(|| format!("Failed to resolve weather point {}", coords))?;

        let station = parse_stations(&get_text(&self.client, &point.stations_url).await?)?;
        let observation_url = format!("{}/observations/latest", station);
        let conditions = parse_observation(&get_text(&self.client, &observation_url).await?)
            .with_context(|| format!("Failed to parse latest observation from {}", station))?;

        let periods = parse_forecast(&get_text(&self.client, &point.forecast_url).await?)?;

        let alerts_url = format!("{}/alerts/active?point={}", NWS_API_URL, coords);
        let hazards = parse_alerts(&get_text(&self.client, &alerts_url).await?)?;

        let location = location
            .map(str::to_string)
            .or(point.place)
            .unwrap_or(coords);

        Ok(WeatherSnapshot {
            location,
            last_update: conditions.last_update,
            currently: conditions.currently,
            temp_f: conditions.temp_f,
            temp_c: conditions.temp_c,
            wind_speed: conditions.wind_speed,
            visibility: conditions.visibility,
            dewpoint: conditions.dewpoint,
            comfort: conditions.comfort,
            hazards,
            periods,
            fetched_on: Local::now(),
        })
    }
}
