///! Weather feed: current conditions, hazards and an optional forecast

use async_trait::async_trait;
use chrono::{DateTime, Local};
use retrofeed_common::{Sources, WeatherSnapshot, WeatherSource};
use std::sync::Arc;
use toml::{Table, Value};

use super::{FeedSource, RenderContext};
use crate::config::{ConfigScope, Header, build_header};
use crate::error::ConfigError;

pub fn defaults() -> Table {
    let mut table = Table::new();
    table.insert("periods".into(), Value::Integer(2));
    table
}

pub fn build(scope: &ConfigScope, sources: &Sources) -> Result<Box<dyn FeedSource>, ConfigError> {
    Ok(Box::new(WeatherFeed {
        lat: scope.f64("lat")?,
        lon: scope.f64("lon")?,
        location: scope.optional_str("location")?.map(str::to_string),
        periods: scope.usize("periods")?,
        source: sources.weather.clone(),
        data: None,
    }))
}

pub struct WeatherFeed {
    lat: f64,
    lon: f64,
    /// Display name overriding the one reported by the source
    location: Option<String>,
    /// Forecast periods to show; 0 hides the forecast
    periods: usize,
    source: Arc<dyn WeatherSource>,
    data: Option<WeatherSnapshot>,
}

#[async_trait]
impl FeedSource for WeatherFeed {
    fn fetched_on(&self) -> Option<DateTime<Local>> {
        self.data.as_ref().map(|d| d.fetched_on)
    }

    async fn fetch(&mut self) -> anyhow::Result<()> {
        let snapshot = self
            .source
            .fetch_weather(self.lat, self.lon, self.location.as_deref())
            .await?;
        tracing::info!(
            "Weather snapshot for {}: {} hazards, {} forecast periods",
            snapshot.location,
            snapshot.hazards.len(),
            snapshot.periods.len()
        );
        self.data = Some(snapshot);
        Ok(())
    }

    fn build_content(&mut self, ctx: &RenderContext) -> Vec<String> {
        match &self.data {
            Some(data) => weather_lines(data, self.periods, ctx.line_width),
            None => Vec::new(),
        }
    }
}

fn weather_lines(data: &WeatherSnapshot, periods: usize, line_width: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Weather at {}", data.location),
        format!("As of {}", data.last_update),
    ];

    for hazard in &data.hazards {
        lines.push(String::new());
        lines.push(format!("!!! {}", hazard));
    }

    lines.push(String::new());
    lines.push(format!("    Conditions   {}", data.currently));
    lines.push(format!("    Temperature  {} ({})", data.temp_f, data.temp_c));
    lines.push(format!("    Wind         {}", data.wind_speed));
    lines.push(format!("    Visibility   {}", data.visibility));
    lines.push(format!("    Dewpoint     {} {}", data.dewpoint, data.comfort));

    let shown = periods.min(data.periods.len());
    if shown > 0 {
        lines.push(String::new());
        if shown > 1 {
            let header = Header::new("*", "Extended Forecast...", "*");
            lines.push(build_header(&header, line_width));
        }
        for period in &data.periods[..shown] {
            lines.push(String::new());
            lines.push(period.timeframe.clone());
            lines.push(period.forecast.clone());
        }
    }
    lines
}
