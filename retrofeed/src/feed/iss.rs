///! ISS feed: upcoming visible passes for one city

use async_trait::async_trait;
use chrono::{DateTime, Local};
use retrofeed_common::{SightingSnapshot, SightingSource, Sources};
use std::sync::Arc;
use toml::{Table, Value};

use super::{FeedSource, RenderContext};
use crate::config::ConfigScope;
use crate::error::ConfigError;

pub const NO_SIGHTINGS: &str = "No ISS Sightings Available";

pub fn defaults() -> Table {
    let mut table = Table::new();
    table.insert("max_sightings".into(), Value::Integer(3));
    table
}

pub fn build(scope: &ConfigScope, sources: &Sources) -> Result<Box<dyn FeedSource>, ConfigError> {
    Ok(Box::new(IssFeed {
        country: scope.str("country")?.to_string(),
        region: scope.str("region")?.to_string(),
        city: scope.str("city")?.to_string(),
        max_sightings: scope.usize("max_sightings")?,
        source: sources.sightings.clone(),
        data: None,
    }))
}

pub struct IssFeed {
    country: String,
    region: String,
    city: String,
    max_sightings: usize,
    source: Arc<dyn SightingSource>,
    data: Option<SightingSnapshot>,
}

#[async_trait]
impl FeedSource for IssFeed {
    fn fetched_on(&self) -> Option<DateTime<Local>> {
        self.data.as_ref().map(|d| d.fetched_on)
    }

    async fn fetch(&mut self) -> anyhow::Result<()> {
        let snapshot = self
            .source
            .fetch_sightings(&self.country, &self.region, &self.city)
            .await?;
        tracing::info!(
            "ISS snapshot for {}: {} sightings",
            snapshot.location,
            snapshot.sightings.len()
        );
        self.data = Some(snapshot);
        Ok(())
    }

    fn build_content(&mut self, ctx: &RenderContext) -> Vec<String> {
        let Some(data) = &self.data else {
            return vec![NO_SIGHTINGS.to_string()];
        };

        let upcoming: Vec<_> = data.upcoming(ctx.now, self.max_sightings).collect();
        if upcoming.is_empty() {
            return vec![NO_SIGHTINGS.to_string()];
        }

        let mut lines = vec![data.location.clone(), "Upcoming ISS Sightings:".to_string()];
        for s in upcoming {
            lines.push(String::new());
            lines.push(format!("    {} @ {}", s.date_text, s.time_text));
            lines.push(format!("      Visible for {}", s.visible));
            lines.push(format!("      Max height {} Degrees", s.max_height));
            lines.push(format!("      From {}", s.appears));
            lines.push(format!("      To   {}", s.disappears));
        }
        lines
    }
}
