///! Finance feed: market status and a block per index

use async_trait::async_trait;
use chrono::{DateTime, Local};
use retrofeed_common::{FinanceSnapshot, MarketSource, Sources};
use std::sync::Arc;
use toml::{Table, Value};

use super::clock::format_time;
use super::{FeedSource, RenderContext};
use crate::config::ConfigScope;
use crate::error::ConfigError;

pub fn defaults() -> Table {
    let symbols = ["^DJI", "^GSPC", "^IXIC"]
        .iter()
        .map(|s| Value::String(s.to_string()))
        .collect();
    let mut table = Table::new();
    table.insert("symbols".into(), Value::Array(symbols));
    table
}

pub fn build(scope: &ConfigScope, sources: &Sources) -> Result<Box<dyn FeedSource>, ConfigError> {
    Ok(Box::new(FinanceFeed {
        symbols: scope.str_list("symbols")?,
        source: sources.market.clone(),
        data: None,
    }))
}

pub struct FinanceFeed {
    symbols: Vec<String>,
    source: Arc<dyn MarketSource>,
    data: Option<FinanceSnapshot>,
}

#[async_trait]
impl FeedSource for FinanceFeed {
    fn fetched_on(&self) -> Option<DateTime<Local>> {
        self.data.as_ref().map(|d| d.fetched_on)
    }

    async fn fetch(&mut self) -> anyhow::Result<()> {
        let snapshot = self.source.fetch_markets(&self.symbols).await?;
        tracing::info!(
            "Finance snapshot: {} indexes, '{}'",
            snapshot.indexes.len(),
            snapshot.market_message
        );
        self.data = Some(snapshot);
        Ok(())
    }

    fn build_content(&mut self, _ctx: &RenderContext) -> Vec<String> {
        match &self.data {
            Some(data) => finance_lines(data),
            None => Vec::new(),
        }
    }
}

fn finance_lines(data: &FinanceSnapshot) -> Vec<String> {
    if data.market_closed() {
        return vec![data.market_message.clone()];
    }

    let mut lines = vec![format!("As of {}", format_time(&data.fetched_on))];
    for index in &data.indexes {
        lines.push(String::new());
        lines.push(format!("    {:9}  {:>9}", index.name, index.price));
        lines.push(format!("               {:>9}  {}", index.delta, index.delta_pct));
    }
    lines
}
