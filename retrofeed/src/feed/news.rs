///! News feed: a few headlines per render, rotating through the list

use async_trait::async_trait;
use chrono::{DateTime, Local};
use retrofeed_common::{NewsSnapshot, NewsSource, Sources};
use std::sync::Arc;
use toml::{Table, Value};

use super::{FeedSource, RenderContext};
use crate::config::ConfigScope;
use crate::error::ConfigError;

pub const DEFAULT_NEWS_URL: &str = "https://feeds.npr.org/1001/rss.xml";

pub fn defaults() -> Table {
    let mut table = Table::new();
    table.insert("url".into(), Value::String(DEFAULT_NEWS_URL.into()));
    table.insert("items".into(), Value::Integer(3));
    table.insert("show_summary".into(), Value::Boolean(false));
    table.insert("cycle".into(), Value::Boolean(true));
    table
}

pub fn build(scope: &ConfigScope, sources: &Sources) -> Result<Box<dyn FeedSource>, ConfigError> {
    Ok(Box::new(NewsFeed {
        url: scope.str("url")?.to_string(),
        items: scope.usize("items")?,
        show_summary: scope.bool("show_summary")?,
        cycle: scope.bool("cycle")?,
        source: sources.news.clone(),
        data: None,
        cursor: 0,
    }))
}

pub struct NewsFeed {
    url: String,
    /// Headlines per render
    items: usize,
    show_summary: bool,
    /// Keep the rotation going across renders instead of restarting at 0
    cycle: bool,
    source: Arc<dyn NewsSource>,
    data: Option<NewsSnapshot>,
    cursor: usize,
}

impl NewsFeed {
    /// Pick the items for one render.
    ///
    /// The cursor advances by the loop counter (1, 2, 3, ...) before each
    /// pick, so each render skips further ahead than a plain sequential read
    /// would. Running past the end wraps the cursor to 0.
    fn rotate(&mut self, available: usize) -> Vec<usize> {
        if !self.cycle {
            self.cursor = 0;
        }
        let wanted = self.items.min(available);
        let mut picks = Vec::with_capacity(wanted);
        for step in 1..=wanted {
            self.cursor += step;
            if self.cursor >= available {
                self.cursor = 0;
            }
            picks.push(self.cursor);
        }
        picks
    }
}

#[async_trait]
impl FeedSource for NewsFeed {
    fn fetched_on(&self) -> Option<DateTime<Local>> {
        self.data.as_ref().map(|d| d.fetched_on)
    }

    async fn fetch(&mut self) -> anyhow::Result<()> {
        let snapshot = self.source.fetch_news(&self.url).await?;
        tracing::info!("News snapshot: {} items from {}", snapshot.items.len(), self.url);
        self.data = Some(snapshot);
        Ok(())
    }

    fn build_content(&mut self, _ctx: &RenderContext) -> Vec<String> {
        let available = self.data.as_ref().map_or(0, |d| d.items.len());
        let picks = self.rotate(available);

        let Some(data) = &self.data else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        for index in picks {
            let item = &data.items[index];
            lines.push(String::new());
            lines.push(item.headline.clone());
            if self.show_summary {
                lines.push(String::new());
                lines.push(item.summary.clone());
                lines.push(String::new());
            }
        }
        lines
    }
}
