///! RSS headline parser

use anyhow::Result;
use chrono::Local;
use retrofeed_common::{NewsItem, NewsSnapshot};
use tracing::warn;

use crate::module::rss::{RssReader, collapse_whitespace, html_to_text, looks_like_rss};

/// Reduce a decoded field to one line of plain text
fn plain(field: Option<String>) -> String {
    field
        .map(|s| collapse_whitespace(&html_to_text(&s)))
        .unwrap_or_default()
}

pub fn parse_rss(xml: &str) -> Result<NewsSnapshot> {
    let reader = RssReader::new()?;
    let mut items = Vec::new();

    for item in reader.items(xml) {
        let headline = plain(item.title);
        if headline.is_empty() {
            warn!("Skipping RSS item without a title");
            continue;
        }
        items.push(NewsItem {
            headline,
            summary: plain(item.description),
        });
    }

    if items.is_empty() && !looks_like_rss(xml) {
        anyhow::bail!("Response does not look like an RSS feed");
    }

    Ok(NewsSnapshot {
        items,
        fetched_on: Local::now(),
    })
}
