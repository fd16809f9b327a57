use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use retrofeed_common::{NewsSnapshot, NewsSource};

use super::parser::parse_rss;
use crate::module::http::get_text;

pub struct RssNews {
    client: Client,
}

impl RssNews {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsSource for RssNews {
    async fn fetch_news(&self, url: &str) -> Result<NewsSnapshot> {
        let body = get_text(&self.client, url).await?;
        parse_rss(&body).with_context(|| format!("Failed to parse RSS from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::news::DEFAULT_NEWS_URL;
    use crate::module::http::build_client;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_news_live() {
        let source = RssNews::new(build_client().unwrap());
        let snapshot = source.fetch_news(DEFAULT_NEWS_URL).await.unwrap();
        assert!(!snapshot.items.is_empty());
        assert!(snapshot.items.iter().all(|i| !i.headline.is_empty()));
    }
}
