use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, Utc};
use reqwest::Client;
use retrofeed_common::{FinanceSnapshot, MarketSource};

use super::parser::{ChartQuote, market_message, parse_chart_json};
use crate::module::http::get_text;

const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooFinance {
    client: Client,
}

impl YahooFinance {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<ChartQuote> {
        let url = format!(
            "{}/{}?range=1d&interval=1d",
            CHART_API_URL,
            symbol.replace('^', "%5E")
        );
        let body = get_text(&self.client, &url).await?;
        parse_chart_json(&body).with_context(|| format!("Failed to parse quote for {}", symbol))
    }
}

#[async_trait]
impl MarketSource for YahooFinance {
    async fn fetch_markets(&self, symbols: &[String]) -> Result<FinanceSnapshot> {
        let mut indexes = Vec::with_capacity(symbols.len());
        let mut regular = None;

        for symbol in symbols {
            let quote = self.fetch_quote(symbol).await?;
            if indexes.is_empty() {
                regular = quote.regular;
            }
            indexes.push(quote.index);
        }

        Ok(FinanceSnapshot {
            market_message: market_message(regular, Utc::now()),
            indexes,
            fetched_on: Local::now(),
        })
    }
}
