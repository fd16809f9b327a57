///! Yahoo Finance chart JSON parser
///!
///! Each symbol is a separate `v8/finance/chart/{symbol}` response. Only the
///! `meta` block is used: it carries the current price, the previous close
///! and the exchange's regular trading window.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use retrofeed_common::MarketIndex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    short_name: Option<String>,
    regular_market_price: f64,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    current_trading_period: Option<TradingPeriods>,
}

#[derive(Debug, Deserialize)]
struct TradingPeriods {
    regular: TradingPeriod,
}

/// Regular session bounds as Unix timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TradingPeriod {
    pub start: i64,
    pub end: i64,
}

impl TradingPeriod {
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let ts = now.timestamp();
        self.start <= ts && ts < self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartQuote {
    pub index: MarketIndex,
    pub regular: Option<TradingPeriod>,
}

pub fn parse_chart_json(json: &str) -> Result<ChartQuote> {
    let resp: ChartResponse =
        serde_json::from_str(json).context("Failed to deserialize chart JSON")?;

    if let Some(err) = resp.chart.error {
        anyhow::bail!("Chart API error {}: {}", err.code, err.description);
    }

    let meta = resp
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|r| r.meta)
        .context("Chart response has no result")?;

    let price = meta.regular_market_price;
    let previous = meta
        .previous_close
        .or(meta.chart_previous_close)
        .filter(|p| *p != 0.0);
    let (delta, delta_pct) = match previous {
        Some(prev) => (price - prev, (price - prev) / prev * 100.0),
        None => (0.0, 0.0),
    };

    Ok(ChartQuote {
        index: MarketIndex {
            name: meta.short_name.unwrap_or(meta.symbol),
            price: format!("{:.2}", price),
            delta: format!("{:+.2}", delta),
            delta_pct: format!("{:+.2}%", delta_pct),
        },
        regular: meta.current_trading_period.map(|p| p.regular),
    })
}

/// Status line for the market the first quote trades on
pub fn market_message(regular: Option<TradingPeriod>, now: DateTime<Utc>) -> String {
    match regular {
        Some(period) if period.contains(now) => "Market is OPEN".to_string(),
        Some(_) => "Market is CLOSED".to_string(),
        None => "Market status unavailable".to_string(),
    }
}
