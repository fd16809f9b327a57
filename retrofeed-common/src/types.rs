use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One market index line, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndex {
    /// Display name, e.g. "S&P 500"
    pub name: String,
    /// Last price, e.g. "5,123.45"
    pub price: String,
    /// Change since previous close, e.g. "+12.34"
    pub delta: String,
    /// Percent change since previous close, e.g. "+0.24%"
    pub delta_pct: String,
}

/// Market data returned by a [`crate::MarketSource`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    /// Free-form market status, e.g. "Market is OPEN"
    pub market_message: String,
    pub indexes: Vec<MarketIndex>,
    pub fetched_on: DateTime<Local>,
}

impl FinanceSnapshot {
    /// Whether the status message reports the market as closed
    pub fn market_closed(&self) -> bool {
        self.market_message.to_uppercase().contains("CLOSED")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub summary: String,
}

/// Headlines returned by a [`crate::NewsSource`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSnapshot {
    pub items: Vec<NewsItem>,
    pub fetched_on: DateTime<Local>,
}

/// One forecast period, e.g. ("Tonight", "Clear, with a low around 40.")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub timeframe: String,
    pub forecast: String,
}

/// Current conditions and forecast returned by a [`crate::WeatherSource`]
///
/// Measurement fields are preformatted strings so the feed only lays them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    /// Observation time as reported by the station
    pub last_update: String,
    /// Short description, e.g. "Partly Cloudy"
    pub currently: String,
    pub temp_f: String,
    pub temp_c: String,
    pub wind_speed: String,
    pub visibility: String,
    pub dewpoint: String,
    /// Comfort label derived from the dewpoint, e.g. "(sticky)"
    pub comfort: String,
    /// Active hazard headlines
    pub hazards: Vec<String>,
    pub periods: Vec<ForecastPeriod>,
    pub fetched_on: DateTime<Local>,
}

/// One predicted visible pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Start of the pass in local time
    pub date_time: DateTime<Local>,
    pub date_text: String,
    pub time_text: String,
    /// Visible duration, e.g. "4 minutes"
    pub visible: String,
    /// Maximum elevation in degrees, e.g. "45"
    pub max_height: String,
    /// Where the pass appears, e.g. "10° above NW"
    pub appears: String,
    /// Where the pass disappears, e.g. "10° above SE"
    pub disappears: String,
}

/// Pass predictions returned by a [`crate::SightingSource`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingSnapshot {
    pub location: String,
    pub sightings: Vec<Sighting>,
    pub fetched_on: DateTime<Local>,
}

impl SightingSnapshot {
    /// Sightings starting at or after `now`, at most `max` of them
    pub fn upcoming(&self, now: DateTime<Local>, max: usize) -> impl Iterator<Item = &Sighting> {
        self.sightings
            .iter()
            .filter(move |s| s.date_time >= now)
            .take(max)
    }
}
