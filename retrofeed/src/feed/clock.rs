///! Clock feed: today's date and the current time, no data source

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Local, Timelike};
use retrofeed_common::Sources;
use toml::{Table, Value};

use super::{FeedSource, RenderContext};
use crate::config::ConfigScope;
use crate::error::ConfigError;

pub fn defaults() -> Table {
    let mut table = Table::new();
    table.insert("format".into(), Value::String("%A, %B ".into()));
    table.insert("descriptive".into(), Value::Boolean(false));
    table
}

pub fn build(scope: &ConfigScope, _sources: &Sources) -> Result<Box<dyn FeedSource>, ConfigError> {
    let format = scope.str("format")?;
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::invalid("format", "a valid strftime pattern"));
    }
    Ok(Box::new(ClockFeed {
        format: format.to_string(),
        descriptive: scope.bool("descriptive")?,
    }))
}

pub struct ClockFeed {
    /// Date pattern; the day of month and its suffix are appended to it
    format: String,
    /// Two sentences instead of one compact line
    descriptive: bool,
}

#[async_trait]
impl FeedSource for ClockFeed {
    fn fetched_on(&self) -> Option<DateTime<Local>> {
        None
    }

    fn refreshes(&self) -> bool {
        false
    }

    async fn fetch(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn build_content(&mut self, ctx: &RenderContext) -> Vec<String> {
        let now = ctx.now;
        let day = now.day();
        let date_text = format!("{}{}{}", now.format(&self.format), day, ordinal_suffix(day));
        let time_text = format_time(&now);

        if self.descriptive {
            vec![
                format!("It is {}", date_text),
                format!("Current time is {}", time_text),
            ]
        } else {
            vec![format!("{} {}", time_text, date_text)]
        }
    }
}

/// English ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// 12-hour clock time without a leading zero, e.g. "9:05 PM"
pub fn format_time<T: Timelike>(time: &T) -> String {
    let (pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
}
