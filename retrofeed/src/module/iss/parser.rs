///! Spot the Station RSS parser
///!
///! Each item's description is a list of `Key: value` lines separated by
///! `<br/>` tags:
///!
///! ```text
///! Date: Wed Jun 10, 2026 <br/>
///! Time: 9:41 PM <br/>
///! Duration: 4 minutes <br/>
///! Maximum Elevation: 45° <br/>
///! Approach: 10° above NW <br/>
///! Departure: 12° above SE <br/>
///! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone};
use regex::Regex;
use retrofeed_common::{Sighting, SightingSnapshot};
use std::collections::HashMap;
use tracing::warn;

use crate::module::rss::{RssReader, collapse_whitespace, html_to_text, looks_like_rss};

const DATE_TIME_FORMAT: &str = "%a %b %d, %Y %I:%M %p";

/// "United_States", "Washington", "Seattle" → "Seattle, Washington"
pub fn display_location(region: &str, city: &str) -> String {
    format!("{}, {}", city.replace('_', " "), region.replace('_', " "))
}

fn description_fields(description: &str, line_break: &Regex) -> HashMap<String, String> {
    line_break
        .split(description)
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            Some((
                collapse_whitespace(key),
                collapse_whitespace(&html_to_text(value)),
            ))
        })
        .collect()
}

fn parse_sighting(fields: &HashMap<String, String>) -> Option<Sighting> {
    let get = |key: &str| fields.get(key).cloned();
    let date_text = get("Date")?;
    let time_text = get("Time")?;

    let stamp = format!("{} {}", date_text, time_text);
    let naive = NaiveDateTime::parse_from_str(&stamp, DATE_TIME_FORMAT).ok()?;
    let date_time = Local.from_local_datetime(&naive).earliest()?;

    Some(Sighting {
        date_time,
        date_text,
        time_text,
        visible: get("Duration")?,
        max_height: get("Maximum Elevation")?.trim_end_matches('°').to_string(),
        appears: get("Approach")?,
        disappears: get("Departure")?,
    })
}

pub fn parse_sightings(xml: &str, location: String) -> Result<SightingSnapshot> {
    let reader = RssReader::new()?;
    let line_break = Regex::new(r"(?i)<br\s*/?>|\n").context("Failed to compile line break regex")?;

    let mut sightings = Vec::new();
    for item in reader.items(xml) {
        let Some(description) = item.description else {
            continue;
        };
        match parse_sighting(&description_fields(&description, &line_break)) {
            Some(sighting) => sightings.push(sighting),
            None => warn!("Skipping unreadable ISS sighting: {:?}", description),
        }
    }

    if sightings.is_empty() && !looks_like_rss(xml) {
        anyhow::bail!("Response does not look like a sightings feed");
    }

    sightings.sort_by_key(|s| s.date_time);
    Ok(SightingSnapshot {
        location,
        sightings,
        fetched_on: Local::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>Spot the Station - Seattle, Washington</title>
  <item>
    <title>2026-06-12 ISS Sighting</title>
    <description>Date: Fri Jun 12, 2026 &lt;br/&gt;
Time: 10:15 PM &lt;br/&gt;
Duration: less than  1 minute &lt;br/&gt;
Maximum Elevation: 12° &lt;br/&gt;
Approach: 10° above W &lt;br/&gt;
Departure: 12° above WSW &lt;br/&gt;
</description>
  </item>
  <item>
    <title>2026-06-10 ISS Sighting</title>
    <description><![CDATA[Date: Wed Jun 10, 2026 <br/> Time: 9:41 PM <br/> Duration: 4 minutes <br/> Maximum Elevation: 45° <br/> Approach: 10° above NW <br/> Departure: 12° above SE <br/>]]></description>
  </item>
  <item>
    <title>Broken</title>
    <description>Date: sometime &lt;br/&gt;</description>
  </item>
</channel>
</rss>"#;

    #[test]
    fn test_display_location() {
        assert_eq!(display_location("Washington", "Seattle"), "Seattle, Washington");
        assert_eq!(display_location("New_York", "New_York_City"), "New York City, New York");
    }

    #[test]
    fn test_parse_sightings() {
        let snapshot = parse_sightings(FEED, "Seattle, Washington".to_string()).unwrap();
        assert_eq!(snapshot.location, "Seattle, Washington");
        assert_eq!(snapshot.sightings.len(), 2);

        // Sorted by start time
        let first = &snapshot.sightings[0];
        assert_eq!(first.date_text, "Wed Jun 10, 2026");
        assert_eq!(first.time_text, "9:41 PM");
        assert_eq!(first.visible, "4 minutes");
        assert_eq!(first.max_height, "45");
        assert_eq!(first.appears, "10° above NW");
        assert_eq!(first.disappears, "12° above SE");
        assert_eq!(
            first.date_time,
            Local.with_ymd_and_hms(2026, 6, 10, 21, 41, 0).unwrap()
        );

        let second = &snapshot.sightings[1];
        assert_eq!(second.visible, "less than 1 minute");
        assert_eq!(second.max_height, "12");
        assert_eq!(
            second.date_time,
            Local.with_ymd_and_hms(2026, 6, 12, 22, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_not_a_feed() {
        assert!(parse_sightings("<html>404</html>", "Nowhere".to_string()).is_err());
    }
}
