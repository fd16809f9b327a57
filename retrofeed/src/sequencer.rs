///! Sequencer - builds the playlist and drives it forever
///!
///! The playlist holds each named feed once. `order` indexes into it, so a
///! name that appears several times in `sequence` plays the same instance
///! and its data and rotation state carry over between appearances.

use std::collections::HashMap;
use std::convert::Infallible;
use std::io;
use toml::Value;

use crate::config::{ConfigScope, RetroConfig};
use crate::display::{Pacing, Terminal};
use crate::error::{ConfigError, FeedError};
use crate::feed::{FeedInstance, FeedRegistry};
use retrofeed_common::Sources;

pub const DEFAULT_TITLE: &str = "RETROFEED";

/// The one-off card shown before the first feed
#[derive(Debug, Clone)]
pub struct TitleCard {
    pub title: String,
    pub version: String,
    pub credit: String,
    pacing: Pacing,
}

impl TitleCard {
    pub fn from_scope(scope: &ConfigScope) -> Result<Self, ConfigError> {
        Ok(Self {
            title: text_or(scope, "title", DEFAULT_TITLE)?,
            version: text_or(scope, "version", env!("CARGO_PKG_VERSION"))?,
            credit: text_or(scope, "credit", "")?,
            pacing: Pacing::from_scope(scope)?,
        })
    }

    pub async fn show(&self, terminal: &mut Terminal) -> io::Result<()> {
        let headspace = "\n".repeat(self.pacing.line_width / 2 + 1);
        terminal.write_untimed(&headspace)?;

        let mut tty = terminal.typewriter(&self.pacing);
        tty.render_text(&format!("{} - VERSION {}", self.title, self.version), "\n")
            .await?;
        tty.render_text(&self.credit, "\n").await
    }
}

/// Strings pass through; numbers such as `version = 1.2` are shown as written
fn text_or(scope: &ConfigScope, key: &str, default: &str) -> Result<String, ConfigError> {
    match scope.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Integer(n)) => Ok(n.to_string()),
        Some(Value::Float(f)) => Ok(f.to_string()),
        Some(_) => Err(ConfigError::invalid(key, "a string")),
    }
}

pub struct Sequencer {
    title: TitleCard,
    feeds: Vec<FeedInstance>,
    order: Vec<usize>,
}

impl Sequencer {
    pub fn build(
        config: &RetroConfig,
        registry: &FeedRegistry,
        sources: &Sources,
    ) -> Result<Self, ConfigError> {
        if config.sequence.is_empty() {
            return Err(ConfigError::invalid("sequence", "a non-empty list of feed names"));
        }

        let title = TitleCard::from_scope(&config.base_scope())?;
        let base_layer = config.feed_base_layer();

        let mut feeds = Vec::new();
        let mut order = Vec::with_capacity(config.sequence.len());
        let mut built: HashMap<&str, usize> = HashMap::new();

        for name in &config.sequence {
            if let Some(&index) = built.get(name.as_str()) {
                order.push(index);
                continue;
            }
            let section = config
                .feeds
                .get(name)
                .ok_or_else(|| ConfigError::UndefinedFeed { name: name.clone() })?;
            let feed = registry.build(name, &base_layer, section, sources)?;

            let index = feeds.len();
            feeds.push(feed);
            built.insert(name, index);
            order.push(index);
        }

        tracing::info!(
            "Playlist ready: {} entries, {} distinct feeds",
            order.len(),
            feeds.len()
        );
        Ok(Self { title, feeds, order })
    }

    pub fn title(&self) -> &TitleCard {
        &self.title
    }

    /// Distinct feed instances, in order of first appearance
    pub fn feeds(&self) -> &[FeedInstance] {
        &self.feeds
    }

    /// Feed names in playback order
    pub fn playlist(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.feeds[i].name()).collect()
    }

    /// Show every playlist entry once, in order
    pub async fn play_once(&mut self, terminal: &mut Terminal) -> Result<(), FeedError> {
        for &index in &self.order {
            let feed = &mut self.feeds[index];
            tracing::debug!("Showing feed '{}'", feed.name());
            feed.show(terminal).await?;
        }
        Ok(())
    }

    /// Clear the screen, show the title card, then cycle the playlist until
    /// something fails
    pub async fn run(&mut self, terminal: &mut Terminal) -> Result<Infallible, FeedError> {
        terminal.clear()?;
        self.title.show(terminal).await?;
        loop {
            self.play_once(terminal).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::capture_terminal;
    use crate::feed::testing::stub_sources;

    const BASE: &str = r#"
[base]
line_width = 40
print_delay = 0.0
newline_delay = 0.0
pause_time = 0.0
subsegment_delay = 0.0
segment_delay = 0.0
refresh = 15
verbose_updates = true
"#;

    fn config(body: &str) -> RetroConfig {
        // Top-level keys must come before the first table
        RetroConfig::parse(&format!("{}\n{}", body, BASE), "test.toml").unwrap()
    }

    fn sequencer(body: &str) -> Sequencer {
        let registry = FeedRegistry::with_builtin_feeds();
        Sequencer::build(&config(body), &registry, &stub_sources()).unwrap()
    }

    #[test]
    fn test_repeated_names_share_an_instance() {
        let seq = sequencer(
            r#"
sequence = ["clock", "news", "clock", "news", "clock"]
[clock]
feed_class = "DatetimeFeed"
[news]
feed_class = "NewsFeed"
"#,
        );
        assert_eq!(seq.feeds().len(), 2);
        assert_eq!(seq.playlist(), vec!["clock", "news", "clock", "news", "clock"]);
    }

    #[test]
    fn test_title_card_defaults() {
        let seq = sequencer(
            r#"
sequence = ["clock"]
[clock]
feed_class = "DatetimeFeed"
"#,
        );
        assert_eq!(seq.title().title, DEFAULT_TITLE);
        assert_eq!(seq.title().version, env!("CARGO_PKG_VERSION"));
        assert_eq!(seq.title().credit, "");
    }

    #[tokio::test]
    async fn test_title_card_layout() {
        let mut base: toml::Table = toml::from_str(BASE).unwrap();
        let mut layer = base.remove("base").unwrap().as_table().unwrap().clone();
        layer.insert("line_width".into(), Value::Integer(20));
        layer.insert("title".into(), Value::String("TELETYPE".into()));
        layer.insert("version".into(), Value::Float(1.5));
        layer.insert("credit".into(), Value::String("by the night shift".into()));
        let scope = ConfigScope::resolve(&layer, &toml::Table::new());
        let card = TitleCard::from_scope(&scope).unwrap();

        let (mut terminal, buffer) = capture_terminal();
        card.show(&mut terminal).await.unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 14);
        assert!(lines[..11].iter().all(|l| l.is_empty()));
        // Wider than the display, so it wraps
        assert_eq!(lines[11], "TELETYPE - VERSION");
        assert_eq!(lines[12], "1.5");
        assert_eq!(lines[13], "by the night shift");
    }

    #[test]
    fn test_build_errors() {
        let registry = FeedRegistry::with_builtin_feeds();
        let sources = stub_sources();

        let empty = config("sequence = []");
        assert!(matches!(
            Sequencer::build(&empty, &registry, &sources),
            Err(ConfigError::Invalid { .. })
        ));

        let unknown = config(
            r#"
sequence = ["horoscope"]
[horoscope]
feed_class = "HoroscopeFeed"
"#,
        );
        assert!(matches!(
            Sequencer::build(&unknown, &registry, &sources),
            Err(ConfigError::UnknownFeedClass { .. })
        ));
    }

    #[tokio::test]
    async fn test_shared_news_rotation_continues() {
        let mut seq = sequencer(
            r#"
sequence = ["news", "news"]
[news]
feed_class = "NewsFeed"
items = 2
"#,
        );
        let (mut terminal, buffer) = capture_terminal();
        seq.play_once(&mut terminal).await.unwrap();

        let headlines: Vec<String> = buffer
            .lines()
            .into_iter()
            .filter(|l| l.starts_with("Headline"))
            .collect();
        // First pass picks 1 and 3; the same cursor then moves to 4 and wraps to 0
        assert_eq!(headlines, vec!["Headline 1", "Headline 3", "Headline 4", "Headline 0"]);
    }

    #[tokio::test]
    async fn test_playlist_renders_each_feed() {
        let mut seq = sequencer(
            r#"
sequence = ["weather", "markets", "iss"]

[weather]
feed_class = "WeatherFeed"
lat = 45.52
lon = -122.68
location = "Portland"
periods = 2
header = ["=", "Weather", "="]

[markets]
feed_class = "FinanceFeed"
header = ["$", "Markets", "$"]
update_message = "Calling the exchange"

[iss]
feed_class = "ISSFeed"
country = "United_States"
region = "Washington"
city = "Seattle"
"#,
        );
        let (mut terminal, buffer) = capture_terminal();
        seq.play_once(&mut terminal).await.unwrap();
        let lines = buffer.lines();

        let expect_in_order = [
            "============== WEATHER ==============",
            "Weather at Portland",
            "    Temperature  52°F (11°C)",
            "******** EXTENDED FORECAST... ********",
            "Tonight",
            "Wednesday",
            "[Calling the exchange...]",
            "$$$$$$$$$$$$$$ MARKETS $$$$$$$$$$$$$$",
            "Market is CLOSED for holiday",
            "No ISS Sightings Available",
        ];
        let mut from = 0;
        for expected in expect_in_order {
            let found = lines[from..]
                .iter()
                .position(|l| l == expected)
                .unwrap_or_else(|| panic!("missing {expected:?} after line {from}: {lines:#?}"));
            from += found + 1;
        }

        // Data is fresh on the second pass, so no banner
        let before = buffer.contents().matches("[Calling the exchange").count();
        seq.play_once(&mut terminal).await.unwrap();
        assert_eq!(buffer.contents().matches("[Calling the exchange").count(), before);
    }
}
