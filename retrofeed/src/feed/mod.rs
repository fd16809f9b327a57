///! Feed lifecycle
///!
///! A feed is a named [`FeedSource`] wrapped in a [`FeedInstance`]. The
///! instance owns the settings and the current content and runs the same
///! cycle for every kind of feed: refresh if stale, rebuild content, then
///! type header and content onto the terminal.

pub mod clock;
pub mod finance;
pub mod iss;
pub mod news;
pub mod registry;
pub mod weather;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::time::Duration;

use crate::config::{ConfigScope, Header, build_header};
use crate::display::{Pacing, Terminal};
use crate::error::{ConfigError, FeedError};

pub use registry::FeedRegistry;

/// What a content builder may look at besides its own data
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: DateTime<Local>,
    pub line_width: usize,
}

/// The two steps that differ between kinds of feed
#[async_trait]
pub trait FeedSource: Send {
    /// When the current snapshot was fetched; `None` if never
    fn fetched_on(&self) -> Option<DateTime<Local>>;

    /// Feeds that derive everything from the wall clock opt out of refreshing
    fn refreshes(&self) -> bool {
        true
    }

    /// Replace the snapshot with a fresh one from the data source
    async fn fetch(&mut self) -> anyhow::Result<()>;

    /// Derive display lines from the snapshot. `""` renders as a pause row.
    fn build_content(&mut self, ctx: &RenderContext) -> Vec<String>;
}

/// Settings every feed reads, taken from its resolved scope once
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub pacing: Pacing,
    /// Minimum snapshot age before a refresh
    pub refresh: Duration,
    pub verbose_updates: bool,
    pub segment_delay: Duration,
    pub header: Option<Header>,
    pub update_message: Option<String>,
}

impl FeedSettings {
    pub fn from_scope(scope: &ConfigScope) -> Result<Self, ConfigError> {
        Ok(Self {
            pacing: Pacing::from_scope(scope)?,
            refresh: scope.minutes("refresh")?,
            verbose_updates: scope.bool("verbose_updates")?,
            segment_delay: scope.seconds("segment_delay")?,
            header: scope.header("header")?,
            update_message: scope.optional_str("update_message")?.map(str::to_string),
        })
    }
}

/// Whether data fetched at `fetched_on` is due for a refresh at `now`
pub fn is_stale(
    fetched_on: Option<DateTime<Local>>,
    now: DateTime<Local>,
    refresh: Duration,
) -> bool {
    match fetched_on {
        None => true,
        Some(fetched_on) => match (now - fetched_on).to_std() {
            Ok(age) => age >= refresh,
            // Fetched "in the future" (clock moved back): only stale if refresh is zero
            Err(_) => refresh.is_zero(),
        },
    }
}

/// One entry of the playlist
pub struct FeedInstance {
    name: String,
    settings: FeedSettings,
    source: Box<dyn FeedSource>,
    content: Vec<String>,
}

impl FeedInstance {
    pub fn new(
        name: impl Into<String>,
        settings: FeedSettings,
        source: Box<dyn FeedSource>,
    ) -> Self {
        Self {
            name: name.into(),
            settings,
            source,
            content: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Lines produced by the most recent render
    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Run one full display cycle
    pub async fn show(&mut self, terminal: &mut Terminal) -> Result<(), FeedError> {
        self.show_with_clock(terminal, Local::now).await
    }

    /// `clock` is read twice: once to decide whether to refresh, and again
    /// after the refresh for the time the content is built at
    pub(crate) async fn show_with_clock(
        &mut self,
        terminal: &mut Terminal,
        clock: impl Fn() -> DateTime<Local>,
    ) -> Result<(), FeedError> {
        {
            let mut tty = terminal.typewriter(&self.settings.pacing);
            tty.render_pause_row().await?;
            tty.render_pause_row().await?;
        }

        self.refresh(terminal, clock()).await?;

        let ctx = RenderContext {
            now: clock(),
            line_width: self.settings.pacing.line_width,
        };
        self.content = self.source.build_content(&ctx);

        let mut tty = terminal.typewriter(&self.settings.pacing);
        if let Some(header) = &self.settings.header {
            let line = build_header(header, self.settings.pacing.line_width);
            tty.render_text(&line, "\n").await?;
        }
        tty.render_pause_row().await?;

        for line in &self.content {
            if line.is_empty() {
                tty.render_pause_row().await?;
            } else {
                tty.render_text(line, "\n").await?;
            }
        }
        tty.render_pause_row().await?;

        if !self.settings.segment_delay.is_zero() {
            tokio::time::sleep(self.settings.segment_delay).await;
        }
        Ok(())
    }

    async fn refresh(
        &mut self,
        terminal: &mut Terminal,
        now: DateTime<Local>,
    ) -> Result<(), FeedError> {
        if !self.source.refreshes() {
            return Ok(());
        }
        if !is_stale(self.source.fetched_on(), now, self.settings.refresh) {
            tracing::debug!("Feed '{}' is fresh, skipping refresh", self.name);
            return Ok(());
        }

        if self.settings.verbose_updates {
            if let Some(message) = &self.settings.update_message {
                terminal
                    .typewriter(&self.settings.pacing)
                    .render_update_banner(message)
                    .await?;
            }
        }

        tracing::info!("Refreshing feed '{}'", self.name);
        self.source.fetch().await.map_err(|source| {
            tracing::error!("Feed '{}' failed to refresh: {:#}", self.name, source);
            FeedError::Fetch {
                feed: self.name.clone(),
                source,
            }
        })
    }
}
