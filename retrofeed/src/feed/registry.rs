///! Feed registry: `feed_class` name → constructor
///!
///! Each kind registers a factory and the defaults it needs. Defaults sit
///! beneath the base layer, so `[base]` and the feed's own section both
///! override them.

use retrofeed_common::Sources;
use std::collections::HashMap;
use toml::Table;

use super::{FeedInstance, FeedSettings, FeedSource, clock, finance, iss, news, weather};
use crate::config::ConfigScope;
use crate::error::ConfigError;

pub type FeedFactory = fn(&ConfigScope, &Sources) -> Result<Box<dyn FeedSource>, ConfigError>;

#[derive(Clone, Copy)]
pub struct FeedKind {
    pub build: FeedFactory,
    pub defaults: fn() -> Table,
}

impl FeedKind {
    pub fn new(build: FeedFactory, defaults: fn() -> Table) -> Self {
        Self { build, defaults }
    }
}

#[derive(Default)]
pub struct FeedRegistry {
    kinds: HashMap<String, FeedKind>,
}

impl FeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every feed this crate ships
    pub fn with_builtin_feeds() -> Self {
        let mut registry = Self::new();
        registry.register("DatetimeFeed", FeedKind::new(clock::build, clock::defaults));
        registry.register("FinanceFeed", FeedKind::new(finance::build, finance::defaults));
        registry.register("NewsFeed", FeedKind::new(news::build, news::defaults));
        registry.register("WeatherFeed", FeedKind::new(weather::build, weather::defaults));
        registry.register("ISSFeed", FeedKind::new(iss::build, iss::defaults));
        registry
    }

    pub fn register(&mut self, class: impl Into<String>, kind: FeedKind) {
        self.kinds.insert(class.into(), kind);
    }

    pub fn contains(&self, class: &str) -> bool {
        self.kinds.contains_key(class)
    }

    /// Construct the feed named `name` from its config section
    pub fn build(
        &self,
        name: &str,
        base_layer: &Table,
        section: &Table,
        sources: &Sources,
    ) -> Result<FeedInstance, ConfigError> {
        let class = section
            .get("feed_class")
            .ok_or_else(|| ConfigError::missing(format!("{}.feed_class", name)))?
            .as_str()
            .ok_or_else(|| ConfigError::invalid(format!("{}.feed_class", name), "a string"))?;

        let kind = self.kinds.get(class).ok_or_else(|| ConfigError::UnknownFeedClass {
            name: name.to_string(),
            class: class.to_string(),
        })?;

        let scope = ConfigScope::resolve_with_defaults(&(kind.defaults)(), base_layer, section);
        let settings = FeedSettings::from_scope(&scope)?;
        let source = (kind.build)(&scope, sources)?;

        tracing::info!("Built feed '{}' ({})", name, class);
        Ok(FeedInstance::new(name, settings, source))
    }
}
