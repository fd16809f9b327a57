use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use toml::{Table, Value};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level tables that `sequence` cannot name as feeds
pub const RESERVED_NAMES: &[&str] = &["base", "logging", "sequence"];

/// Keys that only make sense for a single feed. A value for them in `[base]`
/// is ignored so that every feed starts without a header or update banner.
pub const FEED_LOCAL_KEYS: &[&str] = &["header", "update_message"];

/// The parsed configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct RetroConfig {
    /// Playback order, by feed section name. Names may repeat.
    pub sequence: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings shared by every feed
    pub base: Table,

    /// One section per named feed
    #[serde(flatten)]
    pub feeds: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

impl RetroConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse configuration text; `origin` only labels errors
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: RetroConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;

        for name in &config.sequence {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::ReservedName { name: name.clone() });
            }
            if !config.feeds.contains_key(name) {
                return Err(ConfigError::UndefinedFeed { name: name.clone() });
            }
        }

        Ok(config)
    }

    /// The base layer as seen by feeds: feed-local keys removed
    pub fn feed_base_layer(&self) -> Table {
        let mut layer = self.base.clone();
        for key in FEED_LOCAL_KEYS {
            if layer.remove(*key).is_some() {
                tracing::debug!("Ignoring '{}' in [base]; it only applies per feed", key);
            }
        }
        layer
    }

    /// Scope for the title card, which reads the base layer directly
    pub fn base_scope(&self) -> ConfigScope {
        ConfigScope::resolve(&self.base, &Table::new())
    }
}

/// A feed's effective settings: a flat, immutable key/value mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigScope {
    values: Table,
}

impl ConfigScope {
    /// Merge `overrides` on top of `base`. Overriding keys win; the rest of
    /// `base` carries through unchanged.
    pub fn resolve(base: &Table, overrides: &Table) -> Self {
        let mut values = base.clone();
        for (key, value) in overrides {
            values.insert(key.clone(), value.clone());
        }
        Self { values }
    }

    /// Resolve with an extra layer of defaults beneath `base`
    pub fn resolve_with_defaults(defaults: &Table, base: &Table, overrides: &Table) -> Self {
        let layered = Self::resolve(defaults, base);
        Self::resolve(&layered.values, overrides)
    }

    pub fn get_all(&self) -> &Table {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn require(&self, key: &str) -> Result<&Value, ConfigError> {
        self.values.get(key).ok_or_else(|| ConfigError::missing(key))
    }

    pub fn str(&self, key: &str) -> Result<&str, ConfigError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| ConfigError::invalid(key, "a string"))
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| ConfigError::invalid(key, "a string")),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| ConfigError::invalid(key, "true or false"))
    }

    pub fn usize(&self, key: &str) -> Result<usize, ConfigError> {
        self.require(key)?
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ConfigError::invalid(key, "a non-negative integer"))
    }

    pub fn f64(&self, key: &str) -> Result<f64, ConfigError> {
        match self.require(key)? {
            Value::Float(f) => Ok(*f),
            Value::Integer(n) => Ok(*n as f64),
            _ => Err(ConfigError::invalid(key, "a number")),
        }
    }

    /// A non-negative number of seconds
    pub fn seconds(&self, key: &str) -> Result<Duration, ConfigError> {
        let secs = self.f64(key)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| ConfigError::invalid(key, "a non-negative number of seconds"))
    }

    /// A non-negative number of minutes
    pub fn minutes(&self, key: &str) -> Result<Duration, ConfigError> {
        let minutes = self.f64(key)?;
        Duration::try_from_secs_f64(minutes * 60.0)
            .map_err(|_| ConfigError::invalid(key, "a non-negative number of minutes"))
    }

    pub fn str_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        let array = self
            .require(key)?
            .as_array()
            .ok_or_else(|| ConfigError::invalid(key, "a list of strings"))?;
        array
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ConfigError::invalid(key, "a list of strings"))
            })
            .collect()
    }

    /// A `[left_marker, title, right_marker]` triple, if configured
    pub fn header(&self, key: &str) -> Result<Option<Header>, ConfigError> {
        if self.values.get(key).is_none() {
            return Ok(None);
        }
        match self.str_list(key)?.as_slice() {
            [left, title, right] => Ok(Some(Header::new(left, title, right))),
            _ => Err(ConfigError::invalid(key, "a [left, title, right] list")),
        }
    }
}

/// A segment header: a title centred between two runs of marker characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub left_marker: String,
    pub title: String,
    pub right_marker: String,
}

impl Header {
    pub fn new(left_marker: &str, title: &str, right_marker: &str) -> Self {
        Self {
            left_marker: left_marker.to_string(),
            title: title.to_string(),
            right_marker: right_marker.to_string(),
        }
    }
}

/// Lay out `header` for a display `line_width` characters wide.
///
/// The title is trimmed and uppercased. Markers fill the remaining width
/// evenly; when the title plus four characters of padding does not fit,
/// no markers are drawn.
pub fn build_header(header: &Header, line_width: usize) -> String {
    let title = header.title.trim().to_uppercase();
    let title_len = title.chars().count();

    let num_markers = if title_len + 4 < line_width {
        (line_width - 4 - title_len) / 2
    } else {
        0
    };

    format!(
        "{} {} {}",
        header.left_marker.repeat(num_markers),
        title,
        header.right_marker.repeat(num_markers)
    )
}
