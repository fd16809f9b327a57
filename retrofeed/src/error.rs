use thiserror::Error;

/// Missing or malformed configuration. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing config key '{key}'")]
    Missing { key: String },

    #[error("config key '{key}' must be {expected}")]
    Invalid { key: String, expected: &'static str },

    #[error("sequence names '{name}' but no [{name}] section exists")]
    UndefinedFeed { name: String },

    #[error("feed '{name}' uses unknown feed_class '{class}'")]
    UnknownFeedClass { name: String, class: String },

    #[error("'{name}' is reserved and cannot be used as a feed name")]
    ReservedName { name: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::Missing { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, expected: &'static str) -> Self {
        ConfigError::Invalid {
            key: key.into(),
            expected,
        }
    }
}

/// Anything that stops the display loop
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed '{feed}' failed to fetch data: {source:#}")]
    Fetch {
        feed: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write to the display: {0}")]
    Display(#[from] std::io::Error),
}
