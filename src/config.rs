use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Name of the table holding the settings
pub const SECTION: &str = "common";

/// Separator used by the `rss_feeds` and `search_strings` lists
pub const LIST_DELIMITER: &str = " | ";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub feeds: Vec<String>,
    pub keywords: Vec<String>,
    pub webhook_url: String,
    /// Pause between polling passes, in seconds
    pub timer: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    common: Option<CommonSection>,
}

#[derive(Debug, Deserialize)]
struct CommonSection {
    rss_feeds: String,
    search_strings: String,
    webhook_url: String,
    #[serde(default = "default_timer")]
    timer: f64,
}

fn default_timer() -> f64 {
    3600.0
}

fn split_list(value: &str) -> Vec<String> {
    value.split(LIST_DELIMITER).map(str::to_string).collect()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let common = raw.common.ok_or_else(|| ConfigError::MissingSection {
            section: SECTION.to_string(),
            path: origin.to_string(),
        })?;

        let config = Config {
            feeds: split_list(&common.rss_feeds),
            keywords: split_list(&common.search_strings),
            webhook_url: common.webhook_url,
            timer: common.timer,
        };
        config.interval()?;

        Ok(config)
    }

    /// Fails for negative, non-finite, or out-of-range timers.
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.timer)
            .map_err(|_| ConfigError::InvalidTimer(self.timer))
    }
}
