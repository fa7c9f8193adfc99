use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("section {section} not found in {path}")]
    MissingSection { section: String, path: String },

    #[error("timer must be a non-negative number of seconds within range, got {0}")]
    InvalidTimer(f64),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("cannot parse published date {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
