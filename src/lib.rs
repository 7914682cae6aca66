//! Employer Harvest: a polite employer-profile harvester
//!
//! This crate walks the paginated job listings of a job board, follows job
//! detail pages to discover the employers behind them, and scrapes each
//! employer profile page into a fixed-column record.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error(transparent)]
    Unavailable(#[from] Unavailable),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: String, column: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Connection error, timeout, or body read failure. Retryable.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status the caller does not accept. Never retried.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

impl FetchFailure {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// A URL could not be fetched; carries the last underlying cause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{url} unavailable after {attempts} attempt(s): {cause}")]
pub struct Unavailable {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub cause: FetchFailure,
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ExtractedProfile, ProfileField, SiteRules};
pub use state::{EmployerRecord, Registry};
