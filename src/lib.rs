//! Paste-Trawler: link discovery over a paste site's random-ID space
//!
//! This crate probes randomly generated paste URLs, hands every page that
//! exists to a registry of per-service modules, and records the live
//! cloud-storage links those modules validate and enrich.

pub mod config;
pub mod discovery;
pub mod entry;
pub mod modules;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Paste-Trawler operations
#[derive(Debug, Error)]
pub enum TrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::LoopState,
        to: state::LoopState,
    },
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

    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),

    #[error("Unknown service module: {0}")]
    UnknownModule(String),
}

/// Result type alias for Paste-Trawler operations
pub type Result<T> = std::result::Result<T, TrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use entry::{ContentType, Entry};
pub use state::{LoopState, ShutdownState};
