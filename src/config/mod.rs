//! Configuration module for Paste-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The file is optional: every key falls back to a default.
//!
//! # Example
//!
//! ```no_run
//! use paste_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Probing {}", config.discovery.url_template);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, DiscoveryConfig, FetchConfig, ModulesConfig, DEFAULT_ALPHABET,
    DEFAULT_URL_TEMPLATE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_alphabet, ID_PLACEHOLDER, MAX_ALPHABET_LEN};
