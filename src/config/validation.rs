use crate::config::types::{ClassifierConfig, Config, DiscoveryConfig, FetchConfig, ModulesConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Placeholder replaced by the generated identifier in the URL template
pub const ID_PLACEHOLDER: &str = "{id}";

/// Largest alphabet the candidate generator accepts
pub const MAX_ALPHABET_LEN: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_discovery_config(&config.discovery)?;
    validate_fetch_config(&config.fetch)?;
    validate_classifier_config(&config.classifier)?;
    validate_modules_config(&config.modules)?;
    Ok(())
}

/// Validates discovery loop configuration
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    validate_url_template(&config.url_template)?;

    if config.id_length < 1 {
        return Err(ConfigError::Validation(
            "id_length must be >= 1".to_string(),
        ));
    }

    validate_alphabet(&config.alphabet)?;

    if config.tick_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "tick_ms must be >= 1ms, got {}ms",
            config.tick_ms
        )));
    }

    Ok(())
}

/// Validates a paste URL template
///
/// The template must contain `{id}` and must become an http(s) URL once a
/// sample identifier is substituted.
fn validate_url_template(template: &str) -> Result<(), ConfigError> {
    if !template.contains(ID_PLACEHOLDER) {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' does not contain the {} placeholder",
            template, ID_PLACEHOLDER
        )));
    }

    let sample = template.replace(ID_PLACEHOLDER, "abc12");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidTemplate(format!("'{}': {}", template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidTemplate(format!(
            "'{}' must use http or https",
            template
        )));
    }

    Ok(())
}

/// Validates the identifier alphabet
pub fn validate_alphabet(alphabet: &str) -> Result<(), ConfigError> {
    if alphabet.is_empty() {
        return Err(ConfigError::Validation(
            "alphabet cannot be empty".to_string(),
        ));
    }

    if !alphabet.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "alphabet must be ASCII, got '{}'",
            alphabet
        )));
    }

    if alphabet.len() > MAX_ALPHABET_LEN {
        return Err(ConfigError::Validation(format!(
            "alphabet must have at most {} characters, got {}",
            MAX_ALPHABET_LEN,
            alphabet.len()
        )));
    }

    let mut seen = HashSet::new();
    for c in alphabet.chars() {
        if !seen.insert(c) {
            return Err(ConfigError::Validation(format!(
                "alphabet contains duplicate character '{}'",
                c
            )));
        }
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates error classifier configuration
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.suspicion_threshold < 1 {
        return Err(ConfigError::Validation(
            "suspicion_threshold must be >= 1".to_string(),
        ));
    }

    if config.benign_patterns.iter().any(|p| p.is_empty()) {
        // An empty substring would match every error
        return Err(ConfigError::Validation(
            "benign_patterns cannot contain an empty pattern".to_string(),
        ));
    }

    Ok(())
}

/// Validates the enabled module list
fn validate_modules_config(config: &ModulesConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in &config.enabled {
        if !crate::modules::MODULE_NAMES.contains(&name.as_str()) {
            return Err(ConfigError::UnknownModule(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "module '{}' is enabled more than once",
                name
            )));
        }
    }
    Ok(())
}
