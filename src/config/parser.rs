use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use paste_trawler::config::load_config;
///
/// let config = load_config(Path::new("trawler.toml")).unwrap();
/// println!("Tick: {}ms", config.discovery.tick_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be tied back to the exact config it used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[discovery]
url-template = "https://paste.example/{id}/raw"
id-length = 6
tick-ms = 25
max-in-flight = 200

[fetch]
timeout-secs = 5

[classifier]
benign-patterns = ["reset", "EOF"]
suspicion-threshold = 3

[modules]
enabled = ["gofile", "mega"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.discovery.url_template, "https://paste.example/{id}/raw");
        assert_eq!(config.discovery.id_length, 6);
        assert_eq!(config.discovery.tick_ms, 25);
        assert_eq!(config.discovery.max_in_flight, 200);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.classifier.suspicion_threshold, 3);
        assert_eq!(config.modules.enabled, vec!["gofile", "mega"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.discovery.id_length, 5);
        assert_eq!(config.discovery.tick_ms, 10);
        assert_eq!(config.discovery.max_in_flight, 0);
        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.classifier.suspicion_threshold, 1);
        assert_eq!(config.modules.enabled.len(), crate::modules::MODULE_NAMES.len());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[discovery]\nid-length = 8\n").unwrap();
        assert_eq!(config.discovery.id_length, 8);
        assert_eq!(config.discovery.alphabet, crate::config::DEFAULT_ALPHABET);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/trawler.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[discovery]\nid-length = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("[discovery]\n");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[discovery]\ntick-ms = 1\n");
        let file2 = create_temp_config("[discovery]\ntick-ms = 2\n");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
