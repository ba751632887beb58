use serde::Deserialize;

/// Default paste URL template; `{id}` is replaced by the generated identifier
pub const DEFAULT_URL_TEMPLATE: &str = "https://rentry.co/{id}/raw";

/// Default identifier alphabet
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Main configuration structure for Paste-Trawler
///
/// Every section and key has a default, so an empty document (or no
/// config file at all) yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub fetch: FetchConfig,
    pub classifier: ClassifierConfig,
    pub modules: ModulesConfig,
}

/// Discovery loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Paste URL template containing the `{id}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,

    /// Length of each generated identifier
    #[serde(rename = "id-length")]
    pub id_length: usize,

    /// Characters identifiers are drawn from
    pub alphabet: String,

    /// Delay between probe launches (milliseconds)
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,

    /// Upper bound on in-flight probes; 0 leaves spawning unbounded
    #[serde(rename = "max-in-flight")]
    pub max_in_flight: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            id_length: 5,
            alphabet: DEFAULT_ALPHABET.to_string(),
            tick_ms: 10,
            max_in_flight: 0,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total request timeout (seconds); also bounds drain time
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 10,
            user_agent: format!("paste-trawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport error classification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Error-message substrings considered harmless network noise
    #[serde(rename = "benign-patterns")]
    pub benign_patterns: Vec<String>,

    /// Unrecognized errors tolerated before discovery stops
    #[serde(rename = "suspicion-threshold")]
    pub suspicion_threshold: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            benign_patterns: crate::discovery::DEFAULT_BENIGN_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            suspicion_threshold: 1,
        }
    }
}

/// Service module selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Enabled module names, in fan-out order
    pub enabled: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            enabled: crate::modules::MODULE_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}
