use std::time::Duration;

/// Default lifetime of a `wsu:Timestamp` when no expiry is given.
pub const DEFAULT_TIMESTAMP_TTL: Duration = Duration::from_secs(60);

/// Default number of random characters hashed into each nonce.
pub const DEFAULT_NONCE_ENTROPY: usize = 100;

/// Predefined configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// The WS-Security customary defaults.
    ///
    /// - Timestamp TTL: 60 seconds
    /// - Nonce entropy: 100 characters
    Standard,

    /// Longer validity for slow or high-latency services.
    ///
    /// - Timestamp TTL: 5 minutes
    /// - Nonce entropy: 100 characters
    Relaxed,

    /// Short validity window to minimize replay exposure.
    ///
    /// - Timestamp TTL: 30 seconds
    /// - Nonce entropy: 100 characters
    Strict,

    /// Load configuration from environment variables.
    ///
    /// Reads configuration from:
    /// - `WSSE_TIMESTAMP_TTL`: Timestamp TTL in seconds (default: 60)
    /// - `WSSE_NONCE_ENTROPY`: Nonce entropy length (default: 100)
    FromEnv,
}

/// Configuration for WS-Security header generation.
///
/// # Environment Variables
///
/// - `WSSE_TIMESTAMP_TTL`: Timestamp TTL in seconds (default: 60)
/// - `WSSE_NONCE_ENTROPY`: Nonce entropy length (default: 100)
///
/// # Example
///
/// ```rust
/// use wsse_header::{ConfigPreset, WsseConfig};
/// use std::time::Duration;
///
/// let config = WsseConfig::from(ConfigPreset::Strict);
/// assert_eq!(config.timestamp_ttl, Duration::from_secs(30));
///
/// let config = WsseConfig {
///     timestamp_ttl: Duration::from_secs(120),
///     nonce_entropy: 64,
/// };
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct WsseConfig {
    /// Offset of `wsu:Expires` from `wsu:Created` when no expiry is set
    pub timestamp_ttl: Duration,
    /// Random characters hashed into each nonce
    pub nonce_entropy: usize,
}

impl Default for WsseConfig {
    fn default() -> Self {
        Self {
            timestamp_ttl: std::env::var("WSSE_TIMESTAMP_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMESTAMP_TTL),
            nonce_entropy: std::env::var("WSSE_NONCE_ENTROPY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_NONCE_ENTROPY),
        }
    }
}

impl WsseConfig {
    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.timestamp_ttl.as_secs() < 10 {
            warnings.push(
                "Very short timestamp TTL (< 10 seconds) may cause clock sync issues".to_string(),
            );
        }
        if self.timestamp_ttl.as_secs() > 600 {
            warnings.push(
                "Long timestamp TTL (> 10 minutes) may increase replay attack risk".to_string(),
            );
        }
        if self.nonce_entropy < 16 {
            warnings.push("Low nonce entropy (< 16 characters) weakens replay protection".to_string());
        }

        warnings
    }

    /// Returns a summary of the current configuration.
    pub fn summary(&self) -> String {
        format!(
            "WsseConfig {{ Timestamp TTL: {}s, Nonce Entropy: {} }}",
            self.timestamp_ttl.as_secs(),
            self.nonce_entropy,
        )
    }
}

impl From<ConfigPreset> for WsseConfig {
    fn from(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Standard => Self {
                timestamp_ttl: DEFAULT_TIMESTAMP_TTL,
                nonce_entropy: DEFAULT_NONCE_ENTROPY,
            },
            ConfigPreset::Relaxed => Self {
                timestamp_ttl: Duration::from_secs(300),
                nonce_entropy: DEFAULT_NONCE_ENTROPY,
            },
            ConfigPreset::Strict => Self {
                timestamp_ttl: Duration::from_secs(30),
                nonce_entropy: DEFAULT_NONCE_ENTROPY,
            },
            ConfigPreset::FromEnv => Self::default(),
        }
    }
}
