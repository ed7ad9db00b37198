use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub silence: SilenceConfig,
    pub service: ServiceConfig,
    pub retry: RetryConfig,
}

/// Silence detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SilenceConfig {
    pub threshold_dbfs: f32,
    pub min_silence_ms: u32,
    pub keep_silence_ms: u32,
}

/// Recognition service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language: String,
    pub timeout_secs: u64,
}

/// Retry protocol configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold_dbfs: defaults::SILENCE_THRESHOLD_DBFS,
            min_silence_ms: defaults::MIN_SILENCE_MS,
            keep_silence_ms: defaults::KEEP_SILENCE_MS,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::SERVICE_ENDPOINT.to_string(),
            api_key: None,
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            timeout_secs: defaults::SERVICE_TIMEOUT_SECS,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay_ms: defaults::RETRY_BASE_DELAY.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - AUDIOSCRIBE_ENDPOINT → service.endpoint
    /// - AUDIOSCRIBE_API_KEY → service.api_key
    /// - AUDIOSCRIBE_LANGUAGE → service.language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("AUDIOSCRIBE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.service.endpoint = endpoint;
        }

        if let Ok(api_key) = std::env::var("AUDIOSCRIBE_API_KEY")
            && !api_key.is_empty()
        {
            self.service.api_key = Some(api_key);
        }

        if let Ok(language) = std::env::var("AUDIOSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.service.language = language;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/audioscribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("audioscribe")
            .join("config.toml")
    }
}
