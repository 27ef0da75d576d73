//! Host configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use dice_duel::Temperament;
use std::path::PathBuf;

/// Default capacity of each session inbox
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Complete host configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// JSON file with bot behaviour profiles
    pub profiles_path: Option<PathBuf>,
    /// Capacity of each session inbox
    pub channel_capacity: usize,
    /// Whether sessions wait out the advisory delay before replying
    pub apply_delays: bool,
    /// Base seed for replayable sessions
    pub seed: Option<u64>,
    /// Temperament used for bots without a configured profile
    pub default_temperament: Temperament,
}

/// CLI overrides, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profiles_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub no_delay: bool,
}

impl HostConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values given on the command line
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but invalid
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(env: F, overrides: Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HostConfig::default();

        let profiles_path = overrides
            .profiles_path
            .or_else(|| env("DD_PROFILES").map(PathBuf::from));

        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => env("DD_SEED")
                .map(|v| {
                    v.parse::<u64>().map_err(|_| ConfigError::Invalid {
                        var: "DD_SEED".to_string(),
                        reason: format!("Not an unsigned integer: {v}"),
                    })
                })
                .transpose()?,
        };

        let default_temperament = match env("DD_DEFAULT_TEMPERAMENT") {
            Some(v) => v
                .parse::<Temperament>()
                .map_err(|reason| ConfigError::Invalid {
                    var: "DD_DEFAULT_TEMPERAMENT".to_string(),
                    reason,
                })?,
            None => defaults.default_temperament,
        };

        let apply_delays =
            !overrides.no_delay && parse_env_or(&env, "DD_APPLY_DELAYS", defaults.apply_delays);

        Ok(HostConfig {
            profiles_path,
            channel_capacity: parse_env_or(&env, "DD_CHANNEL_CAPACITY", defaults.channel_capacity),
            apply_delays,
            seed,
            default_temperament,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        // mpsc::channel panics on zero capacity
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "DD_CHANNEL_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if let Some(path) = &self.profiles_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid {
                    var: "DD_PROFILES".to_string(),
                    reason: "Path is empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            profiles_path: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            apply_delays: true,
            seed: None,
            default_temperament: Temperament::Balanced,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_env_or<F, T>(env: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    env(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
