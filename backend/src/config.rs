//! Configuration management for the SmartIrrig server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SMARTIRRIG_ prefix

use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use shared::{
    validate_zone_seeds, ValidationError, ZoneSeed, DEFAULT_HISTORY_LIMIT,
    DEFAULT_TICK_INTERVAL_MS,
};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Simulation engine and scheduler configuration
    pub simulation: SimulationConfig,

    /// Where readings come from
    pub source: SourceConfig,

    /// Zone seed list; the built-in zones are used when empty
    #[serde(default)]
    pub zones: Vec<ZoneSeed>,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    #[validate(length(min = 1))]
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Interval between two refresh cycles (ms)
    pub tick_interval_ms: u64,

    /// Readings kept per zone (24 hourly points, or 50 for the dense variant)
    pub history_limit: usize,

    /// Pre-populate a day of diurnal history at startup
    pub seed_history: bool,

    /// Start the scheduler as soon as the server boots
    pub autostart: bool,

    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
}

/// Reading source selection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// In-process random-walk simulator
    Simulated,
    /// Poll a remote irrigation backend
    Remote,
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Simulated => write!(f, "simulated"),
            SourceMode::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct SourceConfig {
    pub mode: SourceMode,

    /// Base URL of the remote irrigation backend
    #[validate(url)]
    pub base_url: String,

    /// Per-request timeout for the remote backend (seconds)
    pub timeout_secs: u64,

    /// Push a synthesized device sample per zone before each poll
    pub feed_backend: bool,
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Invalid zone list: {0}")]
    Zones(#[from] ValidationError),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigLoadError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigLoadError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let environment =
            std::env::var("SMARTIRRIG_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("simulation.tick_interval_ms", DEFAULT_TICK_INTERVAL_MS)?
            .set_default("simulation.history_limit", DEFAULT_HISTORY_LIMIT as u64)?
            .set_default("simulation.seed_history", true)?
            .set_default("simulation.autostart", true)?
            .set_default("source.mode", "simulated")?
            .set_default("source.base_url", "http://127.0.0.1:8000")?
            .set_default("source.timeout_secs", 5)?
            .set_default("source.feed_backend", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SMARTIRRIG_ prefix)
            .add_source(
                Environment::with_prefix("SMARTIRRIG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section, including the zone seeds
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.server.validate()?;
        self.source.validate()?;
        check_range("server.port", u64::from(self.server.port), 1, u64::from(u16::MAX))?;
        check_range("simulation.tick_interval_ms", self.simulation.tick_interval_ms, 100, 3_600_000)?;
        check_range("simulation.history_limit", self.simulation.history_limit as u64, 1, 10_000)?;
        check_range("source.timeout_secs", self.source.timeout_secs, 1, 300)?;
        if !self.zones.is_empty() {
            validate_zone_seeds(&self.zones)?;
        }
        Ok(())
    }

    /// Configured zones, falling back to the built-in seed list
    pub fn zone_seeds(&self) -> Vec<ZoneSeed> {
        if self.zones.is_empty() {
            shared::default_zone_seeds()
        } else {
            self.zones.clone()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            seed_history: true,
            autostart: true,
            rng_seed: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Simulated,
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 5,
            feed_backend: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            source: SourceConfig::default(),
            zones: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CropType;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_tick_interval_too_small() {
        let mut config = Config::default();
        config.simulation.tick_interval_ms = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::OutOfRange { field: "simulation.tick_interval_ms", .. })
        ));
    }

    #[test]
    fn test_bad_base_url() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn test_history_limit_zero() {
        let mut config = Config::default();
        config.simulation.history_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_zone_ids_rejected() {
        let mut config = Config::default();
        config.zones = vec![
            ZoneSeed::new("a", "A", CropType::Corn, 1.0),
            ZoneSeed::new("a", "B", CropType::Corn, 1.0),
        ];
        assert!(matches!(config.validate(), Err(ConfigLoadError::Zones(_))));
    }

    #[test]
    fn test_zone_seeds_fallback() {
        let config = Config::default();
        assert_eq!(config.zone_seeds(), shared::default_zone_seeds());
    }

    #[test]
    fn test_source_mode_parsing() {
        let mode: SourceMode = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(mode, SourceMode::Remote);
        assert_eq!(mode.to_string(), "remote");
    }
}
