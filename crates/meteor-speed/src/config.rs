//! # Configuration System
//!
//! YAML configuration for the estimator and its logging.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `METEOR_SPEED_CONFIG` environment variable
//! 2. `./meteor-speed.yaml` (current directory)
//! 3. `~/.config/meteor-speed/config.yaml` (user config)
//! 4. `/etc/meteor-speed/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! estimator:
//!   refresh_duration_ms: 40.0
//!   dist_per_pixel_m: 850.0
//!   min_peak_magnitude: 0.5
//!   interpolate: true
//!
//! logging:
//!   level: debug
//!   format: compact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::estimator::{EstimatorConfig, MeteorSpeedEstimator};
use crate::observe::LogConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "METEOR_SPEED_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read or write configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    /// Configuration version
    pub version: String,
    /// Estimator parameters
    pub estimator: EstimatorConfig,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            estimator: EstimatorConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl MeteorConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = Path::new(&path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} points to {}",
                    CONFIG_ENV_VAR,
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        Self::load_first(&Self::config_search_paths())
    }

    /// Load the first existing file among `paths`, or defaults if none exist.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./meteor-speed.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "meteor-speed") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/meteor-speed/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Build an estimator from the estimator section.
    pub fn estimator(&self) -> MeteorSpeedEstimator {
        MeteorSpeedEstimator::new(self.estimator.clone())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            estimator: EstimatorConfig {
                refresh_duration_ms: 40.0,
                dist_per_pixel_m: 850.0,
                min_peak_magnitude: Some(0.5),
                interpolate: true,
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};

    #[test]
    fn test_default_config() {
        let config = MeteorConfig::default();
        assert_eq!(config.estimator.refresh_duration_ms, 100.0);
        assert_eq!(config.estimator.dist_per_pixel_m, 1000.0);
        assert!(config.estimator.min_peak_magnitude.is_none());
        assert!(!config.estimator.interpolate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
estimator:
  refresh_duration_ms: 40.0
  dist_per_pixel_m: 2.5e2
  min_peak_magnitude: 0.3
  interpolate: true

logging:
  level: debug
  format: json
"#;

        let config = MeteorConfig::parse(yaml).unwrap();
        assert_eq!(config.estimator.refresh_duration_ms, 40.0);
        assert_eq!(config.estimator.dist_per_pixel_m, 250.0);
        assert_eq!(config.estimator.min_peak_magnitude, Some(0.3));
        assert!(config.estimator.interpolate);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
estimator:
  dist_per_pixel_m: 12.0
"#;

        let config = MeteorConfig::parse(yaml).unwrap();
        assert_eq!(config.estimator.dist_per_pixel_m, 12.0);
        // Defaults should be applied
        assert_eq!(config.estimator.refresh_duration_ms, 100.0);
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = MeteorConfig::parse("estimator:\n  refresh_duration_ms: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = MeteorConfig::parse("estimator:\n  dist_per_pixel_m: -3\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = MeteorConfig::parse("estimator: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = MeteorConfig::default();
        config.estimator.min_peak_magnitude = Some(f64::NAN);
        assert!(config.validate().is_err());

        config.estimator.min_peak_magnitude = Some(-1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_yaml() {
        let yaml = MeteorConfig::example_yaml();
        assert!(yaml.contains("estimator:"));
        assert!(yaml.contains("logging:"));
        let parsed = MeteorConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.estimator.refresh_duration_ms, 40.0);
        assert!(parsed.estimator.interpolate);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meteor.yaml");

        let mut config = MeteorConfig::default();
        config.estimator.dist_per_pixel_m = 640.0;
        config.save(&path).unwrap();

        let loaded = MeteorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MeteorConfig::load_from(Path::new("/nonexistent/meteor.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_load_first_picks_existing_or_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        let present = dir.path().join("present.yaml");

        assert_eq!(
            MeteorConfig::load_first(&[missing.clone()]).unwrap(),
            MeteorConfig::default()
        );

        std::fs::write(&present, "estimator:\n  dist_per_pixel_m: 75.0\n").unwrap();
        let loaded = MeteorConfig::load_first(&[missing, present]).unwrap();
        assert_eq!(loaded.estimator.dist_per_pixel_m, 75.0);
    }

    // Both env-var cases share one test: the variable is process-global.
    #[test]
    fn test_load_from_env_var() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.yaml");
        std::fs::write(&path, "estimator:\n  refresh_duration_ms: 25.0\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let loaded = MeteorConfig::load();

        std::env::set_var(CONFIG_ENV_VAR, dir.path().join("gone.yaml"));
        let missing = MeteorConfig::load();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(loaded.unwrap().estimator.refresh_duration_ms, 25.0);
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = MeteorConfig::config_search_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("meteor-speed.yaml"));
    }

    #[test]
    fn test_estimator_from_config() {
        let config = MeteorConfig::parse("estimator:\n  refresh_duration_ms: 50.0\n").unwrap();
        let estimator = config.estimator();
        assert_eq!(estimator.config().refresh_duration_ms, 50.0);
    }
}
