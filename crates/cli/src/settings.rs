//! Layered settings for the CLI.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (`benchdelta.toml` in the working directory or `--config`), then
//! `BENCHDELTA_*` environment variables. Command-line flags are applied on
//! top by the caller.

use benchdelta_compare::io::OutputFormat;
use benchdelta_core::DEFAULT_THRESHOLD_PERCENT;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "benchdelta";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "BENCHDELTA";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying config source failed.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid setting `{key}`: {reason}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Effective CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Changes within +/- this many percent are `unchanged`.
    pub threshold_percent: f64,
    /// Directory for report files; defaults to the results base path.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Report files to write.
    pub format: OutputFormat,
    /// Log level for benchdelta crates.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            output_dir: None,
            format: OutputFormat::Both,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    ///
    /// An explicit `config_file` must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("threshold_percent", defaults.threshold_percent)?
            .set_default("format", defaults.format.to_string())?
            .set_default("log_level", defaults.log_level)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        validate_threshold(settings.threshold_percent)?;
        Ok(settings)
    }
}

/// Reject thresholds that cannot classify anything sensibly.
pub fn validate_threshold(threshold_percent: f64) -> Result<f64, SettingsError> {
    if !threshold_percent.is_finite() || threshold_percent < 0.0 {
        return Err(SettingsError::Invalid {
            key: "threshold_percent",
            reason: format!("must be a finite, non-negative percentage, got {threshold_percent}"),
        });
    }
    Ok(threshold_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.threshold_percent, 1.0);
        assert_eq!(settings.format, OutputFormat::Both);
        assert!(settings.output_dir.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchdelta.toml");
        fs::write(
            &path,
            "threshold_percent = 2.5\nformat = \"json\"\noutput_dir = \"reports\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.threshold_percent, 2.5);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.output_dir, Some(PathBuf::from("reports")));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(SettingsError::Load(_))
        ));
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "threshold_percent = -1.0\n").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(SettingsError::Invalid { key: "threshold_percent", .. })
        ));
        assert!(validate_threshold(f64::NAN).is_err());
        assert_eq!(validate_threshold(0.0).unwrap(), 0.0);
    }
}
