use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use metrogen_generate::{MultipartReportConfig, PartReportConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_RUN_DIR: &str = "runs";

/// Errors raised while loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Generator settings, read from an optional TOML file and overridden by
/// command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: Option<u64>,
    /// RFC 3339 string, e.g. `"2024-01-01T00:00:00Z"`.
    pub anchor: Option<DateTime<Utc>>,
    pub pretty: bool,
    pub run_dir: PathBuf,
    pub part: PartSettings,
    pub assembly: AssemblySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartSettings {
    pub report_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    pub assembly_size: usize,
    pub min_report_size: usize,
    pub max_report_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            anchor: None,
            pretty: false,
            run_dir: PathBuf::from(DEFAULT_RUN_DIR),
            part: PartSettings::default(),
            assembly: AssemblySettings::default(),
        }
    }
}

impl Default for PartSettings {
    fn default() -> Self {
        Self { report_size: 10 }
    }
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            assembly_size: 10,
            min_report_size: 5,
            max_report_size: 50,
        }
    }
}

impl PartSettings {
    pub fn config(&self) -> PartReportConfig {
        PartReportConfig::new(self.report_size)
    }
}

impl AssemblySettings {
    pub fn config(&self) -> MultipartReportConfig {
        MultipartReportConfig::new(
            self.assembly_size,
            self.min_report_size,
            self.max_report_size,
        )
    }
}

/// Loads settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            parse_settings(&content)
        }
        None => Ok(Settings::default()),
    }
}

pub fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = parse_settings(
            r#"
seed = 7
anchor = "2024-01-01T00:00:00Z"

[assembly]
min_report_size = 2
"#,
        )
        .expect("parse settings");

        assert_eq!(settings.seed, Some(7));
        assert!(settings.anchor.is_some());
        assert_eq!(settings.run_dir, PathBuf::from("runs"));
        assert_eq!(settings.part.report_size, 10);
        assert_eq!(settings.assembly.min_report_size, 2);
        assert_eq!(settings.assembly.max_report_size, 50);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let result = parse_settings("seed = \"seven\"");
        assert!(matches!(result, Err(SettingsError::Toml(_))));
    }
}
