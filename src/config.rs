//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.firemetrics.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "incident_report.md".to_string()
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Response-time target in minutes for the efficiency index.
    #[serde(default = "default_target_minutes")]
    pub target_response_minutes: u32,

    /// Moving-average window over the daily series, in days.
    #[serde(default = "default_moving_avg_window")]
    pub moving_avg_window: usize,

    /// Daily-trend window length in days (the series spans this many days
    /// plus today).
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// How many districts the concentration table keeps.
    #[serde(default = "default_top_districts")]
    pub top_districts: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            target_response_minutes: default_target_minutes(),
            moving_avg_window: default_moving_avg_window(),
            window_days: default_window_days(),
            top_districts: default_top_districts(),
        }
    }
}

fn default_target_minutes() -> u32 {
    15
}

fn default_moving_avg_window() -> usize {
    7
}

fn default_window_days() -> u32 {
    30
}

fn default_top_districts() -> usize {
    10
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the hour-of-day distribution table.
    #[serde(default = "default_true")]
    pub include_hourly: bool,

    /// Include the per-team rollup table.
    #[serde(default = "default_true")]
    pub include_teams: bool,

    /// Include the per-vehicle rollup table.
    #[serde(default = "default_true")]
    pub include_vehicles: bool,

    /// Include the operational profile section.
    #[serde(default = "default_true")]
    pub include_profile: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_hourly: true,
            include_teams: true,
            include_vehicles: true,
            include_profile: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".firemetrics.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; optional
    /// arguments only override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(window) = args.window {
            self.aggregation.window_days = window;
        }
        if let Some(target) = args.target_minutes {
            self.aggregation.target_response_minutes = target;
        }
        if let Some(top) = args.top_districts {
            self.aggregation.top_districts = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aggregation.target_response_minutes, 15);
        assert_eq!(config.aggregation.window_days, 30);
        assert_eq!(config.aggregation.moving_avg_window, 7);
        assert!(config.report.include_teams);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[aggregation]
target_response_minutes = 10
window_days = 90

[report]
include_vehicles = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.aggregation.target_response_minutes, 10);
        assert_eq!(config.aggregation.window_days, 90);
        // Unset fields fall back to defaults.
        assert_eq!(config.aggregation.moving_avg_window, 7);
        assert!(!config.report.include_vehicles);
        assert!(config.report.include_teams);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[aggregation]"));
        assert!(toml_str.contains("[report]"));
    }
}
