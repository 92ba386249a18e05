//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Firemetrics - operational statistics for dispatch records
///
/// Turn a JSON export of dispatch records ("ocorrências") into the derived
/// statistics a dashboard consumes: KPI cards, categorical breakdowns,
/// hourly/daily series, trends, and per-team rollups, as Markdown or JSON.
///
/// Examples:
///   firemetrics --input exports/incidents.json
///   firemetrics --input exports/ --format json --output stats.json
///   firemetrics --input exports/incidents.json --from 2026-07-01 --to 2026-07-31
///   firemetrics --input exports/incidents.json --fail-below-efficiency 70
///   firemetrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input dataset: a JSON export file, or a directory of exports
    ///
    /// Directory datasets merge every .json file below the path.
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "PATH",
        required_unless_present = "init_config",
        env = "FIREMETRICS_INPUT"
    )]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, default_value = "incident_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Daily-trend window in days
    ///
    /// The daily series spans this many days plus today. Defaults to the
    /// config file value (30 when unset).
    #[arg(short, long, value_name = "DAYS")]
    pub window: Option<u32>,

    /// Response-time target in minutes for the efficiency index
    ///
    /// Defaults to the config file value (15 when unset).
    #[arg(long, value_name = "MIN")]
    pub target_minutes: Option<u32>,

    /// How many districts the concentration table keeps
    #[arg(long, value_name = "COUNT")]
    pub top_districts: Option<usize>,

    /// Only analyze records on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Only analyze records on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Only analyze records of this incident type (exact match)
    #[arg(long, value_name = "TYPE")]
    pub incident_type: Option<String>,

    /// Only analyze records with this lifecycle status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<StatusArg>,

    /// Only analyze records whose district contains this text
    #[arg(long, value_name = "DISTRICT")]
    pub district: Option<String>,

    /// Fail when the efficiency index lands below this percentage
    ///
    /// Useful for CI-style monitoring. Exit code 2 when the gate trips.
    #[arg(long, value_name = "PCT")]
    pub fail_below_efficiency: Option<f64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .firemetrics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate the dataset without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .firemetrics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Lifecycle status for --status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusArg {
    InProgress,
    Controlled,
    Finished,
    Cancelled,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input path does not exist: {}", input.display()));
            }
        }

        if let Some(window) = self.window {
            if window == 0 {
                return Err("Window must be at least 1 day".to_string());
            }
        }

        if let Some(target) = self.target_minutes {
            if target == 0 {
                return Err("Target minutes must be at least 1".to_string());
            }
        }

        if let Some(top) = self.top_districts {
            if top == 0 {
                return Err("Top districts must be at least 1".to_string());
            }
        }

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err("--from must not be after --to".to_string());
            }
        }

        if let Some(threshold) = self.fail_below_efficiency {
            if !(0.0..=100.0).contains(&threshold) {
                return Err("Efficiency threshold must be between 0 and 100".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            output: PathBuf::from("test.md"),
            format: OutputFormat::Markdown,
            window: None,
            target_minutes: None,
            top_districts: None,
            from: None,
            to: None,
            incident_type: None,
            status: None,
            district: None,
            fail_below_efficiency: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_missing_input_path() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/nonexistent/incidents.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_window() {
        let mut args = make_args();
        args.window = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_inverted_date_range() {
        let mut args = make_args();
        args.from = NaiveDate::from_ymd_opt(2026, 8, 1);
        args.to = NaiveDate::from_ymd_opt(2026, 7, 1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_threshold_range() {
        let mut args = make_args();
        args.fail_below_efficiency = Some(150.0);
        assert!(args.validate().is_err());

        args.fail_below_efficiency = Some(70.0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
