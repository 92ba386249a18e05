//! Firemetrics - operational statistics for dispatch records
//!
//! A CLI tool that turns JSON exports of fire-department dispatch records
//! into the derived statistics a dashboard consumes: KPI cards, categorical
//! breakdowns, hourly/daily series, trends, and per-team rollups.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable input, config failure, etc.)
//!   2 - Efficiency index below --fail-below-efficiency

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use cli::{Args, OutputFormat, StatusArg};
use config::Config;
use models::{IncidentRecord, InsightsReport, ReportMetadata, Status};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("\n❌ Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("Firemetrics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the pipeline
    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report generation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .firemetrics.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".firemetrics.toml");

    if path.exists() {
        eprintln!("⚠️  .firemetrics.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .firemetrics.toml")?;

    println!("✅ Created .firemetrics.toml with default settings.");
    println!("   Edit it to customize the response target, trend window, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete pipeline. Returns exit code (0 or 2).
fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input: PathBuf = args.input.clone().context("--input is required")?;
    let today = Local::now().date_naive();

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", input.display());
    let records = loader::load_records(&input)?;
    info!("Loaded {} records", records.len());

    // Handle --dry-run: validate the dataset and exit
    if args.dry_run {
        return handle_dry_run(&records);
    }

    // Step 2: Apply filters
    let filter = build_filter(&args);
    let analyzed = if filter.is_empty() {
        records.clone()
    } else {
        let kept = filter.apply(&records);
        info!("{} of {} records match the filters", kept.len(), records.len());
        kept
    };

    if analyzed.is_empty() {
        warn!("No records to analyze; the report will show empty states");
    }

    // Step 3: Compute the statistics
    println!("📊 Computing statistics over {} records...", analyzed.len());
    let insights = build_report(&input, records.len(), &analyzed, &config, today);

    // Step 4: Generate and save the report
    let output = match args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&insights, &config.report),
        OutputFormat::Json => report::generate_json_report(&insights)?,
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    let kpis = &insights.kpis;
    println!("\n📈 Summary:");
    println!("   Records analyzed: {}", kpis.total);
    println!(
        "   In progress: {} | Finished: {} | Cancelled: {}",
        kpis.in_progress, kpis.finished, kpis.cancelled
    );
    println!(
        "   Victims: {} ({} fatal)",
        kpis.total_victims, kpis.fatal_victims
    );
    println!(
        "   Avg response: {} min | Efficiency: {:.0}%",
        kpis.avg_response_minutes, kpis.efficiency
    );
    println!("\n✅ Report saved to: {}", args.output.display());

    // Check --fail-below-efficiency threshold
    if let Some(threshold) = args.fail_below_efficiency {
        if kpis.efficiency < threshold {
            eprintln!(
                "\n⛔ Efficiency index {:.0}% is below the {:.0}% threshold. Failing (exit code 2).",
                kpis.efficiency, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Handle --dry-run: load and summarize the dataset, write nothing.
fn handle_dry_run(records: &[IncidentRecord]) -> Result<i32> {
    println!("\n🔍 Dry run: dataset loaded, no report written.\n");
    println!("   Records: {}", records.len());

    if let Some((first, last)) = date_span(records) {
        println!("   Date span: {} to {}", first, last);
    }
    for row in analysis::count_by_status(records) {
        println!("   {}: {}", row.name, row.value);
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Build the record filter from CLI arguments.
fn build_filter(args: &Args) -> analysis::RecordFilter {
    analysis::RecordFilter {
        since: args.from,
        until: args.to,
        incident_type: args.incident_type.clone(),
        status: args.status.map(status_from_arg),
        district: args.district.clone(),
    }
}

/// Convert the CLI status flag to the model enum.
fn status_from_arg(arg: StatusArg) -> Status {
    match arg {
        StatusArg::InProgress => Status::InProgress,
        StatusArg::Controlled => Status::Controlled,
        StatusArg::Finished => Status::Finished,
        StatusArg::Cancelled => Status::Cancelled,
    }
}

/// Assemble the full statistics document from the analyzed records.
fn build_report(
    source: &Path,
    records_loaded: usize,
    records: &[IncidentRecord],
    config: &Config,
    today: NaiveDate,
) -> InsightsReport {
    let agg = &config.aggregation;

    let daily = analysis::with_moving_average(
        analysis::bucket_by_day(records, agg.window_days, today),
        agg.moving_avg_window,
    );
    let weekly_trend = analysis::weekly_trend(&daily);

    let metadata = ReportMetadata {
        source: source.display().to_string(),
        generated_at: Local::now(),
        records_loaded,
        records_analyzed: records.len(),
        date_span: date_span(records),
        window_days: agg.window_days,
        target_response_minutes: agg.target_response_minutes,
    };

    InsightsReport {
        metadata,
        kpis: analysis::kpi_snapshot(records, agg.target_response_minutes, today),
        by_type: analysis::count_by_type(records),
        by_status: analysis::count_by_status(records),
        by_priority: analysis::count_by_priority(records),
        top_districts: analysis::top_n(&analysis::count_by_district(records), agg.top_districts),
        hourly: analysis::bucket_by_hour_of_day(records),
        weekdays: analysis::bucket_by_weekday(records),
        day_periods: analysis::bucket_by_day_period(records),
        daily,
        weekly_trend,
        teams: analysis::rollup_by_team(records),
        vehicles: analysis::rollup_by_vehicle(records),
        response_times: analysis::response_time_stats(records),
        profile: analysis::operational_profile(records, agg.target_response_minutes, today),
    }
}

/// Earliest and latest record dates, `None` for an empty set.
fn date_span(records: &[IncidentRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = records.iter().map(IncidentRecord::occurred_on).min()?;
    let last = records.iter().map(IncidentRecord::occurred_on).max()?;
    Some((first, last))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .firemetrics.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
