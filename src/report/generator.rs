//! Markdown report generation.
//!
//! This module renders the derived statistics into a Markdown document,
//! section by section, plus a JSON variant for machine consumers.

use crate::analysis::{best_resolution, fastest, peak, peak_hour};
use crate::config::ReportConfig;
use crate::models::{CategoryCount, EntityRollup, InsightsReport, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &InsightsReport, options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Incident Operations Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_kpi_section(report));
    output.push_str(&generate_breakdown_section(report));
    output.push_str(&generate_district_section(report));
    output.push_str(&generate_temporal_section(report, options));
    output.push_str(&generate_daily_trend_section(report));

    if options.include_teams {
        output.push_str(&generate_rollup_section("Team Performance", &report.teams));
    }
    if options.include_vehicles {
        output.push_str(&generate_rollup_section("Vehicle Utilization", &report.vehicles));
    }
    if options.include_profile {
        output.push_str(&generate_profile_section(report));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    section.push_str(&format!("- **Records Loaded:** {}\n", metadata.records_loaded));
    if metadata.records_analyzed != metadata.records_loaded {
        section.push_str(&format!(
            "- **Records Analyzed (after filters):** {}\n",
            metadata.records_analyzed
        ));
    }
    if let Some((first, last)) = metadata.date_span {
        section.push_str(&format!("- **Date Span:** {} to {}\n", first, last));
    }
    section.push_str(&format!("- **Trend Window:** {} days\n", metadata.window_days));
    section.push_str(&format!(
        "- **Response Target:** {} min\n",
        metadata.target_response_minutes
    ));
    section.push('\n');

    section
}

/// Generate the KPI section.
fn generate_kpi_section(report: &InsightsReport) -> String {
    let kpis = &report.kpis;
    let mut section = String::new();

    section.push_str("## Key Indicators\n\n");
    section.push_str("| Total | Today | In Progress | Finished | Cancelled | Victims | Fatalities |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} | {} |\n\n",
        kpis.total,
        kpis.today,
        kpis.in_progress,
        kpis.finished,
        kpis.cancelled,
        kpis.total_victims,
        kpis.fatal_victims
    ));

    section.push_str(&format!(
        "- **Average Response Time:** {} min\n",
        kpis.avg_response_minutes
    ));
    section.push_str(&format!("- **Efficiency Index:** {:.0}%\n", kpis.efficiency));
    if let Some(stats) = report.response_times {
        section.push_str(&format!(
            "- **Response Spread:** {} to {} min over {} measured records\n",
            stats.min_minutes, stats.max_minutes, stats.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the categorical breakdowns (type, status, priority).
fn generate_breakdown_section(report: &InsightsReport) -> String {
    let mut section = String::new();

    section.push_str("## Breakdown\n\n");
    section.push_str(&category_table(
        "By Incident Type",
        &report.by_type,
        report.kpis.total,
    ));
    section.push_str(&category_table(
        "By Status",
        &report.by_status,
        report.kpis.total,
    ));
    if !report.by_priority.is_empty() {
        section.push_str(&category_table(
            "By Priority",
            &report.by_priority,
            report.kpis.total,
        ));
    }

    section
}

/// Generate the district concentration section.
fn generate_district_section(report: &InsightsReport) -> String {
    if report.top_districts.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str(&category_table(
        "District Concentration",
        &report.top_districts,
        report.kpis.total,
    ));

    if report.top_districts.len() >= 2 && report.kpis.total > 0 {
        let leading = report.top_districts[0].value + report.top_districts[1].value;
        section.push_str(&format!(
            "{} and {} concentrate {:.1}% of all records.\n\n",
            report.top_districts[0].name,
            report.top_districts[1].name,
            share(leading, report.kpis.total as u64)
        ));
    }

    section
}

/// Generate the temporal patterns section (hourly, weekday, period).
fn generate_temporal_section(report: &InsightsReport, options: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str("## Temporal Patterns\n\n");

    if let Some(hour) = peak_hour(&report.hourly) {
        section.push_str(&format!(
            "- **Peak Hour:** {:02}:00 ({} records)\n",
            hour.hour, hour.count
        ));
    }
    if let Some(day) = peak(&report.weekdays) {
        section.push_str(&format!("- **Peak Weekday:** {} ({} records)\n", day.name, day.value));
    }
    if let Some(period) = peak(&report.day_periods) {
        section.push_str(&format!(
            "- **Peak Period:** {} ({} records)\n",
            period.name, period.value
        ));
    }
    section.push('\n');

    section.push_str(&category_table(
        "By Period of Day",
        &report.day_periods,
        report.kpis.total,
    ));
    section.push_str(&category_table(
        "By Weekday",
        &report.weekdays,
        report.kpis.total,
    ));

    if options.include_hourly {
        section.push_str("### By Hour of Day\n\n");
        section.push_str("| Hour | Count |\n");
        section.push_str("|:---:|:---:|\n");
        for bucket in &report.hourly {
            section.push_str(&format!("| {:02}h | {} |\n", bucket.hour, bucket.count));
        }
        section.push('\n');
    }

    section
}

/// Generate the daily trend section.
fn generate_daily_trend_section(report: &InsightsReport) -> String {
    let mut section = String::new();

    section.push_str("## Daily Trend\n\n");

    if let Some(trend) = report.weekly_trend {
        let sign = if trend.percentage > 0.0 { "+" } else { "" };
        section.push_str(&format!(
            "Last 7 days vs. previous week: **{}** ({}{:.0}%)\n\n",
            trend.trend, sign, trend.percentage
        ));
    } else {
        section.push_str("Not enough history for a week-over-week trend.\n\n");
    }

    section.push_str("| Date | Count | 7-day Avg |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for bucket in &report.daily {
        let avg = bucket
            .moving_avg
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        section.push_str(&format!("| {} | {} | {} |\n", bucket.date, bucket.count, avg));
    }
    section.push('\n');

    section
}

/// Generate a per-entity rollup section (teams or vehicles).
fn generate_rollup_section(title: &str, rollups: &[EntityRollup]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if rollups.is_empty() {
        section.push_str("No entities recorded.\n\n");
        return section;
    }

    if let Some(entity) = fastest(rollups) {
        section.push_str(&format!(
            "- **Fastest:** {} ({} min average)\n",
            entity.name, entity.avg_response_minutes
        ));
    }
    if let Some(entity) = best_resolution(rollups) {
        section.push_str(&format!(
            "- **Best Resolution Rate:** {} ({:.1}%)\n",
            entity.name,
            entity.resolution_rate * 100.0
        ));
    }
    section.push('\n');

    section.push_str("| Name | Touched | Finished | In Progress | Avg Response | Resolution |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for rollup in rollups {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} min | {:.1}% |\n",
            rollup.name,
            rollup.touched,
            rollup.finished,
            rollup.in_progress,
            rollup.avg_response_minutes,
            rollup.resolution_rate * 100.0
        ));
    }
    section.push('\n');

    section
}

/// Generate the operational profile section.
fn generate_profile_section(report: &InsightsReport) -> String {
    let mut section = String::new();

    section.push_str("## Operational Profile\n\n");
    section.push_str("Normalized 0-100 scores.\n\n");
    section.push_str("| Axis | Score |\n");
    section.push_str("|:---|:---:|\n");
    for axis in &report.profile {
        section.push_str(&format!("| {} | {:.1} |\n", axis.label, axis.score));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by firemetrics*\n");

    footer
}

/// Render a categorical breakdown as a table with a share column.
fn category_table(title: &str, rows: &[CategoryCount], total: usize) -> String {
    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));

    if rows.is_empty() {
        table.push_str("No data to display.\n\n");
        return table;
    }

    table.push_str("| Name | Count | Share |\n");
    table.push_str("|:---|:---:|:---:|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            row.name,
            row.value,
            share(row.value, total as u64)
        ));
    }
    table.push('\n');

    table
}

fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Generate a JSON report.
pub fn generate_json_report(report: &InsightsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayBucket, HourBucket, KpiSnapshot, ProfileAxis, Trend, TrendSummary};
    use chrono::{Local, NaiveDate, TimeZone};

    fn create_test_report() -> InsightsReport {
        let metadata = ReportMetadata {
            source: "exports/incidents.json".to_string(),
            generated_at: Local.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
            records_loaded: 10,
            records_analyzed: 8,
            date_span: Some((
                NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            )),
            window_days: 30,
            target_response_minutes: 15,
        };

        InsightsReport {
            metadata,
            kpis: KpiSnapshot {
                total: 8,
                today: 1,
                in_progress: 2,
                finished: 5,
                cancelled: 1,
                total_victims: 4,
                fatal_victims: 1,
                avg_response_minutes: 7,
                efficiency: 53.0,
            },
            by_type: vec![
                CategoryCount { name: "Incêndio".to_string(), value: 5 },
                CategoryCount { name: "Acidente".to_string(), value: 3 },
            ],
            by_status: vec![
                CategoryCount { name: "Finalizado".to_string(), value: 5 },
                CategoryCount { name: "Em Andamento".to_string(), value: 2 },
                CategoryCount { name: "Cancelado".to_string(), value: 1 },
            ],
            by_priority: vec![CategoryCount { name: "Alta".to_string(), value: 8 }],
            top_districts: vec![
                CategoryCount { name: "Boa Viagem".to_string(), value: 4 },
                CategoryCount { name: "Santo Amaro".to_string(), value: 3 },
            ],
            hourly: (0..24).map(|hour| HourBucket { hour, count: 0 }).collect(),
            weekdays: vec![CategoryCount { name: "Domingo".to_string(), value: 8 }],
            day_periods: vec![CategoryCount {
                name: "Manhã (06h-12h)".to_string(),
                value: 8,
            }],
            daily: vec![DayBucket {
                date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                count: 1,
                moving_avg: Some(1.29),
            }],
            weekly_trend: Some(TrendSummary {
                trend: Trend::Increase,
                percentage: 25.0,
            }),
            teams: vec![EntityRollup {
                name: "Equipe Alpha".to_string(),
                touched: 6,
                finished: 4,
                in_progress: 2,
                avg_response_minutes: 7,
                resolution_rate: 0.6666666666666666,
            }],
            vehicles: Vec::new(),
            response_times: None,
            profile: vec![ProfileAxis {
                label: "Taxa Conclusão".to_string(),
                score: 62.5,
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Incident Operations Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Key Indicators"));
        assert!(markdown.contains("## Daily Trend"));
        assert!(markdown.contains("Equipe Alpha"));
        assert!(markdown.contains("Boa Viagem and Santo Amaro concentrate 87.5%"));
        assert!(markdown.contains("**Increase** (+25%)"));
    }

    #[test]
    fn test_report_sections_respect_config() {
        let report = create_test_report();
        let options = ReportConfig {
            include_hourly: false,
            include_teams: false,
            include_vehicles: false,
            include_profile: false,
        };

        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("### By Hour of Day"));
        assert!(!markdown.contains("## Team Performance"));
        assert!(!markdown.contains("## Operational Profile"));
    }

    #[test]
    fn test_rollup_section_percentages() {
        let report = create_test_report();
        let section = generate_rollup_section("Team Performance", &report.teams);

        assert!(section.contains("| Equipe Alpha | 6 | 4 | 2 | 7 min | 66.7% |"));
        assert!(section.contains("**Fastest:** Equipe Alpha"));
    }

    #[test]
    fn test_empty_report_renders_empty_states() {
        let mut report = create_test_report();
        report.by_type.clear();
        report.top_districts.clear();
        report.teams.clear();

        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("No data to display."));
        assert!(markdown.contains("No entities recorded."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"kpis\""));
        assert!(json.contains("\"by_type\""));
        assert!(json.contains("\"efficiency\""));
    }
}
