//! Data models for dispatch records and derived statistics.
//!
//! This module contains the incident record as it appears in the JSON
//! exports of the dispatch system (Portuguese field names on the wire),
//! plus the output types produced by the analysis layer.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a dispatch record.
///
/// The wire format uses the labels of the originating system; only the
/// four values below exist. A record is never deleted, it only moves to
/// a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Crews are on scene, situation not yet contained.
    #[serde(rename = "Em Andamento")]
    InProgress,
    /// Contained but still being worked.
    #[serde(rename = "Controlado")]
    Controlled,
    /// Closed out.
    #[serde(rename = "Finalizado")]
    Finished,
    /// Dispatched in error or stood down.
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl Status {
    /// Whether the record still ties up crews (in progress or controlled).
    pub fn is_active(&self) -> bool {
        matches!(self, Status::InProgress | Status::Controlled)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::InProgress => write!(f, "Em Andamento"),
            Status::Controlled => write!(f, "Controlado"),
            Status::Finished => write!(f, "Finalizado"),
            Status::Cancelled => write!(f, "Cancelado"),
        }
    }
}

/// Dispatch priority, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Crítica")]
    Critical,
}

impl Priority {
    /// High and critical dispatches count toward the critical-share score.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Baixa"),
            Priority::Medium => write!(f, "Média"),
            Priority::High => write!(f, "Alta"),
            Priority::Critical => write!(f, "Crítica"),
        }
    }
}

/// A single dispatch record ("ocorrência") as exported by the dispatch
/// system.
///
/// Unknown keys in the export (photos, resource lists, progress fields)
/// are ignored on deserialization; the analysis layer does not consume
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unique identifier, immutable once created.
    pub id: u64,
    /// Category label (e.g. "Incêndio", "Acidente", "Resgate").
    #[serde(rename = "tipo")]
    pub incident_type: String,
    /// Optional sub-category (e.g. "Residencial", "Trânsito").
    #[serde(rename = "subtipo", default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Dispatch priority.
    #[serde(rename = "prioridade", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Ordinal severity, 1 (lightest) to 5.
    #[serde(rename = "gravidade", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    /// When the incident occurred. Hour-of-day statistics use the local
    /// hour component of this timestamp.
    #[serde(rename = "dataHora")]
    pub occurred_at: DateTime<Local>,
    /// Lifecycle status.
    pub status: Status,
    /// Street address, free text.
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// District ("bairro"), free text.
    #[serde(rename = "bairro", default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Victim count, zero when none reported.
    #[serde(rename = "vitimas", default)]
    pub victims: u32,
    /// Fatalities among the victims; never exceeds `victims` after loading.
    #[serde(rename = "vitimasFatais", default)]
    pub fatal_victims: u32,
    /// Raw response duration as exported, e.g. `"5min"`. Use
    /// [`IncidentRecord::response_minutes`] instead of parsing inline.
    #[serde(rename = "tempoResposta", default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    /// Teams that worked the incident (zero or more).
    #[serde(rename = "equipesEnvolvidas", default)]
    pub teams: Vec<String>,
    /// Vehicles dispatched (zero or more).
    #[serde(rename = "viaturasEnvolvidas", default)]
    pub vehicles: Vec<String>,
    /// Commanding officer on scene.
    #[serde(rename = "comandante", default, skip_serializing_if = "Option::is_none")]
    pub commander: Option<String>,
    /// Free-text remarks.
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IncidentRecord {
    /// Parsed response time in whole minutes.
    ///
    /// Returns `None` when the field is absent or does not parse; callers
    /// must exclude such records from time averages rather than treat them
    /// as zero.
    pub fn response_minutes(&self) -> Option<u32> {
        self.response_time.as_deref().and_then(parse_response_minutes)
    }

    /// Calendar date the incident occurred on (local time).
    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }
}

/// Parse a response duration string like `"5min"` into minutes.
///
/// Accepts an optional `min` suffix and surrounding whitespace. This is
/// the single parse point for the string-encoded duration field; anything
/// that does not parse here is excluded from numeric aggregates.
pub fn parse_response_minutes(raw: &str) -> Option<u32> {
    let value = raw.trim();
    let value = value.strip_suffix("min").unwrap_or(value).trim_end();
    value.parse().ok()
}

/// One row of a categorical breakdown, shaped for direct chart consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: u64,
}

/// One of the 24 hour-of-day buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    /// Local hour, 0-23.
    pub hour: u32,
    pub count: u64,
}

/// One calendar-day bucket of the daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u64,
    /// Trailing moving average, `None` until enough prior days exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_avg: Option<f64>,
}

/// Direction of the week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increase => write!(f, "Increase"),
            Trend::Decrease => write!(f, "Decrease"),
            Trend::Stable => write!(f, "Stable"),
        }
    }
}

/// Classified change between two count windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub trend: Trend,
    /// Percentage change, rounded to the nearest integer. May be negative.
    pub percentage: f64,
}

/// Aggregate row for one entity (team or vehicle) across all incidents
/// that touched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRollup {
    pub name: String,
    /// Incidents the entity was involved in.
    pub touched: u64,
    pub finished: u64,
    pub in_progress: u64,
    /// Mean response time over incidents with a parseable duration, 0 when
    /// none parse.
    pub avg_response_minutes: u32,
    /// `finished / touched` as a fraction, 0.0 when nothing was touched.
    pub resolution_rate: f64,
}

/// Spread of the parseable response times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    /// Records with a parseable duration.
    pub count: usize,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub avg_minutes: u32,
}

/// One axis of the normalized operational profile (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAxis {
    pub label: String,
    pub score: f64,
}

/// Headline figures for the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Records in the (filtered) set.
    pub total: usize,
    /// Records that occurred on the reference date.
    pub today: usize,
    /// In progress or controlled.
    pub in_progress: usize,
    pub finished: usize,
    pub cancelled: usize,
    pub total_victims: u64,
    pub fatal_victims: u64,
    /// Rounded mean of parseable response times, 0 when none parse.
    pub avg_response_minutes: u32,
    /// Efficiency index against the response target, rounded, in [0, 100].
    /// 0 when no record has a parseable response time.
    pub efficiency: f64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input path the records came from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Local>,
    /// Records loaded before filtering.
    pub records_loaded: usize,
    /// Records that survived the filters and fed the statistics.
    pub records_analyzed: usize,
    /// Earliest and latest record dates in the analyzed set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_span: Option<(NaiveDate, NaiveDate)>,
    /// Length of the daily-trend window in days.
    pub window_days: u32,
    /// Response-time target used by the efficiency index, in minutes.
    pub target_response_minutes: u32,
}

/// The complete set of derived statistics, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsReport {
    pub metadata: ReportMetadata,
    pub kpis: KpiSnapshot,
    pub by_type: Vec<CategoryCount>,
    pub by_status: Vec<CategoryCount>,
    pub by_priority: Vec<CategoryCount>,
    pub top_districts: Vec<CategoryCount>,
    pub hourly: Vec<HourBucket>,
    pub weekdays: Vec<CategoryCount>,
    pub day_periods: Vec<CategoryCount>,
    pub daily: Vec<DayBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_trend: Option<TrendSummary>,
    pub teams: Vec<EntityRollup>,
    pub vehicles: Vec<EntityRollup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_times: Option<ResponseTimeStats>,
    pub profile: Vec<ProfileAxis>,
}
