//! Pre-aggregation record filtering.
//!
//! Mirrors the filter panel of the dashboard: inclusive date range, exact
//! type and status, case-insensitive district substring. Filtering happens
//! before aggregation; the statistics functions themselves never filter.

use crate::models::{IncidentRecord, Status};
use chrono::NaiveDate;

/// Criteria applied to the record set before any statistics run.
///
/// All fields are optional; an empty filter keeps everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Keep records on or after this date.
    pub since: Option<NaiveDate>,
    /// Keep records on or before this date.
    pub until: Option<NaiveDate>,
    /// Exact incident type ("tipo").
    pub incident_type: Option<String>,
    /// Exact lifecycle status.
    pub status: Option<Status>,
    /// Case-insensitive substring of the district ("bairro").
    pub district: Option<String>,
}

impl RecordFilter {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.since.is_none()
            && self.until.is_none()
            && self.incident_type.is_none()
            && self.status.is_none()
            && self.district.is_none()
    }

    /// Whether a single record passes every set criterion.
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        if let Some(since) = self.since {
            if record.occurred_on() < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.occurred_on() > until {
                return false;
            }
        }
        if let Some(ref incident_type) = self.incident_type {
            if record.incident_type != *incident_type {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(ref district) = self.district {
            let needle = district.to_lowercase();
            let found = record
                .district
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }

        true
    }

    /// Keep the records that pass every set criterion.
    pub fn apply(&self, records: &[IncidentRecord]) -> Vec<IncidentRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
