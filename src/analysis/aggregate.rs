//! Categorical and time-bucketed aggregations over dispatch records.
//!
//! Every function here is pure: it takes the record collection as an
//! explicit argument, performs no I/O, and returns a well-typed empty or
//! zero result for empty input. Bucket totals always equal the input
//! record count; records with a missing categorical value land in the
//! [`UNSPECIFIED_LABEL`] bucket instead of being dropped.

use crate::models::{
    CategoryCount, DayBucket, HourBucket, IncidentRecord, ResponseTimeStats,
};
use chrono::{Datelike, Duration, NaiveDate, Timelike};

/// Fallback bucket for records without a value in the grouped field.
pub const UNSPECIFIED_LABEL: &str = "Não informado";

/// Count records per distinct value of the chosen field.
///
/// Returns one `{name, value}` row per distinct value, sorted descending
/// by count. The sort is stable, so rows with equal counts keep their
/// first-seen order. Missing or blank values are grouped under
/// [`UNSPECIFIED_LABEL`]; the row values always sum to `records.len()`.
pub fn count_by_category<F>(records: &[IncidentRecord], key: F) -> Vec<CategoryCount>
where
    F: Fn(&IncidentRecord) -> Option<String>,
{
    let mut rows: Vec<CategoryCount> = Vec::new();

    for record in records {
        let name = match key(record) {
            Some(value) if !value.trim().is_empty() => value,
            _ => UNSPECIFIED_LABEL.to_string(),
        };

        match rows.iter_mut().find(|row| row.name == name) {
            Some(row) => row.value += 1,
            None => rows.push(CategoryCount { name, value: 1 }),
        }
    }

    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows
}

/// Count records per incident type.
pub fn count_by_type(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    count_by_category(records, |r| Some(r.incident_type.clone()))
}

/// Count records per lifecycle status.
pub fn count_by_status(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    count_by_category(records, |r| Some(r.status.to_string()))
}

/// Count records per district ("bairro").
pub fn count_by_district(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    count_by_category(records, |r| r.district.clone())
}

/// Count records per dispatch priority.
pub fn count_by_priority(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    count_by_category(records, |r| r.priority.map(|p| p.to_string()))
}

/// Keep the `n` largest rows of a categorical breakdown.
pub fn top_n(rows: &[CategoryCount], n: usize) -> Vec<CategoryCount> {
    rows.iter().take(n).cloned().collect()
}

/// Distribute records over the 24 hours of the day (local time).
///
/// Always returns exactly 24 buckets, zero buckets included.
pub fn bucket_by_hour_of_day(records: &[IncidentRecord]) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> =
        (0u32..24).map(|hour| HourBucket { hour, count: 0 }).collect();

    for record in records {
        buckets[record.occurred_at.hour() as usize].count += 1;
    }

    buckets
}

/// Weekday labels as shown on the dashboard, Sunday first.
const WEEKDAY_LABELS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

/// Distribute records over the days of the week, Sunday first.
///
/// Always returns all 7 rows, in calendar order rather than by count.
pub fn bucket_by_weekday(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    let mut counts = [0u64; 7];

    for record in records {
        counts[record.occurred_at.weekday().num_days_from_sunday() as usize] += 1;
    }

    WEEKDAY_LABELS
        .iter()
        .zip(counts)
        .map(|(name, value)| CategoryCount {
            name: (*name).to_string(),
            value,
        })
        .collect()
}

/// Fixed six-hour slice of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 4] = [
        DayPeriod::EarlyMorning,
        DayPeriod::Morning,
        DayPeriod::Afternoon,
        DayPeriod::Evening,
    ];

    /// Period containing the given local hour (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => DayPeriod::EarlyMorning,
            6..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            _ => DayPeriod::Evening,
        }
    }

    /// Dashboard label for the period.
    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::EarlyMorning => "Madrugada (00h-06h)",
            DayPeriod::Morning => "Manhã (06h-12h)",
            DayPeriod::Afternoon => "Tarde (12h-18h)",
            DayPeriod::Evening => "Noite (18h-00h)",
        }
    }
}

/// Distribute records over the four six-hour periods of the day.
///
/// Always returns all 4 rows, in day order.
pub fn bucket_by_day_period(records: &[IncidentRecord]) -> Vec<CategoryCount> {
    let mut counts = [0u64; 4];

    for record in records {
        counts[DayPeriod::from_hour(record.occurred_at.hour()) as usize] += 1;
    }

    DayPeriod::ALL
        .iter()
        .zip(counts)
        .map(|(period, value)| CategoryCount {
            name: period.label().to_string(),
            value,
        })
        .collect()
}

/// Daily counts for a contiguous window of `window_days + 1` calendar days
/// ending on `end`.
///
/// Every day in the window is present, zero-filled when nothing happened.
/// Records dated outside the window (including future dates) are ignored
/// so the series never grows extra buckets.
pub fn bucket_by_day(
    records: &[IncidentRecord],
    window_days: u32,
    end: NaiveDate,
) -> Vec<DayBucket> {
    let start = end - Duration::days(i64::from(window_days));
    let mut buckets: Vec<DayBucket> = (0..=i64::from(window_days))
        .map(|offset| DayBucket {
            date: start + Duration::days(offset),
            count: 0,
            moving_avg: None,
        })
        .collect();

    for record in records {
        let date = record.occurred_on();
        if date < start || date > end {
            continue;
        }
        let index = (date - start).num_days() as usize;
        buckets[index].count += 1;
    }

    buckets
}

/// Annotate a daily series with a trailing moving average.
///
/// Each bucket gets the mean of itself and the previous `window - 1`
/// buckets, rounded to 2 decimal places; buckets without enough history
/// stay `None`.
pub fn with_moving_average(mut buckets: Vec<DayBucket>, window: usize) -> Vec<DayBucket> {
    if window == 0 {
        return buckets;
    }

    for index in 0..buckets.len() {
        if index + 1 < window {
            continue;
        }
        let sum: u64 = buckets[index + 1 - window..=index]
            .iter()
            .map(|b| b.count)
            .sum();
        buckets[index].moving_avg = Some(round2(sum as f64 / window as f64));
    }

    buckets
}

/// Mean of all parseable response times, rounded to the nearest minute.
///
/// Records whose `tempoResposta` does not parse are excluded, not counted
/// as zero. Returns 0 when nothing parses.
pub fn average_response_time(records: &[IncidentRecord]) -> u32 {
    let minutes: Vec<u32> = records
        .iter()
        .filter_map(IncidentRecord::response_minutes)
        .collect();

    if minutes.is_empty() {
        return 0;
    }

    let total: u64 = minutes.iter().map(|&m| u64::from(m)).sum();
    (total as f64 / minutes.len() as f64).round() as u32
}

/// Min/max/mean spread of the parseable response times, `None` when no
/// record has one.
pub fn response_time_stats(records: &[IncidentRecord]) -> Option<ResponseTimeStats> {
    let minutes: Vec<u32> = records
        .iter()
        .filter_map(IncidentRecord::response_minutes)
        .collect();

    let (&min, &max) = (minutes.iter().min()?, minutes.iter().max()?);
    let total: u64 = minutes.iter().map(|&m| u64::from(m)).sum();

    Some(ResponseTimeStats {
        count: minutes.len(),
        min_minutes: min,
        max_minutes: max,
        avg_minutes: (total as f64 / minutes.len() as f64).round() as u32,
    })
}

/// Row with the highest count; the first maximum wins on ties.
pub fn peak(rows: &[CategoryCount]) -> Option<&CategoryCount> {
    rows.iter().fold(None, |best, row| match best {
        Some(current) if row.value > current.value => Some(row),
        None => Some(row),
        _ => best,
    })
}

/// Hour bucket with the highest count; the first maximum wins on ties.
pub fn peak_hour(buckets: &[HourBucket]) -> Option<HourBucket> {
    buckets.iter().copied().fold(None, |best, bucket| match best {
        Some(current) if bucket.count > current.count => Some(bucket),
        None => Some(bucket),
        _ => best,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
