//! Composite scores: efficiency index, completion rate, KPI snapshot and
//! the normalized operational profile.

use crate::analysis::aggregate::average_response_time;
use crate::models::{IncidentRecord, KpiSnapshot, ProfileAxis, Status};
use chrono::{Duration, NaiveDate};

/// Efficiency score in [0, 100] for a mean response time against a target.
///
/// `100 - avg/target*100`, clamped so it never goes negative (a response
/// time at or past double the target floors at 0) and never exceeds 100.
/// A non-positive target yields 0 instead of a division by zero.
pub fn efficiency_index(avg_response_minutes: f64, target_minutes: f64) -> f64 {
    if target_minutes <= 0.0 {
        return 0.0;
    }

    (100.0 - avg_response_minutes / target_minutes * 100.0).clamp(0.0, 100.0)
}

/// Share of records that reached `Finalizado`, as a 0-100 percentage.
pub fn completion_rate(records: &[IncidentRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let finished = records.iter().filter(|r| r.status == Status::Finished).count();
    finished as f64 / records.len() as f64 * 100.0
}

/// Headline figures for the KPI cards.
///
/// `reference_date` is "today" for the today-counter; the efficiency index
/// is 0 when no record has a parseable response time, matching the empty
/// state of the cards.
pub fn kpi_snapshot(
    records: &[IncidentRecord],
    target_minutes: u32,
    reference_date: NaiveDate,
) -> KpiSnapshot {
    let avg_response_minutes = average_response_time(records);
    let has_measured = records.iter().any(|r| r.response_minutes().is_some());

    let efficiency = if has_measured {
        efficiency_index(f64::from(avg_response_minutes), f64::from(target_minutes)).round()
    } else {
        0.0
    };

    KpiSnapshot {
        total: records.len(),
        today: records
            .iter()
            .filter(|r| r.occurred_on() == reference_date)
            .count(),
        in_progress: records.iter().filter(|r| r.status.is_active()).count(),
        finished: records
            .iter()
            .filter(|r| r.status == Status::Finished)
            .count(),
        cancelled: records
            .iter()
            .filter(|r| r.status == Status::Cancelled)
            .count(),
        total_victims: records.iter().map(|r| u64::from(r.victims)).sum(),
        fatal_victims: records.iter().map(|r| u64::from(r.fatal_victims)).sum(),
        avg_response_minutes,
        efficiency,
    }
}

/// Normalized 0-100 axes describing the operational picture at a glance.
///
/// Labels match the dashboard's radar chart. The criticality axis is the
/// actual share of high/critical-priority records.
pub fn operational_profile(
    records: &[IncidentRecord],
    target_minutes: u32,
    reference_date: NaiveDate,
) -> Vec<ProfileAxis> {
    let total = records.len();
    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            (count as f64 / total as f64 * 100.0).min(100.0)
        }
    };

    let week_start = reference_date - Duration::days(7);
    let recent = records
        .iter()
        .filter(|r| r.occurred_on() >= week_start)
        .count();
    let in_progress = records.iter().filter(|r| r.status.is_active()).count();
    let urgent = records
        .iter()
        .filter(|r| r.priority.is_some_and(|p| p.is_urgent()))
        .count();

    let has_measured = records.iter().any(|r| r.response_minutes().is_some());
    let response_score = if has_measured {
        efficiency_index(
            f64::from(average_response_time(records)),
            f64::from(target_minutes),
        )
    } else {
        0.0
    };

    vec![
        ProfileAxis {
            label: "Volume Semanal".to_string(),
            score: share(recent),
        },
        ProfileAxis {
            label: "Tempo Resposta".to_string(),
            score: response_score,
        },
        ProfileAxis {
            label: "Taxa Conclusão".to_string(),
            score: completion_rate(records),
        },
        ProfileAxis {
            label: "Em Andamento".to_string(),
            score: share(in_progress),
        },
        ProfileAxis {
            label: "Criticidade".to_string(),
            score: share(urgent),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{Local, TimeZone};

    fn make_record(id: u64, status: Status) -> IncidentRecord {
        IncidentRecord {
            id,
            incident_type: "Incêndio".to_string(),
            subtype: None,
            priority: None,
            severity: None,
            occurred_at: Local.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
            status,
            address: None,
            district: None,
            latitude: None,
            longitude: None,
            victims: 0,
            fatal_victims: 0,
            response_time: None,
            teams: Vec::new(),
            vehicles: Vec::new(),
            commander: None,
            notes: None,
        }
    }

    #[test]
    fn test_efficiency_index_bounds() {
        assert_eq!(efficiency_index(0.0, 15.0), 100.0);
        assert_eq!(efficiency_index(7.5, 15.0), 50.0);
        assert_eq!(efficiency_index(15.0, 15.0), 0.0);
        // Past the target it clamps at zero instead of going negative.
        assert_eq!(efficiency_index(45.0, 15.0), 0.0);
        // Degenerate target never divides by zero.
        assert_eq!(efficiency_index(5.0, 0.0), 0.0);

        for avg in [0u32, 1, 5, 14, 15, 60, 10_000] {
            let score = efficiency_index(f64::from(avg), 15.0);
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(&[]), 0.0);

        let records = vec![
            make_record(1, Status::Finished),
            make_record(2, Status::Finished),
            make_record(3, Status::InProgress),
            make_record(4, Status::Cancelled),
        ];
        assert_eq!(completion_rate(&records), 50.0);
    }

    #[test]
    fn test_kpi_snapshot_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut records = vec![
            make_record(1, Status::InProgress),
            make_record(2, Status::Controlled),
            make_record(3, Status::Finished),
            make_record(4, Status::Cancelled),
        ];
        records[2].occurred_at = Local.with_ymd_and_hms(2026, 7, 20, 9, 0, 0).unwrap();
        records[0].victims = 3;
        records[0].fatal_victims = 1;
        records[0].response_time = Some("6min".to_string());
        records[1].response_time = Some("9min".to_string());

        let kpis = kpi_snapshot(&records, 15, today);

        assert_eq!(kpis.total, 4);
        assert_eq!(kpis.today, 3);
        assert_eq!(kpis.in_progress, 2);
        assert_eq!(kpis.finished, 1);
        assert_eq!(kpis.cancelled, 1);
        assert_eq!(kpis.total_victims, 3);
        assert_eq!(kpis.fatal_victims, 1);
        assert_eq!(kpis.avg_response_minutes, 8); // mean of 6 and 9 rounds up
        assert_eq!(kpis.efficiency, 47.0); // 100 - 8/15*100 = 46.67 -> 47
    }

    #[test]
    fn test_kpi_snapshot_empty_is_all_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let kpis = kpi_snapshot(&[], 15, today);

        assert_eq!(kpis, KpiSnapshot::default());
    }

    #[test]
    fn test_kpi_efficiency_zero_without_measured_times() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let records = vec![make_record(1, Status::Finished)];

        let kpis = kpi_snapshot(&records, 15, today);

        // avg 0 would score 100; the absence of data must not.
        assert_eq!(kpis.efficiency, 0.0);
    }

    #[test]
    fn test_operational_profile_axes() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut records = vec![
            make_record(1, Status::Finished),
            make_record(2, Status::InProgress),
        ];
        records[0].priority = Some(Priority::Critical);
        records[0].response_time = Some("3min".to_string());

        let profile = operational_profile(&records, 15, today);

        assert_eq!(profile.len(), 5);
        for axis in &profile {
            assert!((0.0..=100.0).contains(&axis.score), "{} out of range", axis.label);
        }
        assert_eq!(profile[2].score, 50.0); // completion
        assert_eq!(profile[4].score, 50.0); // critical share
    }

    #[test]
    fn test_operational_profile_empty() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let profile = operational_profile(&[], 15, today);

        assert_eq!(profile.len(), 5);
        assert!(profile.iter().all(|axis| axis.score == 0.0));
    }
}
