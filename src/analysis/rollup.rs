//! Per-entity rollups (teams, vehicles).
//!
//! A record listing several entities contributes to every one of them;
//! the fan-out is intentional, so the sum of `touched` across rows may
//! exceed the record count.

use crate::models::{EntityRollup, IncidentRecord, Status};
use std::collections::BTreeMap;

#[derive(Default)]
struct Accumulator {
    touched: u64,
    finished: u64,
    in_progress: u64,
    response_total: u64,
    response_count: u64,
}

/// Aggregate records per entity named in the chosen list field.
///
/// Produces one row per distinct entity with incident counts, the mean
/// response time over parseable durations, and the resolution rate
/// (`finished / touched`, 0.0 when nothing was touched). Rows are ordered
/// by `touched` descending, name ascending on ties.
pub fn rollup_by_entity<F>(records: &[IncidentRecord], entities: F) -> Vec<EntityRollup>
where
    F: Fn(&IncidentRecord) -> &[String],
{
    let mut grouped: BTreeMap<String, Accumulator> = BTreeMap::new();

    for record in records {
        for name in entities(record) {
            let entry = grouped.entry(name.clone()).or_default();
            entry.touched += 1;

            match record.status {
                Status::Finished => entry.finished += 1,
                Status::InProgress | Status::Controlled => entry.in_progress += 1,
                Status::Cancelled => {}
            }

            if let Some(minutes) = record.response_minutes() {
                entry.response_total += u64::from(minutes);
                entry.response_count += 1;
            }
        }
    }

    let mut rows: Vec<EntityRollup> = grouped
        .into_iter()
        .map(|(name, acc)| EntityRollup {
            name,
            touched: acc.touched,
            finished: acc.finished,
            in_progress: acc.in_progress,
            avg_response_minutes: if acc.response_count > 0 {
                (acc.response_total as f64 / acc.response_count as f64).round() as u32
            } else {
                0
            },
            resolution_rate: if acc.touched > 0 {
                acc.finished as f64 / acc.touched as f64
            } else {
                0.0
            },
        })
        .collect();

    // Stable sort: the BTreeMap already yielded names ascending, so ties
    // stay alphabetical.
    rows.sort_by(|a, b| b.touched.cmp(&a.touched));
    rows
}

/// Rollup over the teams that worked each incident.
pub fn rollup_by_team(records: &[IncidentRecord]) -> Vec<EntityRollup> {
    rollup_by_entity(records, |r| r.teams.as_slice())
}

/// Rollup over the vehicles dispatched to each incident.
pub fn rollup_by_vehicle(records: &[IncidentRecord]) -> Vec<EntityRollup> {
    rollup_by_entity(records, |r| r.vehicles.as_slice())
}

/// Entity with the lowest mean response time, ignoring entities where no
/// duration parsed (their average reads 0, which is absence, not speed).
pub fn fastest(rollups: &[EntityRollup]) -> Option<&EntityRollup> {
    rollups
        .iter()
        .filter(|r| r.avg_response_minutes > 0)
        .fold(None, |best: Option<&EntityRollup>, row| match best {
            Some(current) if row.avg_response_minutes < current.avg_response_minutes => Some(row),
            None => Some(row),
            _ => best,
        })
}

/// Entity with the highest resolution rate; the first maximum wins on ties.
pub fn best_resolution(rollups: &[EntityRollup]) -> Option<&EntityRollup> {
    rollups.iter().fold(None, |best: Option<&EntityRollup>, row| match best {
        Some(current) if row.resolution_rate > current.resolution_rate => Some(row),
        None => Some(row),
        _ => best,
    })
}
