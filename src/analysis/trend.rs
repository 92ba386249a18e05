//! Window-over-window trend classification.

use crate::models::{DayBucket, Trend, TrendSummary};

/// Change below this magnitude (in percent) is reported as stable.
const TREND_THRESHOLD_PCT: f64 = 10.0;

/// Classify the change between two windows of daily counts.
///
/// The percentage is the relative change of the window means. When the
/// prior window's mean is zero the percentage is defined as 100 if the
/// recent mean is positive and 0 otherwise, so the division by zero never
/// surfaces. Classification uses the unrounded change; the reported
/// percentage is rounded to the nearest integer.
pub fn compute_trend(recent: &[u64], prior: &[u64]) -> TrendSummary {
    let recent_avg = mean(recent);
    let prior_avg = mean(prior);

    let change = if prior_avg == 0.0 {
        if recent_avg > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (recent_avg - prior_avg) / prior_avg * 100.0
    };

    let trend = if change > TREND_THRESHOLD_PCT {
        Trend::Increase
    } else if change < -TREND_THRESHOLD_PCT {
        Trend::Decrease
    } else {
        Trend::Stable
    };

    TrendSummary {
        trend,
        percentage: change.round(),
    }
}

/// Last 7 days of a daily series against the 7 days before them.
///
/// Returns `None` when the series holds fewer than 14 buckets; callers
/// render that as "not enough history" rather than a fake stable trend.
pub fn weekly_trend(daily: &[DayBucket]) -> Option<TrendSummary> {
    if daily.len() < 14 {
        return None;
    }

    let counts: Vec<u64> = daily.iter().map(|b| b.count).collect();
    let split = counts.len() - 7;

    Some(compute_trend(&counts[split..], &counts[split - 7..split]))
}

fn mean(window: &[u64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<u64>() as f64 / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(counts: &[u64]) -> Vec<DayBucket> {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| DayBucket {
                date: start + chrono::Duration::days(i as i64),
                count,
                moving_avg: None,
            })
            .collect()
    }

    #[test]
    fn test_trend_zero_prior_positive_recent() {
        let summary = compute_trend(&[10, 12, 11], &[0, 0, 0]);

        assert_eq!(summary.trend, Trend::Increase);
        assert_eq!(summary.percentage, 100.0);
    }

    #[test]
    fn test_trend_zero_prior_zero_recent() {
        let summary = compute_trend(&[0, 0], &[0, 0]);

        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_trend_increase_above_threshold() {
        // mean 12 vs mean 10: +20%
        let summary = compute_trend(&[12, 12, 12], &[10, 10, 10]);

        assert_eq!(summary.trend, Trend::Increase);
        assert_eq!(summary.percentage, 20.0);
    }

    #[test]
    fn test_trend_decrease_below_threshold() {
        // mean 5 vs mean 10: -50%
        let summary = compute_trend(&[5, 5], &[10, 10]);

        assert_eq!(summary.trend, Trend::Decrease);
        assert_eq!(summary.percentage, -50.0);
    }

    #[test]
    fn test_trend_small_change_is_stable() {
        // mean 10.5 vs mean 10: +5%
        let summary = compute_trend(&[10, 11], &[10, 10]);

        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.percentage, 5.0);
    }

    #[test]
    fn test_trend_empty_windows() {
        let summary = compute_trend(&[], &[]);

        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_weekly_trend_needs_two_weeks() {
        assert!(weekly_trend(&series(&[1; 13])).is_none());
        assert!(weekly_trend(&series(&[1; 14])).is_some());
    }

    #[test]
    fn test_weekly_trend_uses_last_two_weeks() {
        // 7 days at 2, then 7 days at 4: +100%
        let mut counts = vec![9, 9, 9]; // older history is ignored
        counts.extend([2; 7]);
        counts.extend([4; 7]);

        let summary = weekly_trend(&series(&counts)).unwrap();

        assert_eq!(summary.trend, Trend::Increase);
        assert_eq!(summary.percentage, 100.0);
    }
}
