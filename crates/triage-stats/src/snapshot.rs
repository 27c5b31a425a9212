//! Stats snapshot and the throughput calculation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time ticket statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub avg_tickets_per_day: f64,
    /// Count per priority value; unset is keyed as `""`
    pub priority_breakdown: BTreeMap<String, u64>,
    /// Count per category value; unset is keyed as `""`
    pub category_breakdown: BTreeMap<String, u64>,
}

/// Average tickets per day, inclusive of the first day.
///
/// `days = whole days elapsed since earliest + 1`, never below 1.
pub fn tickets_per_day(total: u64, earliest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(earliest) = earliest else {
        return 0.0;
    };
    if total == 0 {
        return 0.0;
    }

    let days = ((now - earliest).num_days() + 1).max(1);
    round_one_decimal(total as f64 / days as f64)
}

/// Round to one decimal place, ties to even.
///
/// Ties are judged on the exact value of `value`, so 0.15 (stored just below
/// the tie) rounds down while 0.25 (stored exactly) rounds to 0.2.
pub fn round_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    let floor = scaled.floor();
    if scaled - floor != 0.5 {
        return scaled.round() / 10.0;
    }

    // The product itself may have been rounded onto the tie
    let residual = value.mul_add(10.0, -scaled);
    let rounded = if residual > 0.0 {
        floor + 1.0
    } else if residual < 0.0 || floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_no_tickets() {
        assert_eq!(tickets_per_day(0, None, now()), 0.0);
    }

    #[test]
    fn test_same_day_counts_as_one() {
        assert_eq!(tickets_per_day(10, Some(now()), now()), 10.0);
        assert_eq!(
            tickets_per_day(3, Some(now() - Duration::hours(23)), now()),
            3.0
        );
    }

    #[test]
    fn test_partial_days_are_floored() {
        let earliest = now() - Duration::days(6) - Duration::hours(5);
        assert_eq!(tickets_per_day(7, Some(earliest), now()), 1.0);

        let earliest = now() - Duration::days(2) - Duration::minutes(1);
        assert_eq!(tickets_per_day(10, Some(earliest), now()), 3.3);
    }

    #[test]
    fn test_future_earliest_is_clamped() {
        let earliest = now() + Duration::days(3);
        assert_eq!(tickets_per_day(4, Some(earliest), now()), 4.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_one_decimal(2.0 / 3.0), 0.7);
        assert_eq!(round_one_decimal(1.04), 1.0);
        assert_eq!(round_one_decimal(1.06), 1.1);
        assert_eq!(round_one_decimal(5.0), 5.0);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(1.25), 1.2);
        assert_eq!(round_one_decimal(2.5 / 2.0), 1.2);
        assert_eq!(round_one_decimal(3.75), 3.8);
        // 0.15 is stored slightly below the tie
        assert_eq!(round_one_decimal(0.15), 0.1);
    }

    #[test]
    fn test_tie_rate_rounds_to_even() {
        let earliest = now() - Duration::days(3) - Duration::hours(2);
        assert_eq!(tickets_per_day(5, Some(earliest), now()), 1.2);

        let earliest = now() - Duration::days(3);
        assert_eq!(tickets_per_day(3, Some(earliest), now()), 0.8);
    }
}
