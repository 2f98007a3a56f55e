//! Shrinking for dates and timestamps.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::{Halving, Shrink, toward_integer, toward_real};
use crate::generators::temporal::{from_nanos, to_nanos};

/// Day number (from the common era) of 1900-01-01, the date origin.
pub const DATE_ORIGIN_DAYS: i32 = 693_596;

/// Halving limits for timestamps, shrunk toward the Unix epoch.
pub const TIME_HALVING: Halving = Halving {
    epsilon: 1e-2,
    limit: 64,
};

impl Shrink for NaiveDate {
    fn shrink(&self) -> Vec<Self> {
        toward_integer(i128::from(self.num_days_from_ce()), i128::from(DATE_ORIGIN_DAYS))
            .into_iter()
            .filter_map(|day| i32::try_from(day).ok())
            .filter_map(NaiveDate::from_num_days_from_ce_opt)
            .collect()
    }
}

impl Shrink for DateTime<Utc> {
    fn shrink(&self) -> Vec<Self> {
        toward_real(to_nanos(*self) as f64 / 1e9, 0.0, TIME_HALVING)
            .into_iter()
            .filter_map(|seconds| from_nanos((seconds * 1e9).round() as i128))
            .filter(|candidate| candidate != self)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_origin_is_1900() {
        assert_eq!(
            NaiveDate::from_num_days_from_ce_opt(DATE_ORIGIN_DAYS),
            NaiveDate::from_ymd_opt(1900, 1, 1)
        );
    }

    #[test]
    fn dates_shrink_toward_origin() {
        let origin = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let candidates = later.shrink();
        assert_eq!(candidates[0], origin);
        assert!(candidates.iter().all(|d| *d >= origin && *d < later));
        assert!(origin.shrink().is_empty());

        let earlier = NaiveDate::from_ymd_opt(1850, 3, 1).unwrap();
        assert!(earlier.shrink().iter().all(|d| *d > earlier && *d <= origin));
    }

    #[test]
    fn times_shrink_toward_epoch() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        let instant = DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap();
        let candidates = instant.shrink();
        assert_eq!(candidates[0], epoch);
        assert!(candidates.iter().all(|t| *t >= epoch && *t < instant));
        assert!(candidates.len() <= 1 + 2 * TIME_HALVING.limit);
        assert!(epoch.shrink().is_empty());
    }
}
