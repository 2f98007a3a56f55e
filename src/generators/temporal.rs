//! Calendar date and timestamp generators.
//!
//! Dates are integer day offsets and timestamps are integer nanosecond
//! offsets, drawn with the integer generator and mapped onto `chrono` types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::computation::Gen;

use super::ConfigError;
use super::numeric::{integer, wide_integer};
use super::options::{Center, GenOptions, check_order, resolve_center};

/// Day number (from the common era) of 0000-01-01.
pub const DATE_MIN_DAYS: i64 = -365;
/// Day number (from the common era) of 9999-12-31.
pub const DATE_MAX_DAYS: i64 = 3_652_059;

/// Unix seconds of 1000-01-01T00:00:00Z.
pub const TIME_MIN_SECONDS: i64 = -30_610_224_000;
/// Unix seconds of 9999-12-31T23:59:59Z.
pub const TIME_MAX_SECONDS: i64 = 253_402_300_799;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Dates in `[min, max]`, 0000-01-01 through 9999-12-31 by default.
pub fn date(options: &GenOptions<NaiveDate>) -> Result<Gen<NaiveDate>, ConfigError> {
    let mut days = options.map_bounds(|day| i64::from(day.num_days_from_ce()));
    days.min = Some(days.min.unwrap_or(DATE_MIN_DAYS));
    days.max = Some(days.max.unwrap_or(DATE_MAX_DAYS));
    Ok(integer(&days)?.filter_map(|day| {
        i32::try_from(day)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
    }))
}

/// Timestamps in `[min, max]`, 1000-01-01 through 9999-12-31T23:59:59Z by
/// default, with nanosecond precision.
pub fn time(options: &GenOptions<DateTime<Utc>>) -> Result<Gen<DateTime<Utc>>, ConfigError> {
    if let (Some(min), Some(max)) = (options.min, options.max) {
        check_order(&min, &max)?;
    }
    let nanos = options.map_bounds(|instant| to_nanos(*instant));
    let min = nanos.min.unwrap_or(i128::from(TIME_MIN_SECONDS) * NANOS_PER_SECOND);
    let mut max = nanos
        .max
        .unwrap_or(i128::from(TIME_MAX_SECONDS) * NANOS_PER_SECOND);
    if !options.inclusive {
        max -= 1;
    }
    check_order(&min, &max)?;
    let center = resolve_center(
        nanos.center.unwrap_or(Center::Mid),
        min,
        max,
        |lo, hi| lo + (hi - lo).div_euclid(2),
    )?;
    Ok(wide_integer(min, max, center).filter_map(from_nanos))
}

/// Nanoseconds since the Unix epoch.
pub(crate) fn to_nanos(instant: DateTime<Utc>) -> i128 {
    i128::from(instant.timestamp()) * NANOS_PER_SECOND
        + i128::from(instant.timestamp_subsec_nanos())
}

pub(crate) fn from_nanos(nanos: i128) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
    DateTime::from_timestamp(seconds, subsec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computation::{Size, sample};
    use crate::random::RandomSource;

    #[test]
    fn default_bounds_match_calendar() {
        assert_eq!(
            NaiveDate::from_num_days_from_ce_opt(DATE_MIN_DAYS as i32),
            NaiveDate::from_ymd_opt(0, 1, 1)
        );
        assert_eq!(
            NaiveDate::from_num_days_from_ce_opt(DATE_MAX_DAYS as i32),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
        assert_eq!(
            DateTime::from_timestamp(TIME_MIN_SECONDS, 0).map(|t| t.to_rfc3339()),
            Some("1000-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            DateTime::from_timestamp(TIME_MAX_SECONDS, 0).map(|t| t.to_rfc3339()),
            Some("9999-12-31T23:59:59+00:00".to_string())
        );
    }

    #[test]
    fn dates_stay_in_bounds() {
        let (Some(min), Some(max)) = (
            NaiveDate::from_ymd_opt(2020, 2, 1),
            NaiveDate::from_ymd_opt(2020, 3, 31),
        ) else {
            panic!("valid dates");
        };
        let generator = date(&GenOptions::between(min, max)).unwrap();
        let mut source = RandomSource::from_seed(41);
        for value in sample(&generator, &mut source, 200, Size::MAX, 1).unwrap() {
            assert!(value >= min && value <= max, "{value}");
        }
    }

    #[test]
    fn zero_size_date_is_center() {
        let center = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let generator = date(&GenOptions::new().with_center(Center::Value(center))).unwrap();
        let mut source = RandomSource::from_seed(43);
        let values = sample(&generator, &mut source, 10, Size::MIN, 1).unwrap();
        assert!(values.iter().all(|value| *value == center));
    }

    #[test]
    fn times_stay_in_bounds() {
        let min = DateTime::from_timestamp(0, 0).unwrap();
        let max = DateTime::from_timestamp(86_400, 0).unwrap();
        let generator = time(&GenOptions::between(min, max)).unwrap();
        let mut source = RandomSource::from_seed(47);
        for value in sample(&generator, &mut source, 200, Size::MAX, 1).unwrap() {
            assert!(value >= min && value <= max, "{value}");
        }
    }

    #[test]
    fn degenerate_time_bounds_keep_nanoseconds() {
        for nanos in [250_000_100, 123_456_789, 999_999_999, 1] {
            let instant = DateTime::from_timestamp(1_700_000_000, nanos).unwrap();
            let generator = time(&GenOptions::between(instant, instant)).unwrap();
            let mut source = RandomSource::from_seed(u64::from(nanos));
            for value in sample(&generator, &mut source, 10, Size::MAX, 1).unwrap() {
                assert_eq!(value, instant);
            }
        }
    }

    #[test]
    fn zero_size_time_pins_subsecond_max() {
        let min = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let max = DateTime::from_timestamp(1_700_000_001, 123_456_789).unwrap();
        let options = GenOptions::between(min, max).with_center(Center::Max);
        let mut source = RandomSource::from_seed(59);
        let values = sample(&time(&options).unwrap(), &mut source, 10, Size::MIN, 1).unwrap();
        assert!(values.iter().all(|value| *value == max));

        let exclusive = options.with_inclusive(false);
        let values = sample(&time(&exclusive).unwrap(), &mut source, 10, Size::MIN, 1).unwrap();
        let below = DateTime::from_timestamp(1_700_000_001, 123_456_788).unwrap();
        assert!(values.iter().all(|value| *value == below));
    }

    #[test]
    fn nanosecond_offsets_round_trip() {
        let before_epoch = DateTime::from_timestamp(-2, 999_999_999).unwrap();
        assert_eq!(to_nanos(before_epoch), -1_000_000_001);
        assert_eq!(from_nanos(-1_000_000_001), Some(before_epoch));
        assert!(from_nanos(i128::MAX).is_none());
        let inverted = time(&GenOptions::between(
            DateTime::from_timestamp(10, 0).unwrap(),
            DateTime::from_timestamp(5, 0).unwrap(),
        ));
        assert!(matches!(inverted, Err(ConfigError::MinGreaterThanMax { .. })));
    }

    #[test]
    fn default_times_are_representable() {
        let generator = time(&GenOptions::new()).unwrap();
        let mut source = RandomSource::from_seed(53);
        assert_eq!(sample(&generator, &mut source, 100, Size::MAX, 1).unwrap().len(), 100);
    }
}
