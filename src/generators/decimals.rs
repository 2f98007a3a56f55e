//! Fixed-point decimal generation.
//!
//! A decimal is an integer count of `10^-places` ticks, so generation and
//! shrinking both work on exact integers and never accumulate float error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::computation::Gen;

use super::ConfigError;
use super::numeric::wide_integer;
use super::options::{Center, GenOptions, check_order, resolve_center};

/// Most fractional digits a [`Decimal`] may carry.
pub const MAX_PLACES: u32 = 18;

/// Magnitude standing in for an unbounded decimal side.
pub const DECIMAL_SENTINEL: f64 = 1.0e15;

/// Fixed-point number `units * 10^-places`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    /// Signed tick count.
    pub units: i128,
    /// Digits after the decimal point.
    pub places: u32,
}

impl Decimal {
    /// Decimal of `units` ticks of `10^-places`.
    pub fn new(units: i128, places: u32) -> Self {
        Self { units, places }
    }

    /// Nearest `f64`.
    pub fn to_f64(self) -> f64 {
        self.units as f64 / 10f64.powi(self.places as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.places == 0 {
            return write!(f, "{}", self.units);
        }
        let scale = 10u128.pow(self.places);
        let magnitude = self.units.unsigned_abs();
        let sign = if self.units < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:0width$}",
            magnitude / scale,
            magnitude % scale,
            width = self.places as usize
        )
    }
}

/// Decimals with `places` fractional digits in `[min, max]` (±1e15 when
/// unset), biased toward `center` (midpoint by default).
///
/// Bounds are rounded inward to the nearest representable tick.
pub fn decimal(places: u32, options: &GenOptions<f64>) -> Result<Gen<Decimal>, ConfigError> {
    if places > MAX_PLACES {
        return Err(ConfigError::BadArgument {
            generator: "decimal".into(),
            reason: format!("at most {MAX_PLACES} places, got {places}"),
        });
    }
    let lo = decimal_bound(options.min, -DECIMAL_SENTINEL)?;
    let hi = decimal_bound(options.max, DECIMAL_SENTINEL)?;
    check_order(&lo, &hi)?;

    let scale = 10f64.powi(places as i32);
    let min = (lo * scale).ceil() as i128;
    let mut max = (hi * scale).floor() as i128;
    if !options.inclusive && (max as f64) >= hi * scale {
        max -= 1;
    }
    if min > max {
        return Err(ConfigError::BadArgument {
            generator: "decimal".into(),
            reason: format!("no value with {places} places in [{lo}, {hi}]"),
        });
    }
    let center = options
        .center
        .unwrap_or(Center::Mid)
        .map_value(|value| (value * scale).round() as i128);
    if let Some(Center::Value(value)) = options.center {
        if !value.is_finite() {
            return Err(ConfigError::NonFiniteBound(value.to_string()));
        }
    }
    let center = resolve_center(center, min, max, |a, b| a + (b - a).div_euclid(2))?;

    Ok(wide_integer(min, max, center).map(move |units| Decimal::new(units, places)))
}

fn decimal_bound(bound: Option<f64>, sentinel: f64) -> Result<f64, ConfigError> {
    match bound {
        None => Ok(sentinel),
        Some(value) if value.is_nan() || value.abs() > DECIMAL_SENTINEL => {
            Err(ConfigError::NonFiniteBound(value.to_string()))
        }
        Some(value) => Ok(value),
    }
}
