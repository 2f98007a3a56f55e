//! Numeric generators.

use crate::computation::{Gen, rand, rand_real, scale, scale_integer};

use super::ConfigError;
use super::options::{Center, GenOptions, check_order, resolve_center};

/// Finite stand-in for an unbounded float bound.
pub const FLOAT_SENTINEL: f64 = 9_007_199_254_740_992.0; // 2^53

/// Primitive integers the integer generator can produce.
///
/// Values are widened to `i128` for drawing and scaling, which holds every
/// 64-bit range without overflow.
pub trait Integral: Copy + PartialOrd + std::fmt::Display + 'static {
    /// Smallest value of the type.
    const LOWEST: Self;
    /// Largest value of the type.
    const HIGHEST: Self;
    /// Lossless widening.
    fn widen(self) -> i128;
    /// Narrowing of a value known to be in range.
    fn narrow(wide: i128) -> Self;
}

macro_rules! integral {
    ($($t:ty),* $(,)?) => {$(
        impl Integral for $t {
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            fn widen(self) -> i128 {
                self as i128
            }

            fn narrow(wide: i128) -> Self {
                wide.clamp(<$t>::MIN as i128, <$t>::MAX as i128) as $t
            }
        }
    )*};
}

integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Integers in `[min, max]` (type bounds when unset), biased toward `center`
/// (midpoint by default).
///
/// A raw value is drawn uniformly, scaled toward the center by the current
/// size and truncated toward the center, so the result never leaves the
/// bounds.
pub fn integer<I: Integral>(options: &GenOptions<I>) -> Result<Gen<I>, ConfigError> {
    let min = options.min.unwrap_or(I::LOWEST).widen();
    let mut max = options.max.unwrap_or(I::HIGHEST).widen();
    if !options.inclusive {
        max -= 1;
    }
    check_order(&min, &max)?;
    let center = resolve_center(
        options.center.unwrap_or(Center::Mid).map_value(I::widen),
        min,
        max,
        |lo, hi| lo + (hi - lo).div_euclid(2),
    )?;
    Ok(wide_integer(min, max, center).map(I::narrow))
}

/// Integer draw over already validated widened bounds.
pub(crate) fn wide_integer(min: i128, max: i128, center: i128) -> Gen<i128> {
    let range = max.abs_diff(min);
    rand(range.saturating_add(1))
        .bind(move |raw| scale_integer(min.saturating_add_unsigned(raw), range, center))
        .map(move |scaled| scaled.clamp(min, max))
}

/// Uniform coin flip.
pub fn boolean() -> Gen<bool> {
    rand(2).map(|raw| raw == 0)
}

/// Reals in `[min, max]`, biased toward `center` (midpoint by default).
///
/// Unbounded sides are replaced by [`FLOAT_SENTINEL`]. A whole part and an
/// independent fraction in `[0, 1)` are drawn and combined into a position
/// along the range before scaling toward the center. With `inclusive` off
/// the upper bound becomes the largest float below `max`, and the center is
/// resolved against that.
pub fn float(options: &GenOptions<f64>) -> Result<Gen<f64>, ConfigError> {
    let lo = float_bound(options.min, -FLOAT_SENTINEL)?;
    let mut hi = float_bound(options.max, FLOAT_SENTINEL)?;
    if !options.inclusive {
        hi = next_below(hi);
    }
    check_order(&lo, &hi)?;
    let center = options.center.unwrap_or(Center::Mid);
    if let Center::Value(value) = center {
        if value.is_nan() {
            return Err(ConfigError::NonFiniteBound(value.to_string()));
        }
    }
    let center = resolve_center(center, lo, hi, |a, b| a / 2.0 + b / 2.0)?;

    let span = hi - lo;
    let wholes = if span.is_finite() {
        span.floor().clamp(1.0, FLOAT_SENTINEL) as u128
    } else {
        FLOAT_SENTINEL as u128
    };

    Ok(rand(wholes)
        .bind(move |whole| {
            rand_real(1.0).bind(move |fraction| {
                let position = (whole as f64 + fraction) / wholes as f64;
                let raw = lo * (1.0 - position) + hi * position;
                scale(raw, span, center)
            })
        })
        .map(move |value| value.clamp(lo, hi)))
}

/// Largest float strictly below the finite `value`.
fn next_below(value: f64) -> f64 {
    if value == 0.0 {
        -f64::from_bits(1)
    } else if value > 0.0 {
        f64::from_bits(value.to_bits() - 1)
    } else {
        f64::from_bits(value.to_bits() + 1)
    }
}

fn float_bound(bound: Option<f64>, sentinel: f64) -> Result<f64, ConfigError> {
    match bound {
        None => Ok(sentinel),
        Some(value) if value.is_nan() => Err(ConfigError::NonFiniteBound(value.to_string())),
        Some(value) if value.is_infinite() && value.signum() == sentinel.signum() => Ok(sentinel),
        Some(value) if value.is_infinite() => Err(ConfigError::NonFiniteBound(value.to_string())),
        Some(value) => Ok(value),
    }
}
