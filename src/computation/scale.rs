//! Size-biased scaling of uniformly drawn values toward an origin.
//!
//! At size `s` the usable range is `range^s - 1 + s`: zero at `s = 0` (every
//! draw collapses onto the origin) and the full `range` at `s = 1`. A raw draw
//! is mapped to `origin + usable * (raw - origin) / range`.

use super::{Gen, Size, Step};

/// Fractional bits of the fixed-point ratio used for integer scaling.
const FIXED_BITS: u32 = 53;
const FIXED_ONE: i128 = 1 << FIXED_BITS;

/// Fraction of `range` usable at `size`, always in `[0, 1]`.
///
/// Computed as `range^(s-1) + (s-1)/range`, which equals
/// `(range^s - 1 + s) / range` but stays finite for huge or infinite ranges.
pub fn usable_ratio(range: f64, size: Size) -> f64 {
    let s = size.get();
    if s <= 0.0 || !(range > 0.0) {
        return 0.0;
    }
    if s >= 1.0 {
        return 1.0;
    }
    let ratio = ((s - 1.0) * range.ln()).exp() + (s - 1.0) / range;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Scale an integral draw toward `origin`.
///
/// The ratio is applied in 53-bit fixed point over `i128`, so the whole 64-bit
/// domain scales without overflow and the result is truncated toward `origin`.
pub fn scale_integer(raw: i128, range: u128, origin: i128) -> Gen<i128> {
    Gen::new(move |_, size| Step::success(scale_integer_at(raw, range, origin, size), size))
}

pub(crate) fn scale_integer_at(raw: i128, range: u128, origin: i128, size: Size) -> i128 {
    let ratio = usable_ratio(range as f64, size);
    let fixed = (ratio * FIXED_ONE as f64).round() as i128;
    let distance = raw - origin;
    let offset = match distance.checked_mul(fixed) {
        Some(product) => product / FIXED_ONE,
        None => (distance as f64 * ratio).trunc() as i128,
    };
    origin + offset
}

/// Scale a real draw toward `origin`.
///
/// Evaluated as the convex combination `origin * (1 - r) + raw * r`, which
/// cannot overflow for finite inputs even when `raw - origin` would.
pub fn scale(raw: f64, range: f64, origin: f64) -> Gen<f64> {
    Gen::new(move |_, size| Step::success(scale_real_at(raw, range, origin, size), size))
}

pub(crate) fn scale_real_at(raw: f64, range: f64, origin: f64, size: Size) -> f64 {
    let ratio = usable_ratio(range, size);
    if ratio == 0.0 {
        origin
    } else if ratio == 1.0 {
        raw
    } else {
        origin * (1.0 - ratio) + raw * ratio
    }
}
