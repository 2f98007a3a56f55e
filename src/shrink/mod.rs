//! Per-type shrinking.
//!
//! [`Shrink::shrink`] lists finitely many candidates that are no larger than
//! the value, measured from the type's origin. The origin itself shrinks to
//! nothing, so repeated shrinking always bottoms out.

mod aggregate;
mod temporal;

pub use aggregate::MAX_TUPLE_CANDIDATES;
pub use temporal::{DATE_ORIGIN_DAYS, TIME_HALVING};

use crate::generators::Decimal;

/// Types with a shrink relation.
pub trait Shrink: Sized {
    /// Smaller candidates, most aggressive first. Pure and repeatable.
    fn shrink(&self) -> Vec<Self>;
}

/// Limits of the halving sequence for real-valued types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halving {
    /// Stop once the halved distance drops below this.
    pub epsilon: f64,
    /// Stop after this many halvings.
    pub limit: usize,
}

/// Halving limits for `f32`, `f64`.
pub const REAL_HALVING: Halving = Halving {
    epsilon: 1e-5,
    limit: 10,
};

/// Integer candidates between `origin` and `value`.
///
/// The origin comes first. Then, for each halving `h` of the distance,
/// `origin + h` and `value - h`. Every candidate is strictly closer to the
/// origin than `value`.
pub fn toward_integer(value: i128, origin: i128) -> Vec<i128> {
    if value == origin {
        return Vec::new();
    }
    let mut candidates = vec![origin];
    let mut half = (value - origin) / 2;
    while half != 0 {
        for candidate in [origin + half, value - half] {
            if candidate != value && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        half /= 2;
    }
    candidates
}

/// Real candidates between `origin` and `value`, following the same pattern
/// as [`toward_integer`] until the halved distance falls below
/// `halving.epsilon` or `halving.limit` halvings were made.
///
/// NaN and infinities shrink straight to the origin.
pub fn toward_real(value: f64, origin: f64, halving: Halving) -> Vec<f64> {
    if value == origin {
        return Vec::new();
    }
    if !value.is_finite() {
        return vec![origin];
    }
    let mut candidates = vec![origin];
    let mut half = value / 2.0 - origin / 2.0;
    let mut steps = 0;
    while half.abs() >= halving.epsilon && steps < halving.limit {
        for candidate in [origin + half, value - half] {
            if candidate != value && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        half /= 2.0;
        steps += 1;
    }
    candidates
}

macro_rules! shrink_integer {
    ($($t:ty),* $(,)?) => {$(
        impl Shrink for $t {
            fn shrink(&self) -> Vec<Self> {
                toward_integer(*self as i128, 0)
                    .into_iter()
                    .filter_map(|candidate| <$t>::try_from(candidate).ok())
                    .collect()
            }
        }
    )*};
}

shrink_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Shrink for f64 {
    fn shrink(&self) -> Vec<Self> {
        toward_real(*self, 0.0, REAL_HALVING)
    }
}

impl Shrink for f32 {
    fn shrink(&self) -> Vec<Self> {
        let mut candidates: Vec<f32> = Vec::new();
        for candidate in toward_real(f64::from(*self), 0.0, REAL_HALVING) {
            let narrowed = candidate as f32;
            if narrowed != *self && !candidates.contains(&narrowed) {
                candidates.push(narrowed);
            }
        }
        candidates
    }
}

impl Shrink for bool {
    fn shrink(&self) -> Vec<Self> {
        if *self { vec![false] } else { Vec::new() }
    }
}

impl Shrink for char {
    fn shrink(&self) -> Vec<Self> {
        let c = *self;
        let mut candidates = Vec::new();
        let mut offer = |candidate: char| {
            if candidate != c && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };
        if c.is_ascii_uppercase() {
            offer(c.to_ascii_lowercase());
        }
        if c.is_whitespace() {
            offer(' ');
        }
        if c.is_ascii_lowercase() {
            offer('a');
        }
        if c.is_ascii_uppercase() {
            offer('A');
        }
        if c.is_ascii_digit() {
            offer('0');
        }
        candidates
    }
}

impl Shrink for Decimal {
    fn shrink(&self) -> Vec<Self> {
        toward_integer(self.units, 0)
            .into_iter()
            .map(|units| Decimal::new(units, self.places))
            .collect()
    }
}
