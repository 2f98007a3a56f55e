//! Per-invocation generator options.

use std::fmt::Display;

use super::ConfigError;
use super::text::Charset;

/// Value that size-limited generation is biased toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Center<B> {
    /// The lower bound.
    Min,
    /// Midpoint of the bounds.
    Mid,
    /// The upper bound.
    Max,
    /// An explicit value inside the bounds.
    Value(B),
}

impl<B> Center<B> {
    /// Borrow the explicit value.
    pub fn by_ref(&self) -> Center<&B> {
        match self {
            Center::Min => Center::Min,
            Center::Mid => Center::Mid,
            Center::Max => Center::Max,
            Center::Value(value) => Center::Value(value),
        }
    }

    /// Same center with an explicit value carried into another domain.
    pub fn map_value<C>(self, f: impl FnOnce(B) -> C) -> Center<C> {
        match self {
            Center::Min => Center::Min,
            Center::Mid => Center::Mid,
            Center::Max => Center::Max,
            Center::Value(value) => Center::Value(f(value)),
        }
    }
}

/// Options recognized by the generators.
///
/// Bounds are in the generator's own domain: values for numbers and dates,
/// lengths for strings and collections. Unset fields fall back to the
/// generator's defaults.
#[derive(Debug, Clone, Copy)]
pub struct GenOptions<B> {
    /// Lower bound.
    pub min: Option<B>,
    /// Upper bound.
    pub max: Option<B>,
    /// Center; `None` means the generator's default.
    pub center: Option<Center<B>>,
    /// Character set for text generators.
    pub charset: Option<Charset>,
    /// Whether `max` itself may be produced.
    pub inclusive: bool,
}

impl<B> Default for GenOptions<B> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            center: None,
            charset: None,
            inclusive: true,
        }
    }
}

impl<B> GenOptions<B> {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options bounded to `[min, max]`.
    pub fn between(min: B, max: B) -> Self {
        Self::default().with_min(min).with_max(max)
    }

    /// Set the lower bound.
    pub fn with_min(mut self, min: B) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn with_max(mut self, max: B) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the center.
    pub fn with_center(mut self, center: Center<B>) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the character set.
    pub fn with_charset(mut self, charset: impl Into<Charset>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Choose whether `max` is a possible result.
    pub fn with_inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    /// Same options in another bound domain.
    pub(crate) fn map_bounds<C>(&self, f: impl Fn(&B) -> C) -> GenOptions<C> {
        GenOptions {
            min: self.min.as_ref().map(&f),
            max: self.max.as_ref().map(&f),
            center: self
                .center
                .as_ref()
                .map(|center| center.by_ref().map_value(&f)),
            charset: self.charset,
            inclusive: self.inclusive,
        }
    }
}

/// Check `min <= max`.
pub(crate) fn check_order<B: PartialOrd + Display>(min: &B, max: &B) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::MinGreaterThanMax {
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Resolve `center` against validated bounds, `midpoint` supplying `Mid`.
pub(crate) fn resolve_center<B: PartialOrd + Display + Copy>(
    center: Center<B>,
    min: B,
    max: B,
    midpoint: impl FnOnce(B, B) -> B,
) -> Result<B, ConfigError> {
    match center {
        Center::Min => Ok(min),
        Center::Max => Ok(max),
        Center::Mid => Ok(midpoint(min, max)),
        Center::Value(value) => {
            if value >= min && value <= max {
                Ok(value)
            } else {
                Err(ConfigError::CenterOutOfRange {
                    center: value.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let options = GenOptions::between(1_i64, 9)
            .with_center(Center::Value(4))
            .with_inclusive(false);
        assert_eq!(options.min, Some(1));
        assert_eq!(options.max, Some(9));
        assert_eq!(options.center, Some(Center::Value(4)));
        assert!(!options.inclusive);
        assert!(GenOptions::<i64>::new().inclusive);
    }

    #[test]
    fn centers_borrow_and_map_values() {
        let center = Center::Value(String::from("mid"));
        assert_eq!(center.by_ref().map_value(|value| value.len()), Center::Value(3));
        assert_eq!(Center::<String>::Max.by_ref().map_value(|value| value.len()), Center::Max);
        let options = GenOptions::between(2_i64, 8).with_center(Center::Value(5));
        let doubled = options.map_bounds(|bound| bound * 2);
        assert_eq!((doubled.min, doubled.max), (Some(4), Some(16)));
        assert_eq!(doubled.center, Some(Center::Value(10)));
    }

    #[test]
    fn center_resolution() {
        let mid = |a: i64, b: i64| a + (b - a).div_euclid(2);
        assert_eq!(resolve_center(Center::Mid, 0, 9, mid), Ok(4));
        assert_eq!(resolve_center(Center::Min, 0, 9, mid), Ok(0));
        assert_eq!(resolve_center(Center::Max, 0, 9, mid), Ok(9));
        assert!(matches!(
            resolve_center(Center::Value(10), 0, 9, mid),
            Err(ConfigError::CenterOutOfRange { .. })
        ));
    }

    #[test]
    fn order_check_reports_bounds() {
        let err = check_order(&5, &1).unwrap_err();
        assert_eq!(err.to_string(), "min > max (5 > 1)");
    }
}
