//! Deferred, size-parameterized computations.
//!
//! A [`Gen<T>`] is a function from the current size state to a [`Step<T>`]:
//! the produced value (or the reason the attempt was abandoned) plus the size
//! state to hand to the next computation. Computations are composed with
//! [`unit`], [`bind`] and [`guard`], and only do work when driven by [`run`] or
//! [`eval`] against an explicit [`RandomSource`].
//!
//! The usual monad laws hold:
//!
//! ```rust
//! use propcheck::computation::{bind, eval, unit, Gen, Size};
//! use propcheck::random::RandomSource;
//!
//! let f = |x: i64| unit(x * 2);
//! let mut source = RandomSource::from_seed(1);
//! assert_eq!(
//!     eval(&bind(&unit(21), f), &mut source, Size::MAX, 0).unwrap(),
//!     eval(&f(21), &mut source, Size::MAX, 0).unwrap(),
//! );
//! ```

pub mod scale;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generators::ConfigError;
use crate::random::RandomSource;

pub use scale::{scale, scale_integer, usable_ratio};

/// Size state in `[0, 1]`.
///
/// `0` pins generated values at their configured center, `1` lets them span
/// the full configured range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Size(f64);

impl Size {
    /// Smallest size: values collapse onto their center.
    pub const MIN: Size = Size(0.0);
    /// Largest size: values span their whole range.
    pub const MAX: Size = Size(1.0);

    /// Clamp `value` into `[0, 1]`; NaN becomes `0`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Size(value.clamp(0.0, 1.0))
        }
    }

    /// Raw size value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Size {
    fn from(value: f64) -> Self {
        Size::new(value)
    }
}

impl From<Size> for f64 {
    fn from(size: Size) -> Self {
        size.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Why an attempt produced no value.
#[derive(Debug, Clone, PartialEq)]
pub enum Abort {
    /// Voluntary abstention; the attempt may be retried.
    Guard,
    /// Malformed generator options; never retried.
    Invalid(ConfigError),
}

/// Result of driving a computation once: `(value, size', success)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<T> {
    /// Produced value, or why there is none.
    pub value: Result<T, Abort>,
    /// Size state after the computation.
    pub size: Size,
}

impl<T> Step<T> {
    /// Successful step.
    pub fn success(value: T, size: Size) -> Self {
        Self {
            value: Ok(value),
            size,
        }
    }

    /// Abandoned step.
    pub fn abort(abort: Abort, size: Size) -> Self {
        Self {
            value: Err(abort),
            size,
        }
    }

    /// Success flag of the triple.
    pub fn is_success(&self) -> bool {
        self.value.is_ok()
    }
}

/// Errors surfaced by [`eval`] and [`sample`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Every attempt was guarded away.
    #[error("exceeded limit {retries}: {failures} failed guards")]
    Exhausted {
        /// Attempts allowed.
        retries: usize,
        /// Guard failures observed.
        failures: usize,
    },
    /// Generator options were rejected.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

type Thunk<T> = dyn Fn(&mut RandomSource, Size) -> Step<T>;

/// Deferred computation producing a `T`.
pub struct Gen<T> {
    thunk: Rc<Thunk<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Self {
            thunk: Rc::clone(&self.thunk),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen")
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: 'static> Gen<T> {
    /// Wrap a raw step function.
    pub fn new(step: impl Fn(&mut RandomSource, Size) -> Step<T> + 'static) -> Self {
        Self {
            thunk: Rc::new(step),
        }
    }

    /// Drive the computation once.
    pub fn apply(&self, source: &mut RandomSource, size: Size) -> Step<T> {
        (self.thunk)(source, size)
    }

    /// Computation that always fails with a configuration error.
    pub fn invalid(error: ConfigError) -> Self {
        Self::new(move |_, size| Step::abort(Abort::Invalid(error.clone()), size))
    }

    /// Chain a computation whose shape depends on this one's value.
    pub fn bind<U: 'static>(&self, f: impl Fn(T) -> Gen<U> + 'static) -> Gen<U> {
        let first = self.clone();
        Gen::new(move |source, size| {
            let step = first.apply(source, size);
            match step.value {
                Ok(value) => f(value).apply(source, step.size),
                Err(abort) => Step::abort(abort, step.size),
            }
        })
    }

    /// Transform the produced value.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Gen<U> {
        let inner = self.clone();
        Gen::new(move |source, size| {
            let step = inner.apply(source, size);
            Step {
                value: step.value.map(&f),
                size: step.size,
            }
        })
    }

    /// Keep only values satisfying `predicate`; others abort with a guard.
    pub fn such_that(&self, predicate: impl Fn(&T) -> bool + 'static) -> Gen<T> {
        let inner = self.clone();
        Gen::new(move |source, size| {
            let step = inner.apply(source, size);
            match step.value {
                Ok(value) if predicate(&value) => Step::success(value, step.size),
                Ok(_) => Step::abort(Abort::Guard, step.size),
                Err(abort) => Step::abort(abort, step.size),
            }
        })
    }

    /// Transform the produced value, abandoning the attempt with a guard when
    /// `f` yields `None`.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(T) -> Option<U> + 'static) -> Gen<U> {
        let inner = self.clone();
        Gen::new(move |source, size| {
            let step = inner.apply(source, size);
            match step.value.map(&f) {
                Ok(Some(value)) => Step::success(value, step.size),
                Ok(None) => Step::abort(Abort::Guard, step.size),
                Err(abort) => Step::abort(abort, step.size),
            }
        })
    }

    /// Run at a fixed size, then hand the outer size state back.
    pub fn resize(&self, fixed: Size) -> Gen<T> {
        let inner = self.clone();
        Gen::new(move |source, size| {
            let step = inner.apply(source, fixed);
            Step {
                value: step.value,
                size,
            }
        })
    }

    /// Build a computation from the current size.
    pub fn sized(f: impl Fn(Size) -> Gen<T> + 'static) -> Gen<T> {
        Gen::new(move |source, size| f(size).apply(source, size))
    }
}

impl<T: Clone + 'static> Gen<T> {
    /// Inject a value without touching the size state.
    pub fn unit(value: T) -> Self {
        Self::new(move |_, size| Step::success(value.clone(), size))
    }
}

impl Gen<()> {
    /// Succeeds exactly when `condition` holds.
    pub fn guard(condition: bool) -> Self {
        Self::new(move |_, size| {
            if condition {
                Step::success((), size)
            } else {
                Step::abort(Abort::Guard, size)
            }
        })
    }
}

/// Identity injection: `(value, size, true)`.
pub fn unit<T: Clone + 'static>(value: T) -> Gen<T> {
    Gen::unit(value)
}

/// Run `first`, then the computation `f` builds from its value.
///
/// On failure `f` is never invoked and the failure is passed through.
pub fn bind<T: 'static, U: 'static>(first: &Gen<T>, f: impl Fn(T) -> Gen<U> + 'static) -> Gen<U> {
    first.bind(f)
}

/// Computation whose success flag is `condition`.
pub fn guard(condition: bool) -> Gen<()> {
    Gen::guard(condition)
}

/// Uniform integer in `[0, limit)`.
pub fn rand(limit: u128) -> Gen<u128> {
    Gen::new(move |source, size| Step::success(source.below(limit), size))
}

/// Uniform real in `[0, limit)`.
pub fn rand_real(limit: f64) -> Gen<f64> {
    Gen::new(move |source, size| Step::success(source.below_f64(limit), size))
}

/// The current size state as a value.
pub fn current_size() -> Gen<Size> {
    Gen::new(|_, size| Step::success(size, size))
}

/// Replace the size state for every following computation.
pub fn set_size(size: Size) -> Gen<()> {
    Gen::new(move |_, _| Step::success((), size))
}

/// Run each computation left to right, threading the size state, and collect
/// the values in order.
pub fn sequence<T: 'static>(computations: Vec<Gen<T>>) -> Gen<Vec<T>> {
    Gen::new(move |source, size| {
        let mut values = Vec::with_capacity(computations.len());
        let mut size = size;
        for computation in &computations {
            let step = computation.apply(source, size);
            size = step.size;
            match step.value {
                Ok(value) => values.push(value),
                Err(abort) => return Step::abort(abort, size),
            }
        }
        Step::success(values, size)
    })
}

/// Remove one level of nesting.
pub fn join<T: 'static>(nested: &Gen<Gen<T>>) -> Gen<T> {
    nested.bind(|inner| inner)
}

/// Pair two computations.
pub fn zip<A: Clone + 'static, B: 'static>(a: &Gen<A>, b: &Gen<B>) -> Gen<(A, B)> {
    let b = b.clone();
    a.bind(move |x| b.map(move |y| (x.clone(), y)))
}

/// Combine three computations into a triple.
pub fn zip3<A: Clone + 'static, B: Clone + 'static, C: 'static>(
    a: &Gen<A>,
    b: &Gen<B>,
    c: &Gen<C>,
) -> Gen<(A, B, C)> {
    zip(&zip(a, b), c).map(|((x, y), z)| (x, y, z))
}

/// Drive `computation` at `size`, retrying guard failures up to `retries`
/// times. Returns the final step whatever its outcome.
pub fn run<T: 'static>(
    computation: &Gen<T>,
    source: &mut RandomSource,
    size: Size,
    retries: usize,
) -> Step<T> {
    let mut step = computation.apply(source, size);
    let mut remaining = retries;
    while matches!(step.value, Err(Abort::Guard)) && remaining > 0 {
        remaining -= 1;
        step = computation.apply(source, size);
    }
    step
}

/// Like [`run`] but returns only the value.
pub fn eval<T: 'static>(
    computation: &Gen<T>,
    source: &mut RandomSource,
    size: Size,
    retries: usize,
) -> Result<T, EvalError> {
    let step = run(computation, source, size, retries);
    match step.value {
        Ok(value) => Ok(value),
        Err(Abort::Guard) => Err(EvalError::Exhausted {
            retries,
            failures: retries + 1,
        }),
        Err(Abort::Invalid(error)) => Err(EvalError::Invalid(error)),
    }
}

/// Generate `count` values outside of a property check.
///
/// Up to `count * limit` guard failures are tolerated before giving up.
pub fn sample<T: 'static>(
    computation: &Gen<T>,
    source: &mut RandomSource,
    count: usize,
    size: Size,
    limit: usize,
) -> Result<Vec<T>, EvalError> {
    let budget = count.saturating_mul(limit.max(1));
    let mut failures = 0usize;
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        match computation.apply(source, size).value {
            Ok(value) => values.push(value),
            Err(Abort::Guard) => {
                failures += 1;
                if failures > budget {
                    return Err(EvalError::Exhausted {
                        retries: budget,
                        failures,
                    });
                }
            }
            Err(Abort::Invalid(error)) => return Err(EvalError::Invalid(error)),
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RandomSource {
        RandomSource::from_seed(42)
    }

    #[test]
    fn unit_returns_value_and_size_unchanged() {
        let size = Size::new(0.25);
        assert_eq!(run(&unit(5_i64), &mut source(), size, 0), Step::success(5, size));
    }

    #[test]
    fn left_identity() {
        let f = |x: u128| rand(x + 10).map(move |r| r + x);
        let left = eval(&bind(&unit(3_u128), f), &mut source(), Size::MAX, 0);
        let right = eval(&f(3), &mut source(), Size::MAX, 0);
        assert_eq!(left, right);
    }

    #[test]
    fn right_identity() {
        let m = rand(1_000);
        let left = eval(&bind(&m, unit), &mut source(), Size::MAX, 0);
        let right = eval(&m, &mut source(), Size::MAX, 0);
        assert_eq!(left, right);
    }

    #[test]
    fn associativity() {
        let m = rand(50);
        let f = |x: u128| rand(x + 1);
        let g = |y: u128| unit(y * 3);
        let left = bind(&bind(&m, f), g);
        let right = bind(&m, move |x| bind(&f(x), g));
        assert_eq!(
            eval(&left, &mut source(), Size::MAX, 0),
            eval(&right, &mut source(), Size::MAX, 0)
        );
    }

    #[test]
    fn bind_short_circuits_on_guard() {
        let called = Rc::new(std::cell::Cell::new(false));
        let seen = Rc::clone(&called);
        let computation = bind(&guard(false), move |_| {
            seen.set(true);
            unit(1)
        });
        let step = run(&computation, &mut source(), Size::MAX, 3);
        assert_eq!(step.value, Err(Abort::Guard));
        assert!(!called.get());
    }

    #[test]
    fn run_retries_until_guard_passes() {
        let computation = rand(4).such_that(|x| *x == 0);
        let step = run(&computation, &mut source(), Size::MAX, 200);
        assert_eq!(step.value, Ok(0));
    }

    #[test]
    fn eval_reports_exhaustion() {
        let err = eval(&guard(false), &mut source(), Size::MAX, 4).unwrap_err();
        assert_eq!(
            err,
            EvalError::Exhausted {
                retries: 4,
                failures: 5
            }
        );
        assert_eq!(err.to_string(), "exceeded limit 4: 5 failed guards");
    }

    #[test]
    fn invalid_is_not_retried() {
        let attempts = Rc::new(std::cell::Cell::new(0));
        let counter = Rc::clone(&attempts);
        let computation = Gen::new(move |_, size| {
            counter.set(counter.get() + 1);
            Step::<()>::abort(Abort::Invalid(ConfigError::EmptyChoice), size)
        });
        let err = eval(&computation, &mut source(), Size::MAX, 10).unwrap_err();
        assert_eq!(err, EvalError::Invalid(ConfigError::EmptyChoice));
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn filter_map_guards_on_none() {
        let halves = rand(10).filter_map(|x| (x % 2 == 0).then_some(x / 2));
        let step = run(&halves, &mut source(), Size::MAX, 100);
        assert!(matches!(step.value, Ok(x) if x < 5));
        let never = unit(1_u8).filter_map(|_| None::<u8>);
        assert_eq!(run(&never, &mut source(), Size::MAX, 3).value, Err(Abort::Guard));
    }

    #[test]
    fn sequence_preserves_order_and_threads_size() {
        let shrink_size =
            Gen::new(|_, size: Size| Step::success(size.get(), Size::new(size.get() / 2.0)));
        let computation = sequence(vec![unit(-1.0), shrink_size.clone(), shrink_size]);
        let step = run(&computation, &mut source(), Size::MAX, 0);
        assert_eq!(step.value, Ok(vec![-1.0, 1.0, 0.5]));
        assert_eq!(step.size, Size::new(0.25));
    }

    #[test]
    fn resize_restores_outer_size() {
        let computation = current_size().resize(Size::new(0.5));
        let step = run(&computation, &mut source(), Size::new(0.1), 0);
        assert_eq!(step.value, Ok(Size::new(0.5)));
        assert_eq!(step.size, Size::new(0.1));
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(Size::new(3.0), Size::MAX);
        assert_eq!(Size::new(-1.0), Size::MIN);
        assert_eq!(Size::new(f64::NAN), Size::MIN);
        let decoded: Size = serde_json::from_str("7.5").unwrap();
        assert_eq!(decoded, Size::MAX);
    }

    #[test]
    fn zip_pairs_values() {
        let pair = zip(&unit(1_u8), &unit("a"));
        assert_eq!(eval(&pair, &mut source(), Size::MAX, 0), Ok((1, "a")));
        let triple = zip3(&unit(1_u8), &unit(2_u8), &unit(3_u8));
        assert_eq!(eval(&triple, &mut source(), Size::MAX, 0), Ok((1, 2, 3)));
    }

    #[test]
    fn sample_collects_requested_count() {
        let values = sample(&rand(10), &mut source(), 25, Size::MAX, 10).unwrap();
        assert_eq!(values.len(), 25);
        assert!(values.iter().all(|v| *v < 10));
        assert!(matches!(
            sample(&guard(false), &mut source(), 2, Size::MAX, 3),
            Err(EvalError::Exhausted { retries: 6, .. })
        ));
    }
}
