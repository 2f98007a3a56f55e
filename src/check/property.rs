//! Properties and the errors they raise.

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::{Arc, Once};

use thiserror::Error;

/// What a property returns: whether it held, or why it could not say.
pub type PropResult = Result<bool, PropertyError>;

/// Non-boolean outcome of a property.
///
/// Any `std::error::Error` converts into [`PropertyError::Raised`], so
/// fallible code inside a property can use `?` directly.
#[derive(Debug, Clone)]
pub enum PropertyError {
    /// Voluntary abstention, counted as a skip.
    Guard,
    /// An error unrelated to guarding.
    Raised(Raised),
}

impl<E: StdError + Send + Sync + 'static> From<E> for PropertyError {
    fn from(error: E) -> Self {
        PropertyError::Raised(Raised::new(error))
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::Guard => f.write_str("guard failed"),
            PropertyError::Raised(raised) => fmt::Display::fmt(raised, f),
        }
    }
}

/// Abstain from the current input unless `condition` holds.
pub fn guard(condition: bool) -> Result<(), PropertyError> {
    if condition { Ok(()) } else { Err(PropertyError::Guard) }
}

/// An error raised by a property, with its concrete type recorded.
#[derive(Clone)]
pub struct Raised {
    type_id: TypeId,
    type_name: &'static str,
    error: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Raised {
    /// Wrap `error`, remembering its concrete type.
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            error: Arc::new(error),
        }
    }

    /// Concrete type of the wrapped error.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the concrete type of the wrapped error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the wrapped error is an `E`.
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    /// The wrapped error as an `E`, if it is one.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Whether both errors have the same concrete type.
    pub fn same_kind(&self, other: &Raised) -> bool {
        self.type_id == other.type_id
    }

    /// The wrapped error.
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("type_name", &self.type_name)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.error)
    }
}

/// A panic caught while evaluating a property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("property panicked: {message}")]
pub struct PanicError {
    /// Panic payload, when it was a string.
    pub message: String,
}

impl PanicError {
    pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Run `f`, catching a panic without the panic hook reporting it. Other
/// threads keep the previously installed hook.
pub(crate) fn catch_silently<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });
    let outer = SILENCED.with(|flag| flag.replace(true));
    let result = catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|flag| flag.set(outer));
    result
}

/// Classified result of evaluating a property once.
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// Returned `true`.
    Holds,
    /// Returned `false`.
    Fails,
    /// Abstained through a guard.
    Abstained,
    /// Raised an error or panicked.
    Raised(Raised),
}

type Predicate<A> = dyn Fn(&A) -> PropResult;

/// Named predicate over generated inputs. Multi-argument properties take a
/// tuple.
pub struct Property<A> {
    name: String,
    predicate: Rc<Predicate<A>>,
}

impl<A> Clone for Property<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<A> fmt::Debug for Property<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

impl<A: 'static> Property<A> {
    /// Property from a predicate that may abstain or raise.
    pub fn new(name: impl Into<String>, predicate: impl Fn(&A) -> PropResult + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Rc::new(predicate),
        }
    }

    /// Property from a plain boolean predicate.
    pub fn predicate(name: impl Into<String>, predicate: impl Fn(&A) -> bool + 'static) -> Self {
        Self::new(name, move |input| Ok(predicate(input)))
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate on `input`. Panics are caught quietly and reported as
    /// [`PanicError`], so shrinking a panicking property does not flood
    /// stderr.
    pub fn evaluate(&self, input: &A) -> Evaluation {
        match catch_silently(|| (self.predicate)(input)) {
            Ok(Ok(true)) => Evaluation::Holds,
            Ok(Ok(false)) => Evaluation::Fails,
            Ok(Err(PropertyError::Guard)) => Evaluation::Abstained,
            Ok(Err(PropertyError::Raised(raised))) => Evaluation::Raised(raised),
            Err(payload) => {
                Evaluation::Raised(Raised::new(PanicError::from_payload(payload.as_ref())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("odd input {0}")]
    struct OddInput(u32);

    #[derive(Debug, Error)]
    #[error("other")]
    struct Other;

    fn even_only(x: &u32) -> PropResult {
        if x % 2 == 1 {
            return Err(OddInput(*x).into());
        }
        guard(*x != 0)?;
        Ok(*x < 100)
    }

    #[test]
    fn evaluations_are_classified() {
        let property = Property::new("even_only", even_only);
        assert!(matches!(property.evaluate(&2), Evaluation::Holds));
        assert!(matches!(property.evaluate(&200), Evaluation::Fails));
        assert!(matches!(property.evaluate(&0), Evaluation::Abstained));
        match property.evaluate(&3) {
            Evaluation::Raised(raised) => {
                assert!(raised.is::<OddInput>());
                assert!(!raised.is::<Other>());
                assert_eq!(raised.downcast_ref::<OddInput>().map(|e| e.0), Some(3));
                assert!(raised.type_name().ends_with("OddInput"));
                assert_eq!(raised.error().to_string(), "odd input 3");
            }
            other => panic!("expected a raised error, got {other:?}"),
        }
    }

    #[test]
    fn raised_kinds_compare_by_type() {
        let a = Raised::new(OddInput(1));
        let b = Raised::new(OddInput(5));
        let c = Raised::new(Other);
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&c));
    }

    #[test]
    fn panics_become_panic_errors() {
        let property = Property::<u8>::predicate("explodes", |x| panic!("boom at {x}"));
        match property.evaluate(&4) {
            Evaluation::Raised(raised) => {
                assert_eq!(
                    raised.downcast_ref::<PanicError>(),
                    Some(&PanicError {
                        message: "boom at 4".into()
                    })
                );
            }
            other => panic!("expected a caught panic, got {other:?}"),
        }
        assert!(!SILENCED.with(Cell::get));
    }

    #[test]
    fn silencing_nests_and_restores() {
        let inner = catch_silently(|| {
            let nested = catch_silently(|| panic!("inner"));
            assert!(nested.is_err());
            assert!(SILENCED.with(Cell::get));
            7
        });
        assert_eq!(inner.ok(), Some(7));
        assert!(!SILENCED.with(Cell::get));
    }
}
