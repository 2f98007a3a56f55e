//! Choice combinators and generator references.
//!
//! Indices are always drawn at full size, so selection stays uniform (or
//! weight-proportional) whatever the current size state is.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Number, Value};

use crate::computation::{Gen, Size, unit};

use super::ConfigError;
use super::collections::array;
use super::numeric::{boolean, float, integer};
use super::options::GenOptions;
use super::temporal::{date, time};
use super::text::{CharClass, character, string};

/// Always produces `value`.
pub fn literal<T: Clone + 'static>(value: T) -> Gen<T> {
    unit(value)
}

fn index(len: usize) -> Result<Gen<usize>, ConfigError> {
    if len == 0 {
        return Err(ConfigError::EmptyChoice);
    }
    Ok(integer(&GenOptions::between(0, len - 1))?.resize(Size::MAX))
}

/// One of `values`, uniformly.
pub fn choose<T: Clone + 'static>(values: Vec<T>) -> Result<Gen<T>, ConfigError> {
    let values: Rc<[T]> = values.into();
    Ok(index(values.len())?.map(move |i| values[i].clone()))
}

/// Alias of [`choose`].
pub fn oneof<T: Clone + 'static>(values: Vec<T>) -> Result<Gen<T>, ConfigError> {
    choose(values)
}

/// Run one of `generators`, picked uniformly.
pub fn branch<T: 'static>(generators: Vec<Gen<T>>) -> Result<Gen<T>, ConfigError> {
    let generators: Rc<[Gen<T>]> = generators.into();
    Ok(index(generators.len())?.bind(move |i| generators[i].clone()))
}

/// Run one of `weighted` generators with probability proportional to its
/// weight.
///
/// An index in `[1, total]` is drawn and the entries are walked, subtracting
/// each weight, until the index falls inside one.
pub fn frequency<T: 'static>(weighted: Vec<(u32, Gen<T>)>) -> Result<Gen<T>, ConfigError> {
    if weighted.is_empty() {
        return Err(ConfigError::EmptyChoice);
    }
    let total: u64 = weighted.iter().map(|(weight, _)| u64::from(*weight)).sum();
    if total == 0 {
        return Err(ConfigError::ZeroTotalWeight);
    }
    let weighted: Rc<[(u32, Gen<T>)]> = weighted.into();
    let draw = integer(&GenOptions::between(1, total))?.resize(Size::MAX);
    Ok(draw.bind(move |mut remaining| {
        for (weight, generator) in weighted.iter() {
            let weight = u64::from(*weight);
            if remaining <= weight {
                return generator.clone();
            }
            remaining -= weight;
        }
        // `remaining <= total` always lands in some entry.
        weighted[weighted.len() - 1].1.clone()
    }))
}

type Constructor<T> = Rc<dyn Fn(&Catalog<T>, &[Value]) -> Result<Gen<T>, ConfigError>>;

/// Reference to a generator, resolved against a [`Catalog`].
pub enum GeneratorRef<T> {
    /// A registered generator and its positional arguments.
    Named {
        /// Registered name.
        name: String,
        /// Positional arguments.
        args: Vec<Value>,
    },
    /// A constant.
    Literal(T),
    /// A constructor receiving the catalog it is resolved against.
    Closure(Rc<dyn Fn(&Catalog<T>) -> Result<Gen<T>, ConfigError>>),
}

impl<T> GeneratorRef<T> {
    /// Reference to `name` without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        GeneratorRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Reference to `name` with positional arguments.
    pub fn call(name: impl Into<String>, args: Vec<Value>) -> Self {
        GeneratorRef::Named {
            name: name.into(),
            args,
        }
    }

    /// Reference wrapping a constructor.
    pub fn closure(f: impl Fn(&Catalog<T>) -> Result<Gen<T>, ConfigError> + 'static) -> Self {
        GeneratorRef::Closure(Rc::new(f))
    }
}

impl<T: Clone> Clone for GeneratorRef<T> {
    fn clone(&self) -> Self {
        match self {
            GeneratorRef::Named { name, args } => GeneratorRef::Named {
                name: name.clone(),
                args: args.clone(),
            },
            GeneratorRef::Literal(value) => GeneratorRef::Literal(value.clone()),
            GeneratorRef::Closure(f) => GeneratorRef::Closure(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GeneratorRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorRef::Named { name, args } => f
                .debug_struct("Named")
                .field("name", name)
                .field("args", args)
                .finish(),
            GeneratorRef::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            GeneratorRef::Closure(_) => f.write_str("Closure(..)"),
        }
    }
}

/// Named generator constructors.
///
/// The catalog is the explicit environment passed to every constructor, so
/// composite generators look their parts up here and nowhere else.
pub struct Catalog<T> {
    constructors: BTreeMap<String, Constructor<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }
}

impl<T> fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Clone + 'static> Catalog<T> {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&Catalog<T>, &[Value]) -> Result<Gen<T>, ConfigError> + 'static,
    ) -> &mut Self {
        self.constructors.insert(name.into(), Rc::new(constructor));
        self
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Invoke the constructor registered as `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Gen<T>, ConfigError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownGenerator(name.to_string()))?;
        constructor(self, args)
    }

    /// Turn a reference into a runnable computation.
    pub fn resolve(&self, reference: &GeneratorRef<T>) -> Result<Gen<T>, ConfigError> {
        match reference {
            GeneratorRef::Named { name, args } => self.call(name, args),
            GeneratorRef::Literal(value) => Ok(literal(value.clone())),
            GeneratorRef::Closure(f) => f(self),
        }
    }
}

/// [`frequency`] over references resolved against `catalog`.
pub fn freq<T: Clone + 'static>(
    catalog: &Catalog<T>,
    weighted: Vec<(u32, GeneratorRef<T>)>,
) -> Result<Gen<T>, ConfigError> {
    let resolved = weighted
        .iter()
        .map(|(weight, reference)| Ok((*weight, catalog.resolve(reference)?)))
        .collect::<Result<Vec<_>, ConfigError>>()?;
    frequency(resolved)
}

/// [`branch`] over references resolved against `catalog`.
pub fn branch_refs<T: Clone + 'static>(
    catalog: &Catalog<T>,
    references: Vec<GeneratorRef<T>>,
) -> Result<Gen<T>, ConfigError> {
    let resolved = references
        .iter()
        .map(|reference| catalog.resolve(reference))
        .collect::<Result<Vec<_>, ConfigError>>()?;
    branch(resolved)
}

impl Catalog<Value> {
    /// Built-in generators producing JSON values.
    ///
    /// | name | arguments |
    /// |------|-----------|
    /// | `literal` | value |
    /// | `boolean` | |
    /// | `integer` | min, max |
    /// | `float` | min, max |
    /// | `character` | class |
    /// | `string` | class, min length, max length |
    /// | `choose` | values... |
    /// | `date` | min, max (`YYYY-MM-DD`) |
    /// | `time` | min, max (RFC 3339) |
    /// | `array` | element name, element arguments... |
    pub fn standard() -> Self {
        let mut catalog = Catalog::<Value>::new();
        catalog
            .register("literal", |_, args| {
                Ok(literal(args.first().cloned().unwrap_or(Value::Null)))
            })
            .register("boolean", |_, _| Ok(boolean().map(Value::Bool)))
            .register("integer", |_, args| {
                let options = GenOptions {
                    min: int_arg("integer", args, 0)?,
                    max: int_arg("integer", args, 1)?,
                    ..GenOptions::new()
                };
                Ok(integer::<i64>(&options)?.map(Value::from))
            })
            .register("float", |_, args| {
                let options = GenOptions {
                    min: float_arg("float", args, 0)?,
                    max: float_arg("float", args, 1)?,
                    ..GenOptions::new()
                };
                Ok(float(&options)?.filter_map(|value| Number::from_f64(value).map(Value::Number)))
            })
            .register("character", |_, args| {
                let class = class_arg("character", args, 0)?;
                Ok(character(class)?.map(|c| Value::String(c.to_string())))
            })
            .register("string", |_, args| {
                let options = GenOptions {
                    min: int_arg("string", args, 1)?,
                    max: int_arg("string", args, 2)?,
                    ..GenOptions::new()
                }
                .with_charset(class_arg("string", args, 0)?);
                Ok(string(&options)?.map(Value::String))
            })
            .register("choose", |_, args| choose(args.to_vec()))
            .register("date", |_, args| {
                let options = GenOptions {
                    min: date_arg(args, 0)?,
                    max: date_arg(args, 1)?,
                    ..GenOptions::new()
                };
                Ok(date(&options)?.map(|day| Value::String(day.to_string())))
            })
            .register("time", |_, args| {
                let options = GenOptions {
                    min: time_arg(args, 0)?,
                    max: time_arg(args, 1)?,
                    ..GenOptions::new()
                };
                Ok(time(&options)?.map(|instant| {
                    Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
                }))
            })
            .register("array", |catalog, args| {
                let Some((Value::String(element), rest)) = args.split_first() else {
                    let reason = "first argument must name the element generator";
                    return Err(bad_argument("array", reason));
                };
                let element = catalog.call(element, rest)?;
                Ok(array(&element, &GenOptions::new())?.map(Value::Array))
            });
        catalog
    }
}

fn bad_argument(generator: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::BadArgument {
        generator: generator.to_string(),
        reason: reason.into(),
    }
}

fn present(args: &[Value], position: usize) -> Option<&Value> {
    args.get(position).filter(|value| !value.is_null())
}

fn int_arg<I: TryFrom<i64>>(
    generator: &str,
    args: &[Value],
    position: usize,
) -> Result<Option<I>, ConfigError> {
    present(args, position)
        .map(|value| {
            value.as_i64().and_then(|n| I::try_from(n).ok()).ok_or_else(|| {
                let reason = format!("argument {position} must be an integer, got {value}");
                bad_argument(generator, reason)
            })
        })
        .transpose()
}

fn float_arg(
    generator: &str,
    args: &[Value],
    position: usize,
) -> Result<Option<f64>, ConfigError> {
    present(args, position)
        .map(|value| {
            value.as_f64().ok_or_else(|| {
                let reason = format!("argument {position} must be a number, got {value}");
                bad_argument(generator, reason)
            })
        })
        .transpose()
}

fn class_arg(generator: &str, args: &[Value], position: usize) -> Result<CharClass, ConfigError> {
    match present(args, position) {
        None => Ok(CharClass::Print),
        Some(Value::String(name)) => name.parse(),
        Some(other) => Err(bad_argument(
            generator,
            format!("argument {position} must name a character class, got {other}"),
        )),
    }
}

fn date_arg(args: &[Value], position: usize) -> Result<Option<NaiveDate>, ConfigError> {
    present(args, position)
        .map(|value| {
            value
                .as_str()
                .and_then(|text| text.parse::<NaiveDate>().ok())
                .ok_or_else(|| {
                    let reason = format!("argument {position} must be YYYY-MM-DD, got {value}");
                    bad_argument("date", reason)
                })
        })
        .transpose()
}

fn time_arg(args: &[Value], position: usize) -> Result<Option<DateTime<Utc>>, ConfigError> {
    present(args, position)
        .map(|value| {
            value
                .as_str()
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .map(|instant| instant.with_timezone(&Utc))
                .ok_or_else(|| {
                    let reason = format!("argument {position} must be RFC 3339, got {value}");
                    bad_argument("time", reason)
                })
        })
        .transpose()
}
