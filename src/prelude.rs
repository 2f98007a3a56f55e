//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust,ignore
//! use propcheck::prelude::*;
//! ```

pub use crate::check::{
    Outcome, PropResult, Property, PropertyError, RunConfig, RunResult, Runner, Schedule, check,
    guard,
};
pub use crate::computation::{Gen, Size, sample, unit, zip, zip3};
pub use crate::generators::{
    Catalog, Center, CharClass, ConfigError, Decimal, GenOptions, GeneratorRef, array, boolean,
    branch, character, choose, date, decimal, float, freq, frequency, integer, literal, map, oneof,
    optional, record, set, string, symbol, time,
};
pub use crate::harness::{CheckOptions, Suite, Verdict};
pub use crate::random::RandomSource;
pub use crate::shrink::Shrink;
