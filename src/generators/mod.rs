//! Typed value generators built on the computation core.
//!
//! Every constructor validates its options up front and returns
//! `Result<Gen<T>, ConfigError>`, so a malformed configuration fails at the
//! first use instead of being retried as if it were a guard.

pub mod choice;
pub mod collections;
pub mod decimals;
pub mod numeric;
pub mod options;
pub mod temporal;
pub mod text;

use thiserror::Error;

pub use choice::{
    Catalog, GeneratorRef, branch, branch_refs, choose, freq, frequency, literal, oneof,
};
pub use collections::{array, map, optional, record, set};
pub use decimals::{Decimal, decimal};
pub use numeric::{Integral, boolean, float, integer};
pub use options::{Center, GenOptions};
pub use temporal::{date, time};
pub use text::{CharClass, Charset, character, string, symbol};

/// Malformed generator options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Lower bound above upper bound.
    #[error("min > max ({min} > {max})")]
    MinGreaterThanMax {
        /// Rendered lower bound.
        min: String,
        /// Rendered upper bound.
        max: String,
    },
    /// Explicit center outside the bounds.
    #[error("center {center} outside [{min}, {max}]")]
    CenterOutOfRange {
        /// Rendered center.
        center: String,
        /// Rendered lower bound.
        min: String,
        /// Rendered upper bound.
        max: String,
    },
    /// NaN, or an infinity where only a finite value makes sense.
    #[error("bound must be a number, got {0}")]
    NonFiniteBound(String),
    /// Character class name not in the table.
    #[error("unrecognized character class {0:?}")]
    UnknownCharClass(String),
    /// Character set selects no characters.
    #[error("character set is empty")]
    EmptyCharset,
    /// Choice over nothing.
    #[error("cannot choose from an empty list")]
    EmptyChoice,
    /// Weighted choice whose weights sum to zero.
    #[error("weights must sum to a positive total")]
    ZeroTotalWeight,
    /// Named generator not registered in the catalog.
    #[error("unrecognized generator {0:?}")]
    UnknownGenerator(String),
    /// Argument of a named generator has the wrong shape.
    #[error("bad argument for {generator}: {reason}")]
    BadArgument {
        /// Generator name.
        generator: String,
        /// What was wrong.
        reason: String,
    },
}
