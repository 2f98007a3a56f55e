//! # propcheck
//!
//! `propcheck` is a property-based testing engine organized around:
//! - `computation`: the size-aware generator computation [`computation::Gen`]
//! - `generators`: option-driven generator constructors and the named catalog
//! - `shrink`: per-type shrink candidates via [`shrink::Shrink`]
//! - `check`: the runner loop, counterexample minimization and reports
//! - `harness`: check registration and verdicts for a host test framework
//!
//! Every check is reproducible from the seed it reports.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod check;
pub mod computation;
pub mod generators;
pub mod harness;
pub mod prelude;
pub mod random;
pub mod shrink;
