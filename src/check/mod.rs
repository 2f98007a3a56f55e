//! Property checking: run configuration, properties, the runner loop,
//! counterexample minimization and reporting.

pub mod config;
pub mod property;
/// Human and machine readable check summaries.
pub mod report;
pub mod runner;
pub mod search;

pub use config::{MAXSKIP_ENV, MINPASS_ENV, RunConfig, Schedule};
pub use property::{Evaluation, PanicError, PropResult, Property, PropertyError, Raised, guard};
pub use report::{CauseReport, ReportFormat, RunReport, render_report};
pub use runner::{Outcome, RunResult, Runner, check};
pub use search::{Falsifier, Minimized, minimize};
