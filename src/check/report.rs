use std::fmt::Debug;

use serde::Serialize;

use super::runner::{Outcome, RunResult};
use crate::random::SEED_ENV;

/// Supported output formats for check reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown summary.
    Markdown,
    /// JSON summary.
    Json,
}

/// Error behind an errored check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseReport {
    /// Concrete error type.
    pub type_name: String,
    /// Error message.
    pub message: String,
}

/// Serializable summary of a [`RunResult`], with inputs rendered by `Debug`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Property name.
    pub name: String,
    /// Terminal state.
    pub outcome: Outcome,
    /// Inputs the property held for.
    pub passed: usize,
    /// Attempts abandoned by a guard.
    pub skipped: usize,
    /// Seed replaying the check.
    pub seed: u64,
    /// Shrink rounds spent.
    pub shrink_rounds: usize,
    /// First failing input.
    pub counterexample: Option<String>,
    /// Minimized failing input.
    pub minimized: Option<String>,
    /// Error behind an errored check.
    pub cause: Option<CauseReport>,
}

impl<A: Debug> RunResult<A> {
    /// Summarize for reporting under `name`.
    pub fn report(&self, name: &str) -> RunReport {
        RunReport {
            name: name.to_string(),
            outcome: self.outcome,
            passed: self.passed,
            skipped: self.skipped,
            seed: self.seed,
            shrink_rounds: self.shrink_rounds,
            counterexample: self.counterexample.as_ref().map(|value| format!("{value:?}")),
            minimized: self.minimized.as_ref().map(|value| format!("{value:?}")),
            cause: self.cause.as_ref().map(|raised| CauseReport {
                type_name: raised.type_name().to_string(),
                message: raised.error().to_string(),
            }),
        }
    }
}

/// Render a check report in the requested format.
pub fn render_report(report: &RunReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|error| serde_json::json!({ "error": error.to_string() }).to_string()),
        ReportFormat::Markdown => {
            let mut out = format!("# Property {}\n\n", report.name);
            out.push_str(&format!(
                "- outcome: {}\n- passed: {}\n- skipped: {}\n- seed: {} (replay with `{}={}`)\n",
                report.outcome, report.passed, report.skipped, report.seed, SEED_ENV, report.seed
            ));
            if report.shrink_rounds > 0 {
                out.push_str(&format!("- shrink rounds: {}\n", report.shrink_rounds));
            }

            if report.counterexample.is_some() || report.minimized.is_some() {
                out.push_str("\n## Counterexample\n\n");
                if let Some(ref original) = report.counterexample {
                    out.push_str(&format!("- original: `{original}`\n"));
                }
                if let Some(ref minimized) = report.minimized {
                    out.push_str(&format!("- minimized: `{minimized}`\n"));
                }
            }

            if let Some(ref cause) = report.cause {
                out.push_str("\n## Cause\n\n");
                out.push_str(&format!("- type: {}\n", cause.type_name));
                out.push_str(&format!("- message: {}\n", cause.message));
            }

            out
        }
    }
}
