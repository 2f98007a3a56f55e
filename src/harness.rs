//! Registration of checks with a host test framework.
//!
//! A [`Suite`] holds lazily-invoked check thunks. Running the suite turns
//! each into a [`Verdict`], the vocabulary host frameworks understand.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::check::property::catch_silently;
use crate::check::{
    Outcome, PanicError, Property, ReportFormat, RunConfig, RunResult, Runner, render_report,
};
use crate::computation::Gen;
use crate::random::RandomSource;
use crate::shrink::Shrink;

/// Host-facing result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "message", rename_all = "snake_case")]
pub enum Verdict {
    /// The check passed.
    Pass,
    /// The property was falsified or its skip budget ran out.
    Fail(String),
    /// The check was registered as pending and not run.
    Pending,
    /// The property or the check itself raised.
    Error(String),
}

impl Verdict {
    /// Whether the verdict should fail a test run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fail(_) | Verdict::Error(_))
    }
}

/// Per-check registration options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Register without running.
    pub pending: bool,
    /// Free-form labels.
    pub tags: Vec<String>,
}

impl CheckOptions {
    /// Mark the check pending.
    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Add a label.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

impl<A: Debug> RunResult<A> {
    /// Translate into a host verdict. Failure messages carry the Markdown
    /// report: minimized input, cause and replay seed.
    pub fn verdict(&self, name: &str) -> Verdict {
        let message = || render_report(&self.report(name), ReportFormat::Markdown);
        match self.outcome {
            Outcome::Passed => Verdict::Pass,
            Outcome::Falsified | Outcome::Exhausted => Verdict::Fail(message()),
            Outcome::Errored => Verdict::Error(message()),
        }
    }
}

type Thunk = Box<dyn Fn(&mut RandomSource) -> Verdict>;

struct Registered {
    name: String,
    options: CheckOptions,
    thunk: Thunk,
}

/// Outcome of one registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteEntry {
    /// Check name.
    pub name: String,
    /// Labels it was registered with.
    pub tags: Vec<String>,
    /// Its verdict.
    pub verdict: Verdict,
}

/// Ordered collection of registered checks.
#[derive(Default)]
pub struct Suite {
    checks: Vec<Registered>,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite").field("checks", &self.names()).finish()
    }
}

impl Suite {
    /// Empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check. `thunk` only runs from [`Suite::run_all`].
    pub fn register_check(
        &mut self,
        name: impl Into<String>,
        options: CheckOptions,
        thunk: impl Fn(&mut RandomSource) -> Verdict + 'static,
    ) -> &mut Self {
        self.checks.push(Registered {
            name: name.into(),
            options,
            thunk: Box::new(thunk),
        });
        self
    }

    /// Register a property check driven by a [`Runner`] under `config`.
    pub fn register_property<A>(
        &mut self,
        options: CheckOptions,
        config: RunConfig,
        generator: Gen<A>,
        property: Property<A>,
    ) -> &mut Self
    where
        A: Shrink + Clone + PartialEq + Debug + 'static,
    {
        let name = property.name().to_string();
        let runner = Runner::new(config);
        self.register_check(name.clone(), options, move |source| {
            runner.check(source, &generator, &property).verdict(&name)
        })
    }

    /// Registered names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|check| check.name.as_str()).collect()
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check in registration order. Pending checks are not
    /// invoked and a panicking thunk yields [`Verdict::Error`].
    pub fn run_all(&self, source: &mut RandomSource) -> Vec<SuiteEntry> {
        self.checks
            .iter()
            .map(|check| {
                let verdict = if check.options.pending {
                    debug!(check = %check.name, "pending");
                    Verdict::Pending
                } else {
                    catch_silently(|| (check.thunk)(source)).unwrap_or_else(|payload| {
                        Verdict::Error(PanicError::from_payload(payload.as_ref()).message)
                    })
                };
                info!(check = %check.name, failed = verdict.is_failure(), "check complete");
                SuiteEntry {
                    name: check.name.clone(),
                    tags: check.options.tags.clone(),
                    verdict,
                }
            })
            .collect()
    }
}
