//! The generate, evaluate, shrink loop.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::RunConfig;
use super::property::{Evaluation, Property, Raised};
use super::search::{Falsifier, minimize};
use crate::computation::{Abort, Gen, run};
use crate::random::RandomSource;
use crate::shrink::Shrink;

/// Terminal state of a property check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `minpass` inputs held.
    Passed,
    /// Some input made the property return `false`.
    Falsified,
    /// The skip budget ran out first.
    Exhausted,
    /// The property raised, or a generator was misconfigured.
    Errored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Passed => "passed",
            Outcome::Falsified => "falsified",
            Outcome::Exhausted => "exhausted",
            Outcome::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// Everything a finished check reports.
#[derive(Debug, Clone)]
pub struct RunResult<A> {
    /// Terminal state.
    pub outcome: Outcome,
    /// Inputs the property held for.
    pub passed: usize,
    /// Attempts abandoned by a guard.
    pub skipped: usize,
    /// The first failing input.
    pub counterexample: Option<A>,
    /// Smallest input found that fails the same way.
    pub minimized: Option<A>,
    /// Error behind an `Errored` outcome.
    pub cause: Option<Raised>,
    /// Seed that replays this check.
    pub seed: u64,
    /// Shrink rounds spent on `minimized`.
    pub shrink_rounds: usize,
}

impl<A> RunResult<A> {
    fn finished(outcome: Outcome, passed: usize, skipped: usize, seed: u64) -> Self {
        Self {
            outcome,
            passed,
            skipped,
            counterexample: None,
            minimized: None,
            cause: None,
            seed,
            shrink_rounds: 0,
        }
    }

    /// Whether the check passed.
    pub fn is_passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Drives property checks under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    /// Runner with `config`.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Runner configured from the environment.
    pub fn from_env() -> Self {
        Self::new(RunConfig::from_env())
    }

    /// Active configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Check `property` against inputs drawn from `generator`.
    ///
    /// The source is reseeded first (from the configured seed, or a fresh
    /// one drawn from the source itself), so the returned `seed` replays the
    /// whole check.
    pub fn check<A>(
        &self,
        source: &mut RandomSource,
        generator: &Gen<A>,
        property: &Property<A>,
    ) -> RunResult<A>
    where
        A: Shrink + Clone + PartialEq + fmt::Debug + 'static,
    {
        let config = &self.config;
        let seed = match config.seed {
            Some(seed) => {
                source.set_seed(seed);
                seed
            }
            None => source.capture(),
        };
        debug!(
            property = property.name(),
            seed,
            minpass = config.minpass,
            maxskip = config.maxskip,
            "starting check"
        );

        let mut passed = 0;
        let mut skipped = 0;
        while passed < config.minpass && skipped < config.maxskip {
            let size = config.schedule.size(passed, skipped, config.minpass, config.maxskip);
            let input = match run(generator, source, size, config.retries).value {
                Ok(input) => input,
                Err(Abort::Guard) => {
                    skipped += 1;
                    continue;
                }
                Err(Abort::Invalid(error)) => {
                    warn!(property = property.name(), %error, "generator rejected its options");
                    let mut result = RunResult::finished(Outcome::Errored, passed, skipped, seed);
                    result.cause = Some(Raised::new(error));
                    return result;
                }
            };

            let (outcome, falsifier, cause) = match property.evaluate(&input) {
                Evaluation::Holds => {
                    passed += 1;
                    continue;
                }
                Evaluation::Abstained => {
                    skipped += 1;
                    continue;
                }
                Evaluation::Fails => (Outcome::Falsified, Falsifier::ReturnsFalse, None),
                Evaluation::Raised(raised) => {
                    (Outcome::Errored, Falsifier::Raises(raised.type_id()), Some(raised))
                }
            };

            let found = minimize(
                input.clone(),
                property,
                falsifier,
                source,
                config.shrink_width,
                config.max_shrink_rounds,
            );
            info!(
                property = property.name(),
                %outcome,
                passed,
                skipped,
                seed,
                counterexample = ?input,
                minimized = ?found.value,
                "check failed"
            );
            return RunResult {
                outcome,
                passed,
                skipped,
                counterexample: Some(input),
                minimized: Some(found.value),
                cause,
                seed,
                shrink_rounds: found.rounds,
            };
        }

        let outcome = if passed >= config.minpass {
            Outcome::Passed
        } else {
            Outcome::Exhausted
        };
        info!(property = property.name(), %outcome, passed, skipped, seed, "check finished");
        RunResult::finished(outcome, passed, skipped, seed)
    }
}

/// Check `property` with the environment's configuration and a fresh
/// entropy-seeded source.
pub fn check<A>(generator: &Gen<A>, property: &Property<A>) -> RunResult<A>
where
    A: Shrink + Clone + PartialEq + fmt::Debug + 'static,
{
    Runner::from_env().check(&mut RandomSource::from_entropy(), generator, property)
}
