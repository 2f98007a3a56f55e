//! Property run configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::computation::Size;
use crate::random::SEED_ENV;

/// Environment variable overriding [`RunConfig::minpass`].
pub const MINPASS_ENV: &str = "PROPCHECK_MINPASS";
/// Environment variable overriding [`RunConfig::maxskip`].
pub const MAXSKIP_ENV: &str = "PROPCHECK_MAXSKIP";

/// Size state for the next attempt, from `(passed, skipped, minpass, maxskip)`.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// `passed / minpass`.
    #[default]
    Linear,
    /// `min(passed + skipped, minpass) / minpass`, so skips grow the size too.
    Stepped,
    /// The same size for every attempt.
    Constant {
        /// Size used for every attempt.
        size: f64,
    },
    /// Caller-supplied schedule.
    #[serde(skip)]
    Custom(fn(usize, usize, usize, usize) -> f64),
}

impl Schedule {
    /// Size for the next attempt, clamped into `[0, 1]`.
    pub fn size(&self, passed: usize, skipped: usize, minpass: usize, maxskip: usize) -> Size {
        let raw = match self {
            Schedule::Linear if minpass == 0 => 1.0,
            Schedule::Linear => passed as f64 / minpass as f64,
            Schedule::Stepped if minpass == 0 => 1.0,
            Schedule::Stepped => (passed + skipped).min(minpass) as f64 / minpass as f64,
            Schedule::Constant { size } => *size,
            Schedule::Custom(schedule) => schedule(passed, skipped, minpass, maxskip),
        };
        Size::new(raw)
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Linear => f.write_str("Linear"),
            Schedule::Stepped => f.write_str("Stepped"),
            Schedule::Constant { size } => f.debug_struct("Constant").field("size", size).finish(),
            Schedule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Configuration for one property check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Passing inputs required to declare success.
    pub minpass: usize,
    /// Skipped attempts tolerated before giving up.
    pub maxskip: usize,
    /// Size schedule.
    pub schedule: Schedule,
    /// Guard retries inside one generation attempt.
    pub retries: usize,
    /// Frontier width during shrink search.
    pub shrink_width: usize,
    /// Shrink rounds before settling for the current frontier.
    pub max_shrink_rounds: usize,
    /// Fixed seed; a fresh one is captured per check when unset.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            minpass: 100,
            maxskip: 50,
            schedule: Schedule::Linear,
            retries: 0,
            shrink_width: 10,
            max_shrink_rounds: 1_000,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by `PROPCHECK_MINPASS`, `PROPCHECK_MAXSKIP` and
    /// `PROPCHECK_SEED`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(minpass) = env_number::<usize>(MINPASS_ENV) {
            config.minpass = minpass;
        }
        if let Some(maxskip) = env_number::<usize>(MAXSKIP_ENV) {
            config.maxskip = maxskip;
        }
        config.seed = env_number::<u64>(SEED_ENV);
        config
    }

    /// Set the required passing count.
    pub fn with_minpass(mut self, minpass: usize) -> Self {
        self.minpass = minpass;
        self
    }

    /// Set the skip budget.
    pub fn with_maxskip(mut self, maxskip: usize) -> Self {
        self.maxskip = maxskip;
        self
    }

    /// Set the size schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set guard retries per generation attempt.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Set the shrink frontier width.
    pub fn with_shrink_width(mut self, shrink_width: usize) -> Self {
        self.shrink_width = shrink_width.max(1);
        self
    }

    /// Set the shrink round limit.
    pub fn with_max_shrink_rounds(mut self, max_shrink_rounds: usize) -> Self {
        self.max_shrink_rounds = max_shrink_rounds;
        self
    }

    /// Replay a known seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builder_overrides_work() {
        let default = RunConfig::default();
        assert_eq!(default.minpass, 100);
        assert_eq!(default.maxskip, 50);
        assert_eq!(default.shrink_width, 10);
        assert_eq!(default.seed, None);

        let cfg = RunConfig::default()
            .with_minpass(10)
            .with_maxskip(5)
            .with_schedule(Schedule::Constant { size: 0.5 })
            .with_retries(3)
            .with_shrink_width(0)
            .with_max_shrink_rounds(7)
            .with_seed(99);
        assert_eq!(cfg.minpass, 10);
        assert_eq!(cfg.maxskip, 5);
        assert_eq!(cfg.retries, 3);
        assert_eq!(cfg.shrink_width, 1);
        assert_eq!(cfg.max_shrink_rounds, 7);
        assert_eq!(cfg.seed, Some(99));
    }

    #[test]
    fn schedules_stay_in_unit_interval() {
        assert_eq!(Schedule::Linear.size(0, 0, 100, 50), Size::MIN);
        assert_eq!(Schedule::Linear.size(50, 7, 100, 50), Size::new(0.5));
        assert_eq!(Schedule::Linear.size(0, 0, 0, 50), Size::MAX);
        assert_eq!(Schedule::Stepped.size(40, 10, 100, 50), Size::new(0.5));
        assert_eq!(Schedule::Stepped.size(90, 40, 100, 50), Size::MAX);
        assert_eq!(Schedule::Constant { size: 4.0 }.size(0, 0, 1, 1), Size::MAX);
        fn backwards(passed: usize, _: usize, minpass: usize, _: usize) -> f64 {
            1.0 - passed as f64 / minpass as f64
        }
        assert_eq!(Schedule::Custom(backwards).size(25, 0, 100, 50), Size::new(0.75));
    }

    #[test]
    fn config_serializes_as_json() {
        let cfg = RunConfig::default().with_schedule(Schedule::Stepped);
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["minpass"], 100);
        assert_eq!(json["schedule"]["kind"], "stepped");
        let back: RunConfig = serde_json::from_value(json).unwrap();
        assert!(matches!(back.schedule, Schedule::Stepped));
    }
}
