//! Greedy frontier search for a locally minimal counterexample.

use std::any::TypeId;

use tracing::trace;

use super::property::{Evaluation, Property};
use crate::random::RandomSource;
use crate::shrink::Shrink;

/// What still counts as a counterexample during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falsifier {
    /// The property returns `false`.
    ReturnsFalse,
    /// The property raises an error of this concrete type.
    Raises(TypeId),
}

impl Falsifier {
    /// Whether `evaluation` still reproduces the failure. Abstentions never
    /// do.
    pub fn accepts(&self, evaluation: &Evaluation) -> bool {
        match (self, evaluation) {
            (Falsifier::ReturnsFalse, Evaluation::Fails) => true,
            (Falsifier::Raises(kind), Evaluation::Raised(raised)) => raised.type_id() == *kind,
            _ => false,
        }
    }
}

/// Outcome of [`minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimized<A> {
    /// Smallest counterexample found.
    pub value: A,
    /// Rounds that produced a new frontier.
    pub rounds: usize,
}

/// Shrink `initial` while `falsifier` accepts the property's verdict.
///
/// Each round expands every frontier member into its shrink candidates and
/// keeps the ones that still fail, sampled down to `width`. The search stops
/// when a round keeps nothing or after `max_rounds` rounds, and answers the
/// first member of the last frontier.
pub fn minimize<A>(
    initial: A,
    property: &Property<A>,
    falsifier: Falsifier,
    source: &mut RandomSource,
    width: usize,
    max_rounds: usize,
) -> Minimized<A>
where
    A: Shrink + Clone + PartialEq + 'static,
{
    let width = width.max(1);
    let mut frontier = vec![initial];
    let mut rounds = 0;

    while rounds < max_rounds {
        let mut survivors: Vec<A> = Vec::new();
        for member in &frontier {
            for candidate in member.shrink() {
                if survivors.contains(&candidate) {
                    continue;
                }
                if falsifier.accepts(&property.evaluate(&candidate)) {
                    survivors.push(candidate);
                }
            }
        }
        if survivors.is_empty() {
            break;
        }
        if survivors.len() > width {
            let picked = source.sample_indices(survivors.len(), width);
            survivors = picked.into_iter().map(|index| survivors[index].clone()).collect();
        }
        rounds += 1;
        trace!(round = rounds, width = survivors.len(), "shrink round");
        frontier = survivors;
    }

    Minimized {
        value: frontier.swap_remove(0),
        rounds,
    }
}
