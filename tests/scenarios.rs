use propcheck::prelude::*;
use propcheck::check::Raised;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("value {0} is over the limit")]
struct OverLimit(i64);

fn runner() -> Runner {
    Runner::new(RunConfig::default().with_seed(0x5eed))
}

fn small_ints() -> Gen<i64> {
    integer(&GenOptions::between(0, 100)).unwrap()
}

#[test]
fn odd_counterexample_minimizes_to_one() {
    let property = Property::predicate("is even", |x: &i64| x % 2 == 0);
    let result = runner().check(&mut RandomSource::from_entropy(), &small_ints(), &property);

    assert_eq!(result.outcome, Outcome::Falsified);
    assert_eq!(result.counterexample.map(|x| x % 2), Some(1));
    assert_eq!(result.minimized, Some(1));
    assert_eq!(result.seed, 0x5eed);
}

#[test]
fn reversing_twice_is_identity() {
    let strings = string(&GenOptions::between(0, 10)).unwrap();
    let property = Property::predicate("reverse twice", |s: &String| {
        let twice: String = s.chars().rev().collect::<String>().chars().rev().collect();
        twice == *s
    });
    let result = runner().check(&mut RandomSource::from_entropy(), &strings, &property);

    assert_eq!(result.outcome, Outcome::Passed);
    assert_eq!(result.passed, 100);
    assert_eq!(result.skipped, 0);
    assert!(result.minimized.is_none());
}

#[test]
fn always_guarded_property_is_exhausted() {
    let property = Property::new("never applies", |_: &i64| -> PropResult {
        guard(false)?;
        Ok(true)
    });
    let result = runner().check(&mut RandomSource::from_entropy(), &small_ints(), &property);

    assert_eq!(result.outcome, Outcome::Exhausted);
    assert_eq!(result.passed, 0);
    assert_eq!(result.skipped, 50);
    assert!(result.counterexample.is_none());
}

#[test]
fn raised_error_is_reported_and_minimized() {
    let property = Property::new("under limit", |x: &i64| -> PropResult {
        if *x > 40 {
            return Err(OverLimit(*x).into());
        }
        Ok(true)
    });
    let result = runner().check(&mut RandomSource::from_entropy(), &small_ints(), &property);

    assert_eq!(result.outcome, Outcome::Errored);
    let cause: &Raised = result.cause.as_ref().unwrap();
    assert!(cause.is::<OverLimit>());
    assert_eq!(result.minimized, Some(41));

    let verdict = result.verdict("under limit");
    match verdict {
        Verdict::Error(message) => {
            assert!(message.contains("OverLimit"));
            assert!(message.contains(&format!("PROPCHECK_SEED={}", 0x5eed)));
        }
        other => panic!("expected an error verdict, got {other:?}"),
    }
}

#[test]
fn unconditional_raise_minimizes_to_origin() {
    let property = Property::new("always over", |x: &i64| -> PropResult {
        Err(OverLimit(*x).into())
    });
    let result = runner().check(&mut RandomSource::from_entropy(), &small_ints(), &property);

    assert_eq!(result.outcome, Outcome::Errored);
    assert_eq!(result.passed, 0);
    assert!(result.cause.as_ref().is_some_and(|cause| cause.is::<OverLimit>()));
    assert_eq!(result.minimized, Some(0));
}

#[test]
fn suite_runs_registered_properties() {
    let mut suite = Suite::new();
    suite
        .register_property(
            CheckOptions::default(),
            RunConfig::default().with_seed(11),
            small_ints(),
            Property::predicate("bounded", |x: &i64| (0..=100).contains(x)),
        )
        .register_check("todo", CheckOptions::default().with_pending(true), |_| {
            Verdict::Error("should not run".into())
        });

    let entries = suite.run_all(&mut RandomSource::from_seed(3));
    let verdicts: Vec<_> = entries.into_iter().map(|entry| entry.verdict).collect();
    assert_eq!(verdicts, vec![Verdict::Pass, Verdict::Pending]);
}
