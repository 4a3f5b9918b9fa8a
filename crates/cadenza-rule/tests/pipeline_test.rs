//! Cross-module scenarios for the health/fail pipeline.

use cadenza_rule::{
    DrainingHealthProcessor, FailCondition, FailVerdict, HealthProcessor, HitResult, Judgement,
    JudgementResult, NoFail, SuddenDeath,
};

const SECOND_US: i64 = 1_000_000;

/// An uncalibrated draining processor never drains: plain pipeline behavior.
fn plain() -> DrainingHealthProcessor {
    DrainingHealthProcessor::new(0, 60 * SECOND_US)
}

fn result_of(result: HitResult, time_us: i64) -> JudgementResult {
    JudgementResult::new(Judgement::default(), result, time_us)
}

struct Verdict {
    verdict: FailVerdict,
    restart: bool,
}

impl FailCondition for Verdict {
    fn name(&self) -> &'static str {
        "Verdict"
    }

    fn restart_on_fail(&self) -> bool {
        self.restart
    }

    fn classify(&mut self, _result: &JudgementResult) -> FailVerdict {
        self.verdict
    }
}

#[test]
fn health_stays_in_bounds_across_a_stream() {
    let mut p = plain();
    let stream = [
        HitResult::Great,
        HitResult::Miss,
        HitResult::Miss,
        HitResult::Miss,
        HitResult::Perfect,
        HitResult::Meh,
        HitResult::Miss,
        HitResult::Miss,
        HitResult::Miss,
        HitResult::Miss,
        HitResult::Great,
    ];
    for (i, &r) in stream.iter().enumerate() {
        let mut jr = result_of(r, i as i64 * SECOND_US);
        p.apply_result(&mut jr);
        assert!(p.health() >= 0.0 && p.health() <= 1.0);
    }
}

#[test]
fn once_failed_health_never_moves() {
    let mut p = plain();
    p.core_mut().set_health(0.05);
    let mut killer = JudgementResult::new(
        Judgement::new(HitResult::LargeTickHit),
        HitResult::LargeTickMiss,
        0,
    );
    p.apply_result(&mut killer);
    assert!(p.has_failed());

    let frozen = p.health();
    for i in 1..20 {
        let mut r = result_of(HitResult::Perfect, i * SECOND_US);
        p.apply_result(&mut r);
        assert!((p.health() - frozen).abs() < 1e-12);
        assert!(r.failed_at_judgement);
    }
}

#[test]
fn full_rewind_restores_the_starting_bar() {
    let mut p = plain();
    let stream = [
        HitResult::Miss,
        HitResult::Good,
        HitResult::Great,
        HitResult::Meh,
        HitResult::Miss,
    ];
    let mut applied = Vec::new();
    for (i, &r) in stream.iter().enumerate() {
        let mut jr = result_of(r, i as i64 * SECOND_US);
        p.apply_result(&mut jr);
        applied.push(jr);
    }
    for jr in applied.iter().rev() {
        p.revert_result(jr);
    }
    assert!((p.health() - 1.0).abs() < 1e-12);
    assert_eq!(p.core().judged_hits(), 0);
}

#[test]
fn blocking_mod_with_restart_priority_preempts_trigger() {
    let mut p = plain();
    p.core_mut().set_fail_conditions(vec![
        Box::new(Verdict {
            verdict: FailVerdict::TriggerFail,
            restart: false,
        }),
        Box::new(Verdict {
            verdict: FailVerdict::BlockFail,
            restart: true,
        }),
    ]);
    // The result would deplete the bar and default-fail on its own.
    p.core_mut().set_health(0.05);
    let mut r = result_of(HitResult::Miss, 0);
    p.apply_result(&mut r);
    assert!(!p.has_failed());
}

#[test]
fn depletion_to_the_floor_fails_without_mods() {
    let mut p = plain();
    p.core_mut().set_health(0.05);
    let mut r = JudgementResult::new(
        Judgement::new(HitResult::LargeTickHit),
        HitResult::LargeTickMiss,
        0,
    );
    p.apply_result(&mut r);
    assert!(p.has_failed());
}

#[test]
fn double_trigger_keeps_first_attribution() {
    let mut p = plain();
    p.core_mut().set_fail_conditions(vec![
        Box::new(SuddenDeath::new(true)),
        Box::new(NoFail::new()),
    ]);
    assert!(p.trigger_failure(Some(0)));
    assert!(!p.trigger_failure(Some(1)));
    assert_eq!(p.mod_triggering_failure().unwrap().name(), "Sudden Death");
}

#[test]
fn failed_veto_prevents_the_latch() {
    let mut p = plain();
    p.core_mut().failed_event_mut().subscribe(|| false);
    assert!(!p.trigger_failure(None));
    assert!(!p.has_failed());
}

#[test]
fn sudden_death_fails_on_the_first_break() {
    let mut p = plain();
    p.core_mut()
        .set_fail_conditions(vec![Box::new(SuddenDeath::new(false))]);
    let mut good = result_of(HitResult::Good, 0);
    p.apply_result(&mut good);
    assert!(!p.has_failed());
    let mut miss = result_of(HitResult::Miss, SECOND_US);
    p.apply_result(&mut miss);
    assert!(p.has_failed());
    assert_eq!(p.mod_triggering_failure().unwrap().name(), "Sudden Death");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Pairs whose deltas cancel exactly.
    fn canceling_pair() -> impl Strategy<Value = [HitResult; 2]> {
        prop_oneof![
            Just([HitResult::SmallTickHit, HitResult::SmallTickMiss]),
            Just([HitResult::LargeTickHit, HitResult::LargeTickMiss]),
        ]
    }

    proptest! {
        #[test]
        fn zero_net_delta_round_trips_health(pairs in prop::collection::vec(canceling_pair(), 1..8)) {
            let mut p = plain();
            // Start mid-bar so no intermediate sum can reach a bound:
            // at most 7 pairs swing health by 0.05 each way.
            p.core_mut().set_health(0.5);
            let before = p.health();
            for (i, pair) in pairs.iter().enumerate() {
                for (j, &r) in pair.iter().enumerate() {
                    let judgement = Judgement::new(HitResult::LargeTickHit);
                    let mut jr = JudgementResult::new(judgement, r, (i * 2 + j) as i64);
                    p.apply_result(&mut jr);
                }
            }
            prop_assert!((p.health() - before).abs() < 1e-9);
        }

        #[test]
        fn health_is_always_clamped(results in prop::collection::vec(0..cadenza_rule::RESULT_COUNT, 0..200)) {
            let mut p = plain();
            for (i, &idx) in results.iter().enumerate() {
                let result = HitResult::try_from(idx).unwrap();
                let mut jr = result_of(result, i as i64);
                p.apply_result(&mut jr);
                prop_assert!(p.health() >= 0.0);
                prop_assert!(p.health() <= 1.0);
            }
        }

        #[test]
        fn revert_restores_exact_pre_judgement_health(
            start in 0.05f64..0.95,
            idx in 0..cadenza_rule::RESULT_COUNT,
        ) {
            let mut p = plain();
            p.core_mut().set_health(start);
            let result = HitResult::try_from(idx).unwrap();
            let mut jr = result_of(result, 0);
            p.apply_result(&mut jr);
            p.revert_result(&jr);
            prop_assert!((p.health() - start).abs() < 1e-12);
        }
    }
}
