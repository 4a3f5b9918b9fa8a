//! Fail-condition policies.
//!
//! A fail condition is a pluggable policy the health processor consults after
//! every applied result. Policies vote; the processor acts. A policy never
//! mutates health itself — the only state change it can cause goes through
//! the processor's single failure choke point.

use crate::judgement::JudgementResult;

/// A policy's vote on whether the current result should end the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailVerdict {
    /// No opinion; ask the next policy.
    Nothing,
    /// Do not fail, regardless of any later policy or the default condition.
    BlockFail,
    /// Fail now, attributing this policy.
    TriggerFail,
}

/// A pluggable fail policy.
///
/// Policies are evaluated in descending `restart_on_fail` order and the first
/// non-[`FailVerdict::Nothing`] vote wins.
pub trait FailCondition {
    /// Display name, used for failure attribution.
    fn name(&self) -> &'static str;

    /// Whether a failure caused by this policy should restart the attempt
    /// immediately. Doubles as the evaluation priority: restarting policies
    /// are consulted first.
    fn restart_on_fail(&self) -> bool {
        false
    }

    /// Vote on a freshly applied result.
    fn classify(&mut self, result: &JudgementResult) -> FailVerdict;

    /// Vote on a depletion that happened between results (passive drain).
    /// Only consulted once the default depletion condition is already met.
    fn classify_passive(&mut self) -> FailVerdict {
        FailVerdict::Nothing
    }

    /// Called when this policy's [`FailVerdict::BlockFail`] vote was chosen.
    /// May return a replacement health value for the processor to apply.
    fn on_fail_blocked(&mut self) -> Option<f64> {
        None
    }
}

/// Stable-sort policies so that restart-on-fail policies are evaluated first.
pub fn sort_by_restart_priority(conditions: &mut [Box<dyn FailCondition>]) {
    conditions.sort_by_key(|c| !c.restart_on_fail());
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: &'static str,
        restart: bool,
    }

    impl FailCondition for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn restart_on_fail(&self) -> bool {
            self.restart
        }

        fn classify(&mut self, _result: &JudgementResult) -> FailVerdict {
            FailVerdict::Nothing
        }
    }

    fn named(name: &'static str, restart: bool) -> Box<dyn FailCondition> {
        Box::new(Named { name, restart })
    }

    #[test]
    fn restarting_policies_sort_first() {
        let mut conditions = vec![named("a", false), named("b", true), named("c", false)];
        sort_by_restart_priority(&mut conditions);
        let names: Vec<_> = conditions.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn sort_is_stable_within_a_priority() {
        let mut conditions = vec![
            named("a", true),
            named("b", false),
            named("c", true),
            named("d", false),
        ];
        sort_by_restart_priority(&mut conditions);
        let names: Vec<_> = conditions.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn default_passive_vote_is_nothing() {
        let mut c = Named {
            name: "x",
            restart: false,
        };
        assert_eq!(c.classify_passive(), FailVerdict::Nothing);
        assert_eq!(c.on_fail_blocked(), None);
    }
}
