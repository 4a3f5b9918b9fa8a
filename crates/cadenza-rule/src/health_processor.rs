//! Health tracking and fail-condition evaluation.
//!
//! The processor owns the health bar outright. Results arrive in strict
//! chronological order (forward during play, backward during rewind); every
//! apply back-annotates enough state onto the result to undo itself. There is
//! no guard against out-of-order application.

use cadenza_types::{Bindable, BoundedDouble, VetoEvent};

use crate::fail_condition::{FailCondition, FailVerdict, sort_by_restart_priority};
use crate::judgement::JudgementResult;
use crate::precision;

/// Shared state for every health processor flavor.
pub struct HealthCore {
    health: BoundedDouble,
    has_failed: Bindable<bool>,
    failed: VetoEvent,
    conditions: Vec<Box<dyn FailCondition>>,
    triggering_condition: Option<usize>,
    judged_hits: usize,
    max_hits: usize,
    initial_health: f64,
}

impl HealthCore {
    /// Create a core whose bar starts (and resets to) `initial_health`.
    pub fn new(initial_health: f64) -> Self {
        Self {
            health: BoundedDouble::new(initial_health, 0.0, 1.0),
            has_failed: Bindable::new(false),
            failed: VetoEvent::new(),
            conditions: Vec::new(),
            triggering_condition: None,
            judged_hits: 0,
            max_hits: 0,
            initial_health,
        }
    }

    /// Current health.
    pub fn health(&self) -> f64 {
        self.health.get()
    }

    /// Lower health bound.
    pub fn health_min(&self) -> f64 {
        self.health.min()
    }

    /// Upper health bound.
    pub fn health_max(&self) -> f64 {
        self.health.max()
    }

    /// Set health directly (clamped).
    pub fn set_health(&mut self, value: f64) {
        self.health.set(value);
    }

    /// Add a delta to health (clamped).
    pub fn add_health(&mut self, delta: f64) {
        self.health.add(delta);
    }

    /// Observe health changes. The watcher fires immediately and then after
    /// every mutation.
    pub fn bind_health(&mut self, watcher: impl FnMut(&f64) + 'static) {
        self.health.bind(watcher);
    }

    /// Whether the failed latch has engaged.
    pub fn has_failed(&self) -> bool {
        self.has_failed.get()
    }

    /// Observe the failed latch.
    pub fn bind_has_failed(&mut self, watcher: impl FnMut(&bool) + 'static) {
        self.has_failed.bind(watcher);
    }

    /// The cancellable event raised before the failed latch engages.
    pub fn failed_event_mut(&mut self) -> &mut VetoEvent {
        &mut self.failed
    }

    /// Install the active fail-condition policies. Policies are stable-sorted
    /// so restart-on-fail ones are consulted first; the order then stays
    /// fixed for the processor's lifetime.
    pub fn set_fail_conditions(&mut self, mut conditions: Vec<Box<dyn FailCondition>>) {
        sort_by_restart_priority(&mut conditions);
        self.conditions = conditions;
        self.triggering_condition = None;
    }

    /// Number of installed policies.
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Installed policy by evaluation index.
    pub fn condition(&self, index: usize) -> &dyn FailCondition {
        self.conditions[index].as_ref()
    }

    /// Installed policy by evaluation index, mutable.
    pub fn condition_mut(&mut self, index: usize) -> &mut dyn FailCondition {
        self.conditions[index].as_mut()
    }

    /// The policy that caused the current failure, if any did.
    pub fn triggering_condition(&self) -> Option<&dyn FailCondition> {
        self.triggering_condition
            .map(|i| self.conditions[i].as_ref())
    }

    /// Results applied so far.
    pub fn judged_hits(&self) -> usize {
        self.judged_hits
    }

    /// Expected total results, as snapshotted by `reset(true)` or set
    /// directly from the chart's object count.
    pub fn max_hits(&self) -> usize {
        self.max_hits
    }

    pub fn set_max_hits(&mut self, max_hits: usize) {
        self.max_hits = max_hits;
    }

    /// Whether the result stream is exhausted.
    pub fn has_completed(&self) -> bool {
        self.judged_hits == self.max_hits
    }

    pub(crate) fn note_judged(&mut self) {
        self.judged_hits += 1;
    }

    pub(crate) fn note_reverted(&mut self) {
        debug_assert!(self.judged_hits > 0, "reverting with no applied results");
        self.judged_hits -= 1;
    }

    pub(crate) fn latch_failure(&mut self, source: Option<usize>) {
        self.triggering_condition = source;
        self.has_failed.set(true);
    }

    pub(crate) fn reset(&mut self, store_results: bool) {
        if store_results {
            self.max_hits = self.judged_hits;
        }
        self.judged_hits = 0;
        self.triggering_condition = None;
        self.health.set(self.initial_health);
        self.has_failed.set(false);
    }
}

impl std::fmt::Debug for HealthCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCore")
            .field("health", &self.health.get())
            .field("has_failed", &self.has_failed.get())
            .field("conditions", &self.conditions.len())
            .field("judged_hits", &self.judged_hits)
            .field("max_hits", &self.max_hits)
            .finish()
    }
}

/// A health processor: applies judgement results to the bar and decides,
/// after each one, whether the attempt has failed.
pub trait HealthProcessor {
    fn core(&self) -> &HealthCore;

    fn core_mut(&mut self) -> &mut HealthCore;

    /// Health delta awarded for a result. The default returns the
    /// judgement's intrinsic delta.
    fn health_increase_for(&self, result: &JudgementResult) -> f64 {
        result.health_increase()
    }

    /// The fallback fail check used when no policy votes: the bar has
    /// dropped to its minimum. Approximate comparison, so rounding error at
    /// the boundary cannot mask a depleted bar.
    fn default_fail_condition(&self) -> bool {
        let core = self.core();
        precision::almost_bigger(core.health_min(), core.health())
    }

    /// Hook invoked after a result's delta lands on the bar.
    fn on_result_applied(&mut self, _result: &JudgementResult, _increase: f64) {}

    /// Hook invoked at the end of [`HealthProcessor::reset`].
    fn on_reset(&mut self, _store_results: bool) {}

    /// Apply the next result in chronological order.
    ///
    /// Back-annotates the pre-apply health and fail state onto the result,
    /// then — unless already failed — lands the health delta and evaluates
    /// fail conditions.
    fn apply_result(&mut self, result: &mut JudgementResult) {
        result.health_at_judgement = self.core().health();
        result.failed_at_judgement = self.core().has_failed();
        self.core_mut().note_judged();

        if self.core().has_failed() {
            return;
        }

        let increase = self.health_increase_for(result);
        self.core_mut().add_health(increase);
        self.on_result_applied(result, increase);

        // First verdict wins. Restart-on-fail policies were sorted to the
        // front, so a restarting policy is never silently overridden by a
        // later blocking one.
        for i in 0..self.core().condition_count() {
            match self.core_mut().condition_mut(i).classify(result) {
                FailVerdict::Nothing => continue,
                FailVerdict::BlockFail => {
                    if let Some(health) = self.core_mut().condition_mut(i).on_fail_blocked() {
                        self.core_mut().set_health(health);
                    }
                    return;
                }
                FailVerdict::TriggerFail => {
                    self.trigger_failure(Some(i));
                    return;
                }
            }
        }

        if self.default_fail_condition() {
            self.trigger_failure(None);
        }
    }

    /// Undo the most recently applied result.
    ///
    /// Health returns to the value recorded at apply time. The failed latch
    /// is left alone: rewinding past the point of failure restores the bar
    /// but not playability.
    fn revert_result(&mut self, result: &JudgementResult) {
        let core = self.core_mut();
        core.note_reverted();
        core.set_health(result.health_at_judgement);
    }

    /// Force the failed state, optionally attributing the policy (by
    /// evaluation index) that caused it.
    ///
    /// The single choke point into failure: the cancellable `failed` event
    /// runs first and any subscriber may veto this call. Once failed, later
    /// calls are no-ops and the first attribution stands. Returns whether
    /// the latch engaged.
    fn trigger_failure(&mut self, source: Option<usize>) -> bool {
        if self.core().has_failed() {
            return false;
        }
        if !self.core_mut().failed_event_mut().raise() {
            return false;
        }
        self.core_mut().latch_failure(source);
        true
    }

    /// Restore the bar to its starting value and clear the failed latch.
    /// When `store_results` is set, the judged-hit count observed so far is
    /// kept as the expected total for the next run.
    fn reset(&mut self, store_results: bool) {
        self.core_mut().reset(store_results);
        self.on_reset(store_results);
    }

    /// Current health.
    fn health(&self) -> f64 {
        self.core().health()
    }

    /// Whether the failed latch has engaged.
    fn has_failed(&self) -> bool {
        self.core().has_failed()
    }

    /// The policy that caused the current failure, if any did.
    fn mod_triggering_failure(&self) -> Option<&dyn FailCondition> {
        self.core().triggering_condition()
    }
}
