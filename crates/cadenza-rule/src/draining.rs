//! The standard gameplay processor: judgement deltas plus passive drain.

use cadenza_types::BreakPeriod;

use crate::fail_condition::FailVerdict;
use crate::health_processor::{HealthCore, HealthProcessor};
use crate::judgement::JudgementResult;

/// Calibration target: the worst health a flawless run is allowed to reach.
pub const DEFAULT_TARGET_MINIMUM_HEALTH: f64 = 0.95;

/// Calibration search start, in health per microsecond. Far above any
/// playable rate; the search halves down from here.
const INITIAL_ADJUSTMENT: f64 = 1e-3;

/// Calibration search cutoff.
const MIN_ADJUSTMENT: f64 = 1e-16;

/// Health processor with passive drain.
///
/// Health drains as the clock advances through [`DrainingHealthProcessor::advance_to`]:
/// never before the first object, never inside a break, never after the last
/// object, never once failed. The drain rate starts at zero and is calibrated
/// by simulation — apply the full chart's results once, then `reset(true)`
/// picks the steepest constant rate that keeps a flawless run's health at or
/// above the target minimum.
pub struct DrainingHealthProcessor {
    core: HealthCore,
    drain_start_us: i64,
    drain_end_us: i64,
    breaks: Vec<BreakPeriod>,
    target_minimum_health: f64,
    drain_rate: f64,
    health_increases: Vec<(i64, f64)>,
    last_time_us: Option<i64>,
}

impl DrainingHealthProcessor {
    /// Create a processor draining over `[drain_start_us, drain_end_us]`
    /// (typically first object time to last object end time).
    pub fn new(drain_start_us: i64, drain_end_us: i64) -> Self {
        debug_assert!(
            drain_start_us <= drain_end_us,
            "invalid drain window: {drain_start_us}..{drain_end_us}"
        );
        Self {
            core: HealthCore::new(1.0),
            drain_start_us,
            drain_end_us,
            breaks: Vec::new(),
            target_minimum_health: DEFAULT_TARGET_MINIMUM_HEALTH,
            drain_rate: 0.0,
            health_increases: Vec::new(),
            last_time_us: None,
        }
    }

    /// Install the chart's break periods. Must be sorted by start time and
    /// non-overlapping.
    pub fn set_breaks(&mut self, breaks: Vec<BreakPeriod>) {
        debug_assert!(
            breaks.windows(2).all(|w| w[0].end_us <= w[1].start_us),
            "breaks must be sorted and disjoint"
        );
        self.breaks = breaks;
    }

    pub fn set_target_minimum_health(&mut self, target: f64) {
        self.target_minimum_health = target;
    }

    /// The calibrated drain rate (health per μs). Zero until calibration.
    pub fn drain_rate(&self) -> f64 {
        self.drain_rate
    }

    /// Advance the gameplay clock, draining health for the drainable part of
    /// the elapsed interval. Call once per frame with the current chart time.
    ///
    /// The first call only establishes the clock. A call moving time
    /// backwards (rewind) re-establishes it without refunding health; the
    /// judgement reverts carry the health history.
    pub fn advance_to(&mut self, time_us: i64) {
        let Some(from) = self.last_time_us.replace(time_us) else {
            return;
        };
        if time_us <= from || self.drain_rate == 0.0 || self.core.has_failed() {
            return;
        }

        let from = from.max(self.drain_start_us);
        let to = time_us.min(self.drain_end_us);
        if to <= from {
            return;
        }
        let mut drainable = to - from;
        for b in &self.breaks {
            drainable -= b.overlap_us(from, to);
        }
        if drainable <= 0 {
            return;
        }

        self.core.add_health(-(self.drain_rate * drainable as f64));
        if self.default_fail_condition() {
            self.check_passive_fail();
        }
    }

    /// Depletion between results: give policies their passive vote, then
    /// fall through to the failure choke point.
    fn check_passive_fail(&mut self) {
        for i in 0..self.core.condition_count() {
            match self.core.condition_mut(i).classify_passive() {
                FailVerdict::Nothing => continue,
                FailVerdict::BlockFail => {
                    if let Some(health) = self.core.condition_mut(i).on_fail_blocked() {
                        self.core.set_health(health);
                    }
                    return;
                }
                FailVerdict::TriggerFail => {
                    self.trigger_failure(Some(i));
                    return;
                }
            }
        }
        self.trigger_failure(None);
    }

    fn compute_drain_rate(&self) -> f64 {
        if self.health_increases.len() <= 1 {
            return 0.0;
        }

        // Halving search for the supremum feasible rate: try the candidate,
        // keep it if a flawless run stays above target, halve the step.
        let mut rate = 0.0;
        let mut adjustment = INITIAL_ADJUSTMENT;
        while adjustment > MIN_ADJUSTMENT {
            let candidate = rate + adjustment;
            if self.simulate_lowest_health(candidate) >= self.target_minimum_health {
                rate = candidate;
            }
            adjustment /= 2.0;
        }
        rate
    }

    /// Lowest health a run reaches with the recorded deltas and the given
    /// drain rate. Health is not floor-clamped here: how far below zero the
    /// run dips is exactly what the search needs to see.
    fn simulate_lowest_health(&self, rate: f64) -> f64 {
        let mut health = self.core.health_max();
        let mut lowest = health;
        let mut last_us = self.drain_start_us;

        for &(time_us, increase) in &self.health_increases {
            let mut drainable = (time_us - last_us).max(0);
            for b in &self.breaks {
                drainable -= b.overlap_us(last_us, time_us);
            }
            health -= rate * drainable as f64;
            lowest = lowest.min(health);
            health = (health + increase).min(self.core.health_max());
            last_us = last_us.max(time_us);
        }
        lowest
    }
}

impl HealthProcessor for DrainingHealthProcessor {
    fn core(&self) -> &HealthCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HealthCore {
        &mut self.core
    }

    fn on_result_applied(&mut self, result: &JudgementResult, increase: f64) {
        self.health_increases.push((result.time_us, increase));
    }

    fn on_reset(&mut self, store_results: bool) {
        if store_results {
            self.drain_rate = self.compute_drain_rate();
        }
        self.health_increases.clear();
        self.last_time_us = None;
    }
}
