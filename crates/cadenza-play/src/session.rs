//! Play session — drives the health pipeline through a gameplay attempt.
//!
//! Orchestrates: result stream -> processor -> phase transitions -> record.
//! Everything runs on the caller's frame clock; `update` is expected once per
//! frame with the current chart time, results whenever the scoring layer
//! produces them, in chronological order.

use log::{debug, info};

use cadenza_rule::{DrainingHealthProcessor, HealthProcessor, JudgementResult};

use crate::record::{HealthGraph, JudgementCounts, PlayOutcome, PlayRecord};

/// Health sampling interval for the results graph (500ms).
pub const HEALTH_LOG_INTERVAL_US: i64 = 500_000;

/// Session phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPhase {
    /// Countdown before play starts.
    Ready,
    /// Active gameplay.
    Playing,
    /// The failed latch engaged. Terminal for this attempt.
    Failed,
    /// Every expected result was judged.
    Finished,
}

/// A single gameplay attempt over one chart.
pub struct PlaySession {
    phase: PlayPhase,
    processor: DrainingHealthProcessor,
    expected_results: usize,
    applied: Vec<JudgementResult>,
    counts: JudgementCounts,
    graph: HealthGraph,
    last_sample_time_us: i64,
    lowest_health: f64,
    clock_us: i64,
}

impl PlaySession {
    /// Create a session expecting `expected_results` judgements from the
    /// scoring layer. The processor arrives pre-calibrated and with its
    /// fail-condition policies installed.
    pub fn new(mut processor: DrainingHealthProcessor, expected_results: usize) -> Self {
        processor.core_mut().set_max_hits(expected_results);
        let lowest_health = processor.health();
        Self {
            phase: PlayPhase::Ready,
            processor,
            expected_results,
            applied: Vec::with_capacity(expected_results),
            counts: JudgementCounts::new(),
            graph: HealthGraph::new(),
            last_sample_time_us: 0,
            lowest_health,
            clock_us: 0,
        }
    }

    pub fn phase(&self) -> PlayPhase {
        self.phase
    }

    pub fn processor(&self) -> &DrainingHealthProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut DrainingHealthProcessor {
        &mut self.processor
    }

    pub fn counts(&self) -> &JudgementCounts {
        &self.counts
    }

    /// Chart time of the most recent `update` or `rewind_to`.
    pub fn clock_us(&self) -> i64 {
        self.clock_us
    }

    /// Begin the attempt.
    pub fn start(&mut self) {
        debug_assert_eq!(self.phase, PlayPhase::Ready, "start from {:?}", self.phase);
        self.phase = PlayPhase::Playing;
        info!("session: start ({} results expected)", self.expected_results);
    }

    /// Advance the frame clock: drains health, samples the graph, and
    /// resolves phase transitions.
    pub fn update(&mut self, time_us: i64) {
        if self.phase != PlayPhase::Playing {
            return;
        }
        self.clock_us = time_us;
        self.processor.advance_to(time_us);
        self.track_health();

        while self.last_sample_time_us + HEALTH_LOG_INTERVAL_US <= time_us {
            self.last_sample_time_us += HEALTH_LOG_INTERVAL_US;
            self.graph
                .push(self.last_sample_time_us, self.processor.health());
        }

        if self.check_failure() {
            return;
        }
        if self.processor.core().has_completed() {
            self.phase = PlayPhase::Finished;
            info!("session: finished (all results judged)");
        }
    }

    /// Apply the next result from the scoring layer.
    pub fn apply(&mut self, mut result: JudgementResult) {
        debug_assert_eq!(self.phase, PlayPhase::Playing, "apply in {:?}", self.phase);
        self.processor.apply_result(&mut result);
        self.counts.record(result.result);
        self.applied.push(result);
        self.track_health();
        self.check_failure();
    }

    /// Rewind to the given time: results after it are reverted in reverse
    /// order, graph samples past it are dropped, and the drain clock is
    /// re-established. A failure that already latched stays latched.
    pub fn rewind_to(&mut self, time_us: i64) {
        let mut reverted = 0usize;
        while let Some(last) = self.applied.last() {
            if last.time_us <= time_us {
                break;
            }
            self.processor.revert_result(last);
            self.counts.unrecord(last.result);
            self.applied.pop();
            reverted += 1;
        }
        self.graph.truncate_from(time_us);
        self.last_sample_time_us = self
            .graph
            .samples()
            .last()
            .map_or(0, |s| s.time_us);
        self.clock_us = time_us;
        self.processor.advance_to(time_us);
        debug!("session: rewind to {time_us}us, {reverted} results reverted");
    }

    /// Snapshot the attempt into a record for the results screen.
    pub fn record(&self) -> PlayRecord {
        let outcome = match self.phase {
            PlayPhase::Finished => PlayOutcome::Cleared,
            PlayPhase::Failed => PlayOutcome::Failed,
            PlayPhase::Ready | PlayPhase::Playing => PlayOutcome::Aborted,
        };
        PlayRecord {
            outcome,
            counts: self.counts.clone(),
            lowest_health: self.lowest_health,
            final_health: self.processor.health(),
            failed_by: self
                .processor
                .mod_triggering_failure()
                .map(|m| m.name().to_owned()),
            graph: self.graph.clone(),
        }
    }

    fn track_health(&mut self) {
        self.lowest_health = self.lowest_health.min(self.processor.health());
    }

    fn check_failure(&mut self) -> bool {
        if self.phase == PlayPhase::Playing && self.processor.has_failed() {
            self.phase = PlayPhase::Failed;
            match self.processor.mod_triggering_failure() {
                Some(m) => info!("session: failed (by {})", m.name()),
                None => info!("session: failed (health depleted)"),
            }
            return true;
        }
        self.phase == PlayPhase::Failed
    }
}
