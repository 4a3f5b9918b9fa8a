//! Play records: judgement counts, sampled health history, JSON persistence.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use cadenza_rule::{HitResult, RESULT_COUNT};

/// One sampled point of the health bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Sample time (μs)
    pub time_us: i64,
    /// Health at that time
    pub health: f64,
}

/// Health history sampled at a fixed interval, shown on the results screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthGraph {
    samples: Vec<HealthSample>,
}

impl HealthGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample. Samples must arrive in time order.
    pub fn push(&mut self, time_us: i64, health: f64) {
        debug_assert!(
            self.samples.last().is_none_or(|s| s.time_us < time_us),
            "health samples out of order"
        );
        self.samples.push(HealthSample { time_us, health });
    }

    /// Drop every sample at or after the given time (rewind support).
    pub fn truncate_from(&mut self, time_us: i64) {
        self.samples.retain(|s| s.time_us < time_us);
    }

    pub fn samples(&self) -> &[HealthSample] {
        &self.samples
    }

    /// The worst sampled health, or `None` with no samples yet.
    pub fn lowest(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.health)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Per-category judgement tallies for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementCounts {
    counts: [u32; RESULT_COUNT],
}

impl JudgementCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: HitResult) {
        self.counts[result as usize] += 1;
    }

    /// Remove one previously recorded result (rewind support).
    pub fn unrecord(&mut self, result: HitResult) {
        debug_assert!(self.counts[result as usize] > 0, "unrecording {result:?}");
        self.counts[result as usize] -= 1;
    }

    pub fn count(&self, result: HitResult) -> u32 {
        self.counts[result as usize]
    }

    /// Total results recorded.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Whether no combo-breaking result was recorded.
    pub fn is_full_combo(&self) -> bool {
        HitResult::ALL
            .iter()
            .filter(|r| r.breaks_combo())
            .all(|&r| self.count(r) == 0)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Every result was judged without failing.
    Cleared,
    /// The failed latch engaged.
    Failed,
    /// The session ended before the result stream did.
    Aborted,
}

/// Everything the results screen needs from a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRecord {
    pub outcome: PlayOutcome,
    pub counts: JudgementCounts,
    /// Worst health reached during the attempt.
    pub lowest_health: f64,
    /// Health when the session ended.
    pub final_health: f64,
    /// Name of the policy that caused the failure, if one did.
    pub failed_by: Option<String>,
    pub graph: HealthGraph,
}

/// Read a play record (JSON).
pub fn read_record(path: &Path) -> Result<PlayRecord> {
    let file = std::fs::File::open(path)?;
    let record = serde_json::from_reader(file)?;
    Ok(record)
}

/// Write a play record (JSON).
pub fn write_record(record: &PlayRecord, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(file, record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_record_and_total() {
        let mut c = JudgementCounts::new();
        c.record(HitResult::Great);
        c.record(HitResult::Great);
        c.record(HitResult::Miss);
        assert_eq!(c.count(HitResult::Great), 2);
        assert_eq!(c.count(HitResult::Miss), 1);
        assert_eq!(c.count(HitResult::Perfect), 0);
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn counts_unrecord_reverses() {
        let mut c = JudgementCounts::new();
        c.record(HitResult::Ok);
        c.unrecord(HitResult::Ok);
        assert_eq!(c.total(), 0);
    }

    #[test]
    fn full_combo_tracks_combo_breaks_only() {
        let mut c = JudgementCounts::new();
        c.record(HitResult::Great);
        c.record(HitResult::Meh);
        c.record(HitResult::SmallTickMiss);
        assert!(c.is_full_combo());
        c.record(HitResult::LargeTickMiss);
        assert!(!c.is_full_combo());
    }

    #[test]
    fn graph_lowest() {
        let mut g = HealthGraph::new();
        assert_eq!(g.lowest(), None);
        g.push(0, 1.0);
        g.push(500_000, 0.42);
        g.push(1_000_000, 0.8);
        assert_eq!(g.lowest(), Some(0.42));
    }

    #[test]
    fn graph_truncate_from_drops_later_samples() {
        let mut g = HealthGraph::new();
        g.push(0, 1.0);
        g.push(500_000, 0.9);
        g.push(1_000_000, 0.8);
        g.truncate_from(500_000);
        assert_eq!(g.samples().len(), 1);
        assert_eq!(g.samples()[0].time_us, 0);
    }

    #[test]
    fn record_json_round_trip() {
        let mut counts = JudgementCounts::new();
        counts.record(HitResult::Perfect);
        counts.record(HitResult::Miss);
        let mut graph = HealthGraph::new();
        graph.push(0, 1.0);
        graph.push(500_000, 0.7);

        let record = PlayRecord {
            outcome: PlayOutcome::Failed,
            counts,
            lowest_health: 0.0,
            final_health: 0.0,
            failed_by: Some("Sudden Death".into()),
            graph,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        write_record(&record, &path).unwrap();
        let back = read_record(&path).unwrap();

        assert_eq!(back.outcome, PlayOutcome::Failed);
        assert_eq!(back.counts, record.counts);
        assert_eq!(back.failed_by.as_deref(), Some("Sudden Death"));
        assert_eq!(back.graph.samples().len(), 2);
        assert!((back.graph.samples()[1].health - 0.7).abs() < 1e-12);
    }

    #[test]
    fn read_record_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_record(&dir.path().join("nope.json")).is_err());
    }
}
