//! Judgements and per-object results.

use crate::hit_result::HitResult;

/// Scoring metadata for a single hit object: the best result the object can
/// award, and the mapping from result category to health delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    max_result: HitResult,
}

impl Judgement {
    pub const fn new(max_result: HitResult) -> Self {
        Self { max_result }
    }

    /// The best result this object can award.
    pub fn max_result(self) -> HitResult {
        self.max_result
    }

    /// Health delta awarded for the given result on this object.
    pub fn health_increase_for(self, result: HitResult) -> f64 {
        result.base_health_increase()
    }

    /// Health delta awarded for a best-possible hit.
    pub fn max_health_increase(self) -> f64 {
        self.health_increase_for(self.max_result)
    }
}

impl Default for Judgement {
    fn default() -> Self {
        Self::new(HitResult::Perfect)
    }
}

/// The outcome of scoring one hit object at a point in time.
///
/// `health_at_judgement` and `failed_at_judgement` are written by the health
/// processor when the result is applied, so the application can be reverted
/// exactly during rewind. Everything else is fixed at creation.
#[derive(Debug, Clone)]
pub struct JudgementResult {
    /// The judgement this result was scored against.
    pub judgement: Judgement,
    /// The awarded result category.
    pub result: HitResult,
    /// End time of the hit object (μs).
    pub time_us: i64,
    /// Health before this result was applied. Back-annotated at apply time.
    pub health_at_judgement: f64,
    /// Whether the processor had already failed when this result was applied.
    /// Back-annotated at apply time.
    pub failed_at_judgement: bool,
}

impl JudgementResult {
    pub fn new(judgement: Judgement, result: HitResult, time_us: i64) -> Self {
        Self {
            judgement,
            result,
            time_us,
            health_at_judgement: 0.0,
            failed_at_judgement: false,
        }
    }

    /// Health delta contributed by this result.
    pub fn health_increase(&self) -> f64 {
        self.judgement.health_increase_for(self.result)
    }

    /// Whether the object was hit at all.
    pub fn is_hit(&self) -> bool {
        self.result.is_hit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_judgement_awards_up_to_perfect() {
        let j = Judgement::default();
        assert_eq!(j.max_result(), HitResult::Perfect);
        assert!(j.max_health_increase() > 0.0);
    }

    #[test]
    fn health_increase_follows_result_category() {
        let j = Judgement::new(HitResult::Great);
        let hit = JudgementResult::new(j, HitResult::Great, 0);
        let miss = JudgementResult::new(j, HitResult::Miss, 0);
        assert!(hit.health_increase() > 0.0);
        assert!(miss.health_increase() < 0.0);
    }

    #[test]
    fn new_result_has_clean_annotations() {
        let r = JudgementResult::new(Judgement::default(), HitResult::Good, 1_500_000);
        assert_eq!(r.time_us, 1_500_000);
        assert!(r.health_at_judgement.abs() < f64::EPSILON);
        assert!(!r.failed_at_judgement);
    }

    #[test]
    fn max_increase_matches_table() {
        let j = Judgement::new(HitResult::LargeTickHit);
        assert!(
            (j.max_health_increase() - HitResult::LargeTickHit.base_health_increase()).abs()
                < 1e-12
        );
    }
}
