// Hit result categories, judgements, health processors, fail-condition policies

mod accumulating;
mod draining;
mod fail_condition;
mod fail_mods;
mod health_processor;
mod hit_result;
mod judgement;
pub mod precision;

pub use cadenza_types::BreakPeriod;

pub use accumulating::AccumulatingHealthProcessor;
pub use draining::{DEFAULT_TARGET_MINIMUM_HEALTH, DrainingHealthProcessor};
pub use fail_condition::{FailCondition, FailVerdict, sort_by_restart_priority};
pub use fail_mods::{ExtraLives, Flawless, NoFail, SuddenDeath};
pub use health_processor::{HealthCore, HealthProcessor};
pub use hit_result::{HitResult, RESULT_COUNT};
pub use judgement::{Judgement, JudgementResult};

/// Base unit for per-result health deltas. A flawless hit restores slightly
/// more than this; a miss costs twice as much.
pub const MAX_HEALTH_INCREASE: f64 = 0.05;
