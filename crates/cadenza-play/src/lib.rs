// Gameplay session orchestration: phases, health sampling, play records

mod record;
mod session;

pub use record::{
    HealthGraph, HealthSample, JudgementCounts, PlayOutcome, PlayRecord, read_record, write_record,
};
pub use session::{HEALTH_LOG_INTERVAL_US, PlayPhase, PlaySession};
