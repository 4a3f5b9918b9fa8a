//! Concrete fail-condition policies.

use crate::fail_condition::{FailCondition, FailVerdict};
use crate::judgement::JudgementResult;
use crate::precision;

/// Never fail, no matter how depleted the bar gets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFail;

impl NoFail {
    pub fn new() -> Self {
        Self
    }
}

impl FailCondition for NoFail {
    fn name(&self) -> &'static str {
        "No Fail"
    }

    fn classify(&mut self, _result: &JudgementResult) -> FailVerdict {
        FailVerdict::BlockFail
    }

    fn classify_passive(&mut self) -> FailVerdict {
        FailVerdict::BlockFail
    }
}

/// Fail on the first combo-breaking result.
#[derive(Debug, Clone, Copy)]
pub struct SuddenDeath {
    restart: bool,
}

impl SuddenDeath {
    pub fn new(restart: bool) -> Self {
        Self { restart }
    }
}

impl FailCondition for SuddenDeath {
    fn name(&self) -> &'static str {
        "Sudden Death"
    }

    fn restart_on_fail(&self) -> bool {
        self.restart
    }

    fn classify(&mut self, result: &JudgementResult) -> FailVerdict {
        if result.result.breaks_combo() {
            FailVerdict::TriggerFail
        } else {
            FailVerdict::Nothing
        }
    }
}

/// Fail on any combo-affecting result below the object's best.
#[derive(Debug, Clone, Copy)]
pub struct Flawless {
    restart: bool,
}

impl Flawless {
    pub fn new(restart: bool) -> Self {
        Self { restart }
    }
}

impl FailCondition for Flawless {
    fn name(&self) -> &'static str {
        "Flawless"
    }

    fn restart_on_fail(&self) -> bool {
        self.restart
    }

    fn classify(&mut self, result: &JudgementResult) -> FailVerdict {
        if result.result.affects_combo() && result.result != result.judgement.max_result() {
            FailVerdict::TriggerFail
        } else {
            FailVerdict::Nothing
        }
    }
}

/// Block a would-be failure while lives remain, consuming one life and
/// refilling the bar each time. Assumes the standard [0, 1] health range.
#[derive(Debug, Clone, Copy)]
pub struct ExtraLives {
    lives: u32,
}

impl ExtraLives {
    pub fn new(lives: u32) -> Self {
        Self { lives }
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    fn would_deplete(result: &JudgementResult) -> bool {
        let after = (result.health_at_judgement + result.health_increase()).clamp(0.0, 1.0);
        precision::almost_bigger(0.0, after)
    }
}

impl FailCondition for ExtraLives {
    fn name(&self) -> &'static str {
        "Extra Lives"
    }

    fn classify(&mut self, result: &JudgementResult) -> FailVerdict {
        if self.lives > 0 && Self::would_deplete(result) {
            FailVerdict::BlockFail
        } else {
            FailVerdict::Nothing
        }
    }

    fn classify_passive(&mut self) -> FailVerdict {
        if self.lives > 0 {
            FailVerdict::BlockFail
        } else {
            FailVerdict::Nothing
        }
    }

    fn on_fail_blocked(&mut self) -> Option<f64> {
        if self.lives == 0 {
            return None;
        }
        self.lives -= 1;
        Some(1.0)
    }
}
