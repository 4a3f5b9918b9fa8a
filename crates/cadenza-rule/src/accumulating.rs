//! Accumulating processor for rulesets without continuous drain.

use crate::health_processor::{HealthCore, HealthProcessor};

/// Health processor that starts empty and only ever judges the attempt at
/// completion: the run fails if, once every object is judged, accumulated
/// health sits below the required threshold. Mid-chart depletion is
/// impossible because the bar cannot go below its starting point's floor.
pub struct AccumulatingHealthProcessor {
    core: HealthCore,
    required_health: f64,
}

impl AccumulatingHealthProcessor {
    pub fn new(required_health: f64) -> Self {
        Self {
            core: HealthCore::new(0.0),
            required_health,
        }
    }

    /// The health needed at completion to clear.
    pub fn required_health(&self) -> f64 {
        self.required_health
    }
}

impl HealthProcessor for AccumulatingHealthProcessor {
    fn core(&self) -> &HealthCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HealthCore {
        &mut self.core
    }

    fn default_fail_condition(&self) -> bool {
        self.core.has_completed() && self.core.health() < self.required_health
    }
}
