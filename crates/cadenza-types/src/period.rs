//! Chart time periods.

use serde::{Deserialize, Serialize};

/// A half-open time interval `[start_us, end_us)` in chart time.
///
/// Used for break sections during which passive health drain is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    /// Break start (μs)
    pub start_us: i64,
    /// Break end (μs)
    pub end_us: i64,
}

impl BreakPeriod {
    pub fn new(start_us: i64, end_us: i64) -> Self {
        debug_assert!(start_us <= end_us, "invalid break: {start_us}..{end_us}");
        Self { start_us, end_us }
    }

    /// Break length in microseconds.
    pub fn duration_us(&self) -> i64 {
        self.end_us - self.start_us
    }

    /// Whether the given time falls inside this break.
    pub fn contains(&self, time_us: i64) -> bool {
        time_us >= self.start_us && time_us < self.end_us
    }

    /// Length of the overlap between this break and `[from_us, to_us)`.
    pub fn overlap_us(&self, from_us: i64, to_us: i64) -> i64 {
        (self.end_us.min(to_us) - self.start_us.max(from_us)).max(0)
    }
}
