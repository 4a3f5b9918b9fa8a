//! Hit result categories.
//!
//! Every scored hit object produces exactly one of these categories. Each
//! carries an intrinsic health delta; a handful (ticks, bonus) exist for
//! objects that are judged in pieces rather than as a whole.

use serde::{Deserialize, Serialize};

use crate::MAX_HEALTH_INCREASE;

/// Number of hit result categories.
pub const RESULT_COUNT: usize = 11;

/// The scored outcome category of a single hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum HitResult {
    Miss = 0,
    Meh = 1,
    Ok = 2,
    Good = 3,
    Great = 4,
    Perfect = 5,
    SmallTickMiss = 6,
    SmallTickHit = 7,
    LargeTickMiss = 8,
    LargeTickHit = 9,
    Bonus = 10,
}

impl HitResult {
    pub const ALL: [HitResult; RESULT_COUNT] = [
        HitResult::Miss,
        HitResult::Meh,
        HitResult::Ok,
        HitResult::Good,
        HitResult::Great,
        HitResult::Perfect,
        HitResult::SmallTickMiss,
        HitResult::SmallTickHit,
        HitResult::LargeTickMiss,
        HitResult::LargeTickHit,
        HitResult::Bonus,
    ];

    /// Whether the object was hit at all.
    pub fn is_hit(self) -> bool {
        !matches!(
            self,
            Self::Miss | Self::SmallTickMiss | Self::LargeTickMiss
        )
    }

    /// Whether this result participates in combo.
    pub fn affects_combo(self) -> bool {
        matches!(
            self,
            Self::Miss
                | Self::Meh
                | Self::Ok
                | Self::Good
                | Self::Great
                | Self::Perfect
                | Self::LargeTickMiss
                | Self::LargeTickHit
        )
    }

    /// Whether this result resets the current combo.
    pub fn breaks_combo(self) -> bool {
        matches!(self, Self::Miss | Self::LargeTickMiss)
    }

    /// Whether this result is a pure score bonus.
    pub fn is_bonus(self) -> bool {
        matches!(self, Self::Bonus)
    }

    /// Intrinsic health delta for this result.
    ///
    /// Note that the weakest hits (Meh, Ok) still cost a sliver of health:
    /// scraping through a chart on barely-hits is a slow loss.
    pub fn base_health_increase(self) -> f64 {
        let scale = match self {
            Self::Miss => -2.0,
            Self::Meh => -0.05,
            Self::Ok => -0.01,
            Self::Good => 0.3,
            Self::Great => 1.0,
            Self::Perfect => 1.05,
            Self::SmallTickMiss => -0.5,
            Self::SmallTickHit => 0.5,
            Self::LargeTickMiss => -1.0,
            Self::LargeTickHit => 1.0,
            Self::Bonus => 0.2,
        };
        MAX_HEALTH_INCREASE * scale
    }
}

impl TryFrom<usize> for HitResult {
    type Error = ();

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(value).copied().ok_or(())
    }
}
