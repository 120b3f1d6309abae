//! Preference rating model.
//!
//! A rating expresses how much a party wants a given session in a time
//! slot, on the ordered domain `{0..12, D20}`. `D20` is a scarce override:
//! honoring it costs one golden d20 from every member of the party, so it
//! outranks every numeric tier but is only achievable while every member
//! holds a positive balance (see `scoring`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A per-session preference rating.
///
/// Total order: `D20 > Tier(12) > Tier(11) > … > Tier(0)`. `Tier(0)` means
/// "cannot/will not attend" — the solver treats it as unavailable, not as
/// low priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    /// Numeric preference tier, 0..=12.
    Tier(u8),
    /// Golden-d20 override: top priority, spent on success.
    D20,
}

impl Rating {
    /// The "cannot attend" rating.
    pub const ZERO: Rating = Rating::Tier(0);

    /// Whether this rating disqualifies the party from the session.
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Rating::Tier(0))
    }

    /// Whether this is the golden-d20 override.
    #[inline]
    pub fn is_d20(&self) -> bool {
        matches!(self, Rating::D20)
    }

    /// Numeric tier value, if this is a numeric tier.
    pub fn tier(&self) -> Option<u8> {
        match self {
            Rating::Tier(t) => Some(*t),
            Rating::D20 => None,
        }
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Rating::D20, Rating::D20) => Ordering::Equal,
            (Rating::D20, Rating::Tier(_)) => Ordering::Greater,
            (Rating::Tier(_), Rating::D20) => Ordering::Less,
            (Rating::Tier(a), Rating::Tier(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
