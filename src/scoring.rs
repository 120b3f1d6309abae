//! Preference aggregation.
//!
//! Reduces a party's raw rating for a session plus contextual state (the
//! golden-d20 eligibility gate) into a single totally ordered score the
//! solver's objective can compare. The gate is checked against the
//! external ledger through [`BalanceLookup`]; the aggregator itself holds
//! no state.

use serde::{Deserialize, Serialize};

use crate::ledger::BalanceLookup;
use crate::models::{Party, Rating};

/// An effective preference score.
///
/// Values 0..=12 correspond to the numeric tiers; 13 is an honored
/// golden-d20 override, which outranks every tier. 0 disqualifies the
/// party from the session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// "Cannot attend" — the solver never chooses this willingly.
    pub const ZERO: Score = Score(0);
    /// An honored golden-d20 override.
    pub const D20: Score = Score(13);
    /// The top numeric tier.
    pub const MAX_TIER: u8 = 12;

    /// Creates a score from a numeric tier (0..=12).
    pub fn new(tier: u8) -> Self {
        debug_assert!(tier <= Self::MAX_TIER);
        Score(tier)
    }

    /// Raw score value (0..=13).
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this score disqualifies the placement.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether this is an honored d20 override.
    #[inline]
    pub fn is_d20(self) -> bool {
        self.0 == 13
    }
}

/// Whether every member of the party currently holds a golden d20.
///
/// A single member without balance makes the whole party ineligible: the
/// override spends one d20 from each member when honored.
pub fn d20_eligible(party: &Party, ledger: &impl BalanceLookup) -> bool {
    party.member_ids().all(|m| ledger.has_golden_d20(m))
}

/// The party's effective score for a session.
///
/// - A numeric tier maps to itself; 0 (or no recorded rating) means the
///   party cannot attend.
/// - `D20` maps to [`Score::D20`] when the party is eligible. When
///   ineligible, the score is clamped to the party's highest non-d20 tier
///   across its preferences, so the session stays their top regular choice
///   instead of being silently disqualified (12 when the party holds no
///   numeric ratings at all).
pub fn effective_score(party: &Party, session_id: &str, eligible: bool) -> Score {
    match party.rating_for(session_id) {
        Rating::Tier(t) => Score::new(t),
        Rating::D20 if eligible => Score::D20,
        Rating::D20 => {
            let highest_tier = party
                .preferences
                .values()
                .filter_map(|r| r.tier())
                .filter(|t| *t > 0)
                .max()
                .unwrap_or(Score::MAX_TIER);
            Score::new(highest_tier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;
    use std::collections::HashMap;

    fn balances(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_score_ordering() {
        assert!(Score::D20 > Score::new(12));
        assert!(Score::new(12) > Score::new(1));
        assert!(Score::new(1) > Score::ZERO);
    }

    #[test]
    fn test_score_predicates() {
        assert!(Score::ZERO.is_zero());
        assert!(Score::D20.is_d20());
        assert!(!Score::new(12).is_d20());
        assert_eq!(Score::new(7).value(), 7);
    }

    #[test]
    fn test_eligibility_requires_every_member() {
        let party = Party::new("P1", "alice").with_member(Player::new("bob"));

        let all_funded = balances(&[("alice", 1), ("bob", 2)]);
        assert!(d20_eligible(&party, &all_funded));

        let one_broke = balances(&[("alice", 1), ("bob", 0)]);
        assert!(!d20_eligible(&party, &one_broke));
    }

    #[test]
    fn test_numeric_tiers_map_to_themselves() {
        let party = Party::new("P1", "alice")
            .with_preference("S1", Rating::Tier(10))
            .with_preference("S2", Rating::Tier(0));

        assert_eq!(effective_score(&party, "S1", true), Score::new(10));
        assert_eq!(effective_score(&party, "S2", true), Score::ZERO);
        assert_eq!(effective_score(&party, "unrated", true), Score::ZERO);
    }

    #[test]
    fn test_eligible_d20_scores_top() {
        let party = Party::new("P1", "alice").with_preference("S1", Rating::D20);
        assert_eq!(effective_score(&party, "S1", true), Score::D20);
    }

    #[test]
    fn test_ineligible_d20_clamps_to_highest_tier() {
        let party = Party::new("P1", "alice")
            .with_preference("S1", Rating::D20)
            .with_preference("S2", Rating::Tier(9))
            .with_preference("S3", Rating::Tier(4));

        assert_eq!(effective_score(&party, "S1", false), Score::new(9));
    }

    #[test]
    fn test_ineligible_d20_without_tiers_stays_top_choice() {
        // No numeric ratings to clamp to: the session remains the party's
        // top regular choice rather than being disqualified.
        let party = Party::new("P1", "alice").with_preference("S1", Rating::D20);
        assert_eq!(effective_score(&party, "S1", false), Score::new(12));
    }
}
