//! Allocation plan (solution) model.
//!
//! A plan is the complete output of one solve: party-to-session
//! assignments, the unallocated pool with reasons, sessions that could not
//! reach their minimum, constraint violations, and golden-d20 balance
//! deltas. The engine never persists a plan — committing or discarding it
//! is the caller's decision.

use serde::{Deserialize, Serialize};

use crate::ledger::{BalanceDelta, LedgerWarning};
use crate::scoring::Score;

/// A complete allocation plan for one time slot.
///
/// All counts (per-session player totals, fill state) are recomputed from
/// the assignment list on demand rather than stored, so the plan cannot
/// drift out of sync with itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Party-to-session assignments.
    pub assignments: Vec<Assignment>,
    /// Parties left without a seat, with the concrete reason.
    pub unallocated: Vec<UnallocatedParty>,
    /// Sessions that could not reach their minimum after remediation.
    pub non_viable: Vec<NonViableSession>,
    /// Constraint violations detected in this plan.
    pub violations: Vec<Violation>,
    /// Golden-d20 balance deltas (empty on a dry run).
    pub deltas: Vec<BalanceDelta>,
    /// Ledger inconsistencies surfaced by the delta calculator.
    pub ledger_warnings: Vec<LedgerWarning>,
}

/// A party placed in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned session ID.
    pub session_id: String,
    /// Assigned party ID.
    pub party_id: String,
    /// Number of players the party contributes.
    pub player_count: u32,
    /// Effective score the placement was granted at.
    pub score: Score,
    /// GM placement: fixed before solving, zero solver freedom.
    pub pinned: bool,
    /// Score-0 placement forced by under-minimum remediation.
    pub forced: bool,
}

/// A party the solver could not seat, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnallocatedParty {
    /// The party left out.
    pub party_id: String,
    /// Why no seat was found.
    pub reason: UnallocatedReason,
    /// Human-readable description.
    pub message: String,
}

/// Why a party ended up unallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnallocatedReason {
    /// Every positively rated session was full.
    CapacityExceeded,
    /// The party rated every session 0 (or gave no ratings).
    NoPositiveScore,
}

/// A session that cannot reach its minimum player count.
///
/// Reported, never auto-cancelled — cancellation is a caller decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonViableSession {
    /// The deficient session.
    pub session_id: String,
    /// Players placed (GM party included).
    pub player_count: u32,
    /// The minimum it failed to reach.
    pub minimum: u32,
    /// The pinned GM party, if the session has one in this plan.
    pub gm_party_id: Option<String>,
    /// Parties whose placement here was forced at score 0.
    pub forced_party_ids: Vec<String>,
}

/// A constraint violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (session or party).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of plan violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Session below its minimum player count.
    BelowMinimum,
    /// Session above its maximum player count.
    AboveMaximum,
    /// Party placed at score 0 as a remediation last resort.
    ForcedPlacement,
    /// A proposed delta would drive a recorded balance negative.
    LedgerInconsistency,
    /// Domain-specific violation.
    Custom(String),
}

impl Assignment {
    /// Creates an ordinary (solver-chosen) assignment.
    pub fn new(
        session_id: impl Into<String>,
        party_id: impl Into<String>,
        player_count: u32,
        score: Score,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            party_id: party_id.into(),
            player_count,
            score,
            pinned: false,
            forced: false,
        }
    }

    /// Marks this as a pinned GM placement.
    pub fn with_pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Marks this as a forced score-0 placement.
    pub fn with_forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

impl UnallocatedParty {
    /// Every positively rated session was full.
    pub fn capacity_exceeded(party_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            party_id: party_id.into(),
            reason: UnallocatedReason::CapacityExceeded,
            message: message.into(),
        }
    }

    /// The party had no session rated above 0.
    pub fn no_positive_score(party_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            party_id: party_id.into(),
            reason: UnallocatedReason::NoPositiveScore,
            message: message.into(),
        }
    }
}

impl Violation {
    /// Creates a below-minimum violation.
    pub fn below_minimum(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::BelowMinimum,
            entity_id: session_id.into(),
            message: message.into(),
            severity: 80,
        }
    }

    /// Creates an above-maximum violation.
    pub fn above_maximum(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::AboveMaximum,
            entity_id: session_id.into(),
            message: message.into(),
            severity: 90,
        }
    }

    /// Creates a forced-placement violation.
    pub fn forced_placement(party_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::ForcedPlacement,
            entity_id: party_id.into(),
            message: message.into(),
            severity: 40,
        }
    }

    /// Creates a ledger inconsistency violation.
    pub fn ledger_inconsistency(player_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::LedgerInconsistency,
            entity_id: player_id.into(),
            message: message.into(),
            severity: 70,
        }
    }
}

impl AllocationPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the plan has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Total players placed in a session (recomputed, never cached).
    pub fn player_count(&self, session_id: &str) -> u32 {
        self.assignments_for_session(session_id)
            .iter()
            .map(|a| a.player_count)
            .sum()
    }

    /// Finds the assignment for a given party.
    pub fn assignment_for_party(&self, party_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.party_id == party_id)
    }

    /// Returns all assignments for a given session.
    pub fn assignments_for_session(&self, session_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.session_id == session_id)
            .collect()
    }

    /// Whether a session was reported non-viable.
    pub fn is_non_viable(&self, session_id: &str) -> bool {
        self.non_viable.iter().any(|n| n.session_id == session_id)
    }

    /// Whether a party ended up unallocated.
    pub fn is_unallocated(&self, party_id: &str) -> bool {
        self.unallocated.iter().any(|u| u.party_id == party_id)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Sum of effective scores across placed parties.
    pub fn total_score(&self) -> u32 {
        self.assignments.iter().map(|a| a.score.value() as u32).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> AllocationPlan {
        let mut plan = AllocationPlan::new();
        plan.add_assignment(Assignment::new("S1", "P_GM", 1, Score::ZERO).with_pinned());
        plan.add_assignment(Assignment::new("S1", "P1", 3, Score::new(10)));
        plan.add_assignment(Assignment::new("S1", "P2", 2, Score::new(5)));
        plan.add_assignment(Assignment::new("S2", "P3", 2, Score::new(8)));
        plan
    }

    #[test]
    fn test_player_count_recomputed() {
        let plan = sample_plan();
        assert_eq!(plan.player_count("S1"), 6);
        assert_eq!(plan.player_count("S2"), 2);
        assert_eq!(plan.player_count("S99"), 0);
    }

    #[test]
    fn test_assignment_lookups() {
        let plan = sample_plan();
        let a = plan.assignment_for_party("P1").unwrap();
        assert_eq!(a.session_id, "S1");
        assert!(plan.assignment_for_party("P99").is_none());
        assert_eq!(plan.assignments_for_session("S1").len(), 3);
    }

    #[test]
    fn test_pinned_and_forced_flags() {
        let plan = sample_plan();
        let gm = plan.assignment_for_party("P_GM").unwrap();
        assert!(gm.pinned);
        assert!(!gm.forced);

        let forced = Assignment::new("S1", "P9", 2, Score::ZERO).with_forced();
        assert!(forced.forced);
    }

    #[test]
    fn test_plan_validity() {
        let mut plan = sample_plan();
        assert!(plan.is_valid());
        plan.add_violation(Violation::below_minimum("S2", "2 < 4"));
        assert!(!plan.is_valid());
    }

    #[test]
    fn test_total_score() {
        let plan = sample_plan();
        assert_eq!(plan.total_score(), 23);
    }

    #[test]
    fn test_unallocated_factories() {
        let u = UnallocatedParty::capacity_exceeded("P5", "capacity exceeded");
        assert_eq!(u.reason, UnallocatedReason::CapacityExceeded);

        let u2 = UnallocatedParty::no_positive_score("P6", "no rated session");
        assert_eq!(u2.reason, UnallocatedReason::NoPositiveScore);
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::below_minimum("S1", "short");
        assert_eq!(v.violation_type, ViolationType::BelowMinimum);
        let v = Violation::forced_placement("P1", "forced");
        assert_eq!(v.violation_type, ViolationType::ForcedPlacement);
        let v = Violation::ledger_inconsistency("alice", "balance would go negative");
        assert_eq!(v.violation_type, ViolationType::LedgerInconsistency);
    }

    #[test]
    fn test_empty_plan() {
        let plan = AllocationPlan::new();
        assert_eq!(plan.assignment_count(), 0);
        assert!(plan.is_valid());
        assert_eq!(plan.total_score(), 0);
    }
}
