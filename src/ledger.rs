//! Golden-d20 economy deltas.
//!
//! Computes per-player balance changes that result from a completed
//! allocation: spending a d20 when the override was honored, and granting
//! one back in compensation when an eligible d20 request was denied. The
//! engine only computes deltas — the durable balance belongs to the
//! external ledger, which applies them when (and only when) the caller
//! commits the plan.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Assignment, Party};

/// Read-only balance lookup, injected by the snapshot provider.
///
/// The engine never writes through this interface.
pub trait BalanceLookup {
    /// The player's current golden-d20 balance.
    fn balance(&self, player_id: &str) -> i64;

    /// Whether the player holds at least one golden d20.
    fn has_golden_d20(&self, player_id: &str) -> bool {
        self.balance(player_id) > 0
    }
}

impl BalanceLookup for HashMap<String, i64> {
    fn balance(&self, player_id: &str) -> i64 {
        self.get(player_id).copied().unwrap_or(0)
    }
}

/// A proposed balance adjustment for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    /// The player whose balance changes.
    pub player_id: String,
    /// The adjustment: -1 for an honored d20, +1 for compensation.
    pub delta: i64,
}

/// A ledger inconsistency attached to a specific party and session.
///
/// Raised when a proposed delta would drive a recorded balance negative;
/// the delta is reported as-is, never silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerWarning {
    /// The player whose balance would go negative.
    pub player_id: String,
    /// The player's party.
    pub party_id: String,
    /// The d20-rated session involved.
    pub session_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Deltas plus any inconsistencies detected while computing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Per-player balance adjustments.
    pub deltas: Vec<BalanceDelta>,
    /// Inconsistencies between the recorded balances and the deltas.
    pub warnings: Vec<LedgerWarning>,
}

impl LedgerReport {
    /// Net delta for a player (0 when the player is unaffected).
    pub fn delta_for(&self, player_id: &str) -> i64 {
        self.deltas
            .iter()
            .filter(|d| d.player_id == player_id)
            .map(|d| d.delta)
            .sum()
    }
}

/// Computes golden-d20 deltas for a completed allocation.
///
/// Pure function of the assignments, the parties' preferences, and the
/// prior balances:
///
/// - `-1` for every member of a party placed in the session it rated
///   `D20`, provided every member held a positive balance (the
///   eligibility gate holds here too — an ineligible party placed in its
///   d20-rated session on a clamped score spends nothing);
/// - `+1` for every member of a party that was eligible for its `D20`
///   request but was denied that placement.
///
/// A warning is attached whenever a spend would drive a recorded balance
/// negative, which can only happen if the injected balances disagree with
/// themselves between eligibility and delta computation.
pub fn calculate(
    assignments: &[Assignment],
    parties: &[Party],
    ledger: &impl BalanceLookup,
) -> LedgerReport {
    let mut report = LedgerReport::default();

    for party in parties {
        // At most one D20 preference per party per slot (validated input);
        // BTreeMap order makes the pick deterministic regardless.
        let Some(d20_session) = party
            .preferences
            .iter()
            .find(|(_, r)| r.is_d20())
            .map(|(s, _)| s.as_str())
        else {
            continue;
        };

        let eligible = party.member_ids().all(|m| ledger.has_golden_d20(m));
        if !eligible {
            continue;
        }

        let honored = assignments
            .iter()
            .any(|a| a.party_id == party.id && a.session_id == d20_session);
        let delta = if honored { -1 } else { 1 };

        for member in party.member_ids() {
            if ledger.balance(member) + delta < 0 {
                report.warnings.push(LedgerWarning {
                    player_id: member.to_string(),
                    party_id: party.id.clone(),
                    session_id: d20_session.to_string(),
                    message: format!(
                        "balance of player '{member}' would become {} (recorded {})",
                        ledger.balance(member) + delta,
                        ledger.balance(member)
                    ),
                });
            }
            report.deltas.push(BalanceDelta {
                player_id: member.to_string(),
                delta,
            });
        }
    }

    report
}
