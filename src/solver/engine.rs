//! Constrained party-to-session assignment.
//!
//! # Algorithm
//!
//! 1. **Pin GMs.** Every GM-owning party goes into the session it runs,
//!    counted against both minimum and maximum. A pin that overflows the
//!    maximum is reported as a violation, not silently absorbed.
//! 2. **Greedy placement.** Remaining parties in (best effective score
//!    desc, member count desc, party ID asc) order each take the first
//!    candidate session with room, trying candidates in (score desc,
//!    seats-to-optimum desc, session ID asc) order.
//! 3. **Under-minimum remediation.** Deficient sessions pull compatible
//!    unallocated parties, then poach from sessions above their optimum
//!    (at most one tier of preference lost, source stays at minimum),
//!    and as a last resort accept flagged score-0 placements. Sessions
//!    still short are reported non-viable, never cancelled here.
//! 4. **Fairness recording.** Golden-d20 deltas (spends and compensation
//!    for eligible-but-denied requests) are computed and attached unless
//!    the request is a dry run.
//!
//! This is a heuristic, not an exact optimizer: it favors determinism,
//! attributable rejections, and bounded running time (linear in parties ×
//! sessions) over provable optimality. The solver is stateless per
//! invocation — its only working state is the capacity counters built
//! here and discarded on return.
//!
//! # Complexity
//! O(p * s) per pass where p=parties, s=sessions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ledger::{self, BalanceLookup};
use crate::models::{
    AllocationPlan, Assignment, NonViableSession, Party, Session, UnallocatedParty,
    UnallocatedReason, Violation,
};
use crate::scoring::{d20_eligible, effective_score, Score};
use crate::validation::{validate_input, ValidationError};

/// Input snapshot for one solve.
///
/// All sessions and parties must belong to the same time slot; the
/// snapshot is read-only for the duration of the solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Sessions in the slot.
    pub sessions: Vec<Session>,
    /// Checked-in parties, GM parties included.
    pub parties: Vec<Party>,
    /// When set, golden-d20 delta computation is suppressed.
    pub dry_run: bool,
}

impl SolveRequest {
    /// Creates a solve request.
    pub fn new(sessions: Vec<Session>, parties: Vec<Party>) -> Self {
        Self {
            sessions,
            parties,
            dry_run: false,
        }
    }

    /// Suppresses delta computation (save-draft semantics).
    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// The assignment solver.
///
/// Stateless: every invocation builds its own capacity counters, so
/// concurrent solves over different slots share nothing. Identical
/// snapshots produce identical plans.
///
/// # Example
///
/// ```
/// use convene::models::{Party, Rating, Session};
/// use convene::solver::{AllocationSolver, SolveRequest};
/// use std::collections::HashMap;
///
/// let sessions = vec![Session::new("S1", "G1", "gm-1").with_capacity(1, 3, 5)];
/// let parties = vec![
///     Party::new("P1", "alice").with_preference("S1", Rating::Tier(10)),
/// ];
/// let ledger: HashMap<String, i64> = HashMap::new();
///
/// let solver = AllocationSolver::new();
/// let plan = solver
///     .solve(&SolveRequest::new(sessions, parties), &ledger)
///     .unwrap();
/// assert_eq!(plan.player_count("S1"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AllocationSolver;

/// A free party with its positively scored candidate sessions,
/// score-descending (session ID ascending within a score).
struct Seeker<'a> {
    party: &'a Party,
    candidates: Vec<(Score, &'a str)>,
}

impl<'a> Seeker<'a> {
    fn build(party: &'a Party, eligible: bool) -> Self {
        // BTreeMap iteration gives session IDs ascending; the stable sort
        // by score keeps that order within each score group.
        let mut candidates: Vec<(Score, &'a str)> = party
            .preferences
            .keys()
            .map(|sid| (effective_score(party, sid, eligible), sid.as_str()))
            .filter(|(score, _)| !score.is_zero())
            .collect();
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        Self { party, candidates }
    }

    fn best(&self) -> Score {
        self.candidates.first().map(|(s, _)| *s).unwrap_or(Score::ZERO)
    }
}

impl AllocationSolver {
    /// Creates a solver.
    pub fn new() -> Self {
        Self
    }

    /// Computes an allocation plan for one time slot.
    ///
    /// Structural input errors abort the solve before any computation.
    /// Infeasibility never errors: non-viable sessions and unplaceable
    /// parties are reported in the returned plan.
    pub fn solve(
        &self,
        request: &SolveRequest,
        ledger: &impl BalanceLookup,
    ) -> Result<AllocationPlan, Vec<ValidationError>> {
        validate_input(&request.sessions, &request.parties)?;

        let sessions = &request.sessions;
        let parties = &request.parties;

        let session_by_id: HashMap<&str, &Session> =
            sessions.iter().map(|s| (s.id.as_str(), s)).collect();
        let eligibility: HashMap<&str, bool> = parties
            .iter()
            .map(|p| (p.id.as_str(), d20_eligible(p, ledger)))
            .collect();

        // Working capacity counters, discarded on return.
        let mut counts: HashMap<&str, u32> =
            sessions.iter().map(|s| (s.id.as_str(), 0)).collect();
        let mut plan = AllocationPlan::new();

        // Pass 1 — pin GMs. Mutual exclusion of a GM across concurrent
        // sessions is an upstream precondition, not re-derived here.
        let mut pinned: HashSet<&str> = HashSet::new();
        for session in sessions {
            for party in parties.iter().filter(|p| p.is_gm_of(&session.id)) {
                let score =
                    effective_score(party, &session.id, eligibility[party.id.as_str()]);
                plan.add_assignment(
                    Assignment::new(&session.id, &party.id, party.size(), score).with_pinned(),
                );
                *counts.get_mut(session.id.as_str()).expect("known session") += party.size();
                pinned.insert(party.id.as_str());
            }
        }
        // Pinning is the only pass that can overflow a maximum; every
        // later placement checks room first. Report the breach so the
        // plan stays attributable.
        for session in sessions {
            let count = counts[session.id.as_str()];
            if count > session.capacity.maximum {
                plan.add_violation(Violation::above_maximum(
                    &session.id,
                    format!(
                        "session '{}' has {} pinned players, maximum is {}",
                        session.id, count, session.capacity.maximum
                    ),
                ));
            }
        }

        // Pass 2 — greedy placement.
        let mut seekers: Vec<Seeker> = parties
            .iter()
            .filter(|p| !pinned.contains(p.id.as_str()))
            .map(|p| Seeker::build(p, eligibility[p.id.as_str()]))
            .collect();
        seekers.sort_by(|a, b| {
            b.best()
                .cmp(&a.best())
                .then(b.party.size().cmp(&a.party.size()))
                .then(a.party.id.cmp(&b.party.id))
        });

        for seeker in &seekers {
            if seeker.candidates.is_empty() {
                plan.unallocated.push(UnallocatedParty::no_positive_score(
                    &seeker.party.id,
                    format!("party '{}' rated no session above 0", seeker.party.id),
                ));
                continue;
            }
            match first_fit(seeker, &session_by_id, &counts) {
                Some((session_id, score)) => {
                    *counts.get_mut(session_id).expect("known session") += seeker.party.size();
                    plan.add_assignment(Assignment::new(
                        session_id,
                        &seeker.party.id,
                        seeker.party.size(),
                        score,
                    ));
                }
                None => {
                    plan.unallocated.push(UnallocatedParty::capacity_exceeded(
                        &seeker.party.id,
                        "capacity exceeded".to_string(),
                    ));
                }
            }
        }

        // Pass 3 — under-minimum remediation, in session input order.
        for session in sessions {
            remediate(
                session,
                parties,
                &session_by_id,
                &eligibility,
                &mut counts,
                &mut plan,
            );
        }

        // Pass 4 — fairness recording: golden-d20 spends and compensation
        // for eligible-but-denied requests. Reporting only, no re-solve.
        if !request.dry_run {
            let report = ledger::calculate(&plan.assignments, parties, ledger);
            for warning in &report.warnings {
                plan.add_violation(Violation::ledger_inconsistency(
                    &warning.player_id,
                    warning.message.clone(),
                ));
            }
            plan.deltas = report.deltas;
            plan.ledger_warnings = report.warnings;
        }

        Ok(plan)
    }
}

/// First candidate session with room, trying score groups in descending
/// order and, within a group, sessions with the most seats left to
/// optimum first (session ID breaks remaining ties). Steering equal-score
/// placements toward optimum serves the secondary objective of minimizing
/// optimum deviation.
fn first_fit<'a>(
    seeker: &Seeker<'a>,
    session_by_id: &HashMap<&str, &Session>,
    counts: &HashMap<&str, u32>,
) -> Option<(&'a str, Score)> {
    let size = seeker.party.size();
    let mut i = 0;
    while i < seeker.candidates.len() {
        let score = seeker.candidates[i].0;
        let mut group: Vec<&'a str> = Vec::new();
        while i < seeker.candidates.len() && seeker.candidates[i].0 == score {
            group.push(seeker.candidates[i].1);
            i += 1;
        }
        group.sort_by(|a, b| {
            let to_opt_a = session_by_id[a].capacity.optimum as i64 - counts[a] as i64;
            let to_opt_b = session_by_id[b].capacity.optimum as i64 - counts[b] as i64;
            to_opt_b.cmp(&to_opt_a).then(a.cmp(b))
        });
        for sid in group {
            if counts[sid] + size <= session_by_id[sid].capacity.maximum {
                return Some((sid, score));
            }
        }
    }
    None
}

/// Pulls parties into a below-minimum session until it reaches minimum or
/// no eligible party remains; reports it non-viable in the latter case.
fn remediate(
    session: &Session,
    parties: &[Party],
    session_by_id: &HashMap<&str, &Session>,
    eligibility: &HashMap<&str, bool>,
    counts: &mut HashMap<&str, u32>,
    plan: &mut AllocationPlan,
) {
    let sid = session.id.as_str();
    // An empty session is unused, not deficient; leave it alone.
    if counts[sid] == 0 || counts[sid] >= session.capacity.minimum {
        return;
    }

    let party_by_id: HashMap<&str, &Party> =
        parties.iter().map(|p| (p.id.as_str(), p)).collect();

    while counts[sid] < session.capacity.minimum {
        if pull_unallocated(session, &party_by_id, eligibility, counts, plan, false) {
            continue;
        }
        if poach_placed(session, &party_by_id, eligibility, counts, plan, session_by_id) {
            continue;
        }
        // Last resort: a score-0 placement, flagged as forced. Only
        // unallocated parties qualify — for them every other placement
        // also scored 0 or was full.
        if pull_unallocated(session, &party_by_id, eligibility, counts, plan, true) {
            continue;
        }
        break;
    }

    if counts[sid] < session.capacity.minimum {
        let gm_party_id = plan
            .assignments
            .iter()
            .find(|a| a.session_id == sid && a.pinned)
            .map(|a| a.party_id.clone());
        let forced_party_ids: Vec<String> = plan
            .assignments
            .iter()
            .filter(|a| a.session_id == sid && a.forced)
            .map(|a| a.party_id.clone())
            .collect();
        plan.add_violation(Violation::below_minimum(
            sid,
            format!(
                "session '{}' has {} players, minimum is {}",
                sid, counts[sid], session.capacity.minimum
            ),
        ));
        plan.non_viable.push(NonViableSession {
            session_id: sid.to_string(),
            player_count: counts[sid],
            minimum: session.capacity.minimum,
            gm_party_id,
            forced_party_ids,
        });
    }
}

/// Moves the best unallocated party into the deficient session. With
/// `forced` unset only parties scoring above 0 there qualify. With it
/// set, any fitting party is taken and the placement is flagged; parties
/// that rated every session 0 are taken before parties that had positive
/// options elsewhere but found them full.
fn pull_unallocated(
    session: &Session,
    party_by_id: &HashMap<&str, &Party>,
    eligibility: &HashMap<&str, bool>,
    counts: &mut HashMap<&str, u32>,
    plan: &mut AllocationPlan,
    forced: bool,
) -> bool {
    let sid = session.id.as_str();
    let mut best: Option<(bool, Score, u32, usize)> = None;

    for (idx, entry) in plan.unallocated.iter().enumerate() {
        let party = party_by_id[entry.party_id.as_str()];
        if counts[sid] + party.size() > session.capacity.maximum {
            continue;
        }
        let score = effective_score(party, sid, eligibility[party.id.as_str()]);
        if score.is_zero() != forced {
            continue;
        }
        let no_options = entry.reason == UnallocatedReason::NoPositiveScore;
        let better = match &best {
            None => true,
            // Parties without options first, then highest score, then
            // larger parties; the unallocated list is already in
            // deterministic placement order.
            Some((n, s, sz, _)) => (no_options, score, party.size()) > (*n, *s, *sz),
        };
        if better {
            best = Some((no_options, score, party.size(), idx));
        }
    }

    let Some((_, score, _, idx)) = best else {
        return false;
    };
    let entry = plan.unallocated.remove(idx);
    let party = party_by_id[entry.party_id.as_str()];
    *counts.get_mut(sid).expect("known session") += party.size();

    let mut assignment = Assignment::new(sid, &party.id, party.size(), score);
    if forced {
        assignment = assignment.with_forced();
        plan.add_violation(Violation::forced_placement(
            &party.id,
            format!(
                "party '{}' placed in session '{}' at score 0 to reach minimum",
                party.id, sid
            ),
        ));
    }
    plan.add_assignment(assignment);
    true
}

/// Moves a party from a session above its optimum into the deficient
/// one. The move may cost the party at most one preference tier, must
/// leave the source at or above its minimum, and never touches pinned,
/// forced, or honored-d20 placements.
fn poach_placed(
    session: &Session,
    party_by_id: &HashMap<&str, &Party>,
    eligibility: &HashMap<&str, bool>,
    counts: &mut HashMap<&str, u32>,
    plan: &mut AllocationPlan,
    session_by_id: &HashMap<&str, &Session>,
) -> bool {
    let sid = session.id.as_str();
    let mut best: Option<(Score, u32, usize)> = None;

    for (idx, a) in plan.assignments.iter().enumerate() {
        if a.session_id == sid || a.pinned || a.forced || a.score.is_d20() {
            continue;
        }
        let source = session_by_id[a.session_id.as_str()];
        if counts[source.id.as_str()] <= source.capacity.optimum {
            continue;
        }
        if counts[source.id.as_str()] - a.player_count < source.capacity.minimum {
            continue;
        }
        if counts[sid] + a.player_count > session.capacity.maximum {
            continue;
        }
        let party = party_by_id[a.party_id.as_str()];
        let score = effective_score(party, sid, eligibility[party.id.as_str()]);
        if score.is_zero() || score.value() + 1 < a.score.value() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((s, sz, _)) => (score, a.player_count) > (*s, *sz),
        };
        if better {
            best = Some((score, a.player_count, idx));
        }
    }

    let Some((score, _, idx)) = best else {
        return false;
    };
    let moved = plan.assignments.remove(idx);
    *counts
        .get_mut(moved.session_id.as_str())
        .expect("known session") -= moved.player_count;
    *counts.get_mut(sid).expect("known session") += moved.player_count;
    plan.add_assignment(Assignment::new(
        sid,
        &moved.party_id,
        moved.player_count,
        score,
    ));
    true
}
