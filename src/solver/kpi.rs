//! Plan quality metrics.
//!
//! Computes allocation performance indicators from a completed plan and
//! its input snapshot. These are the documented quality metrics the
//! heuristic trades provable optimality for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Score | Sum of granted effective scores |
//! | Placement Rate | Fraction of parties seated |
//! | At-Optimum | Used sessions hitting their optimum exactly |
//! | Optimum Deviation | Used sessions off their optimum |
//! | Forced Placements | Score-0 seats taken in remediation |
//! | D20s Honored | Golden-d20 overrides granted |

use std::collections::HashMap;

use crate::models::{AllocationPlan, Party, Session};

/// Allocation performance indicators.
#[derive(Debug, Clone)]
pub struct PlanKpi {
    /// Sum of effective scores across placed parties.
    pub total_score: u32,
    /// Fraction of parties seated (0.0..1.0).
    pub placement_rate: f64,
    /// Used sessions whose player count equals their optimum.
    pub at_optimum_count: usize,
    /// Used sessions whose player count deviates from their optimum.
    pub optimum_deviation_count: usize,
    /// Sum of |player count - optimum| across used sessions.
    pub total_optimum_deviation: u32,
    /// Score-0 placements forced during remediation.
    pub forced_count: usize,
    /// Sessions reported non-viable.
    pub non_viable_count: usize,
    /// Golden-d20 overrides honored.
    pub d20_honored_count: usize,
    /// Per-session fill: player count / maximum (used sessions only).
    pub fill_by_session: HashMap<String, f64>,
}

impl PlanKpi {
    /// Computes KPIs from a plan and its input snapshot.
    pub fn calculate(plan: &AllocationPlan, sessions: &[Session], parties: &[Party]) -> Self {
        let mut at_optimum = 0;
        let mut deviating = 0;
        let mut total_deviation: u32 = 0;
        let mut fill_by_session = HashMap::new();

        for session in sessions {
            let count = plan.player_count(&session.id);
            if count == 0 {
                continue; // Unused session
            }
            if count == session.capacity.optimum {
                at_optimum += 1;
            } else {
                deviating += 1;
                total_deviation += count.abs_diff(session.capacity.optimum);
            }
            if session.capacity.maximum > 0 {
                fill_by_session.insert(
                    session.id.clone(),
                    count as f64 / session.capacity.maximum as f64,
                );
            }
        }

        let placement_rate = if parties.is_empty() {
            1.0
        } else {
            plan.assignment_count() as f64 / parties.len() as f64
        };

        Self {
            total_score: plan.total_score(),
            placement_rate,
            at_optimum_count: at_optimum,
            optimum_deviation_count: deviating,
            total_optimum_deviation: total_deviation,
            forced_count: plan.assignments.iter().filter(|a| a.forced).count(),
            non_viable_count: plan.non_viable.len(),
            d20_honored_count: plan.assignments.iter().filter(|a| a.score.is_d20()).count(),
            fill_by_session,
        }
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, max_optimum_deviation: u32) -> bool {
        self.placement_rate >= min_placement_rate
            && self.total_optimum_deviation <= max_optimum_deviation
    }
}
