//! Session-allocation engine for convention scheduling.
//!
//! Assigns parties of attendees to game-master-run sessions within a time
//! slot, subject to capacity ranges, availability, and fairness constraints,
//! while maximizing aggregate preference satisfaction. The engine is a pure,
//! synchronous library: the hosting service supplies a frozen snapshot of
//! sessions, parties, and preferences, and decides what to do with the
//! returned plan (persist as draft, commit, or discard).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeSlot`, `Session`, `Party`, `Rating`,
//!   `AllocationPlan`, `Assignment`, `Violation`
//! - **`criteria`**: Capability-tag requirement matching (`matches`,
//!   `unmatched`) for schedule-slot validation
//! - **`scoring`**: Preference aggregation into a totally ordered score,
//!   including the golden-d20 eligibility gate
//! - **`ledger`**: Golden-d20 balance deltas for a completed allocation
//! - **`solver`**: The constrained assignment heuristic and plan KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, capacity
//!   ranges, dangling session references)
//!
//! # Guarantees
//!
//! The solver is a documented, deterministic heuristic — not an exact
//! optimizer. Identical snapshots produce identical plans; infeasibility
//! (non-viable sessions, unplaceable parties) is reported in the plan,
//! never raised as an error.

pub mod criteria;
pub mod ledger;
pub mod models;
pub mod scoring;
pub mod solver;
pub mod validation;
