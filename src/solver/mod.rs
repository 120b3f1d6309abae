//! The allocation solver and its quality metrics.
//!
//! - **`engine`**: the constrained assignment heuristic (GM pinning,
//!   greedy placement, under-minimum remediation, fairness recording)
//! - **`kpi`**: plan quality indicators computed after a solve

mod engine;
mod kpi;

pub use engine::{AllocationSolver, SolveRequest};
pub use kpi::PlanKpi;
