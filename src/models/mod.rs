//! Allocation domain models.
//!
//! Immutable value records describing one time slot's worth of allocation
//! input (sessions, parties, preferences) and output (the plan). All types
//! are read-only snapshots for the duration of a solve — derived quantities
//! such as remaining capacity are computed on demand, never stored.

mod party;
mod plan;
mod preference;
mod session;
mod time_slot;

pub use party::{Party, Player};
pub use plan::{
    AllocationPlan, Assignment, NonViableSession, UnallocatedParty, UnallocatedReason, Violation,
    ViolationType,
};
pub use preference::Rating;
pub use session::{CapacityRange, Session};
pub use time_slot::TimeSlot;
