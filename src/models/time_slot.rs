//! Time slot model.
//!
//! A time slot is one column of the event schedule. Sessions never span
//! slot boundaries; parties hold at most one assignment per slot.
//!
//! # Time Representation
//! Start and end instants are in milliseconds relative to a scheduling
//! epoch (t=0). The consumer defines what t=0 means (e.g., event opening,
//! midnight UTC on day one).

use serde::{Deserialize, Serialize};

/// A schedule time slot.
///
/// Created at schedule-setup time and immutable afterward; the engine only
/// ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Human-readable name (e.g., "Saturday Morning").
    pub name: String,
    /// Ordinal position within the event schedule (0-indexed).
    pub ordinal: u32,
    /// Slot start (ms).
    pub start_ms: i64,
    /// Slot end (ms).
    pub end_ms: i64,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub fn new(id: impl Into<String>, ordinal: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            ordinal,
            start_ms: 0,
            end_ms: 0,
        }
    }

    /// Sets the slot name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the start and end instants.
    pub fn with_times(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.start_ms = start_ms;
        self.end_ms = end_ms;
        self
    }

    /// Slot duration (end - start) in ms.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

impl PartialEq for TimeSlot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TimeSlot {}

impl std::hash::Hash for TimeSlot {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_builder() {
        let slot = TimeSlot::new("TS1", 0)
            .with_name("Saturday Morning")
            .with_times(0, 10_800_000);

        assert_eq!(slot.id, "TS1");
        assert_eq!(slot.name, "Saturday Morning");
        assert_eq!(slot.ordinal, 0);
        assert_eq!(slot.duration_ms(), 10_800_000);
    }

    #[test]
    fn test_time_slot_equality_by_id() {
        let a = TimeSlot::new("TS1", 0).with_name("A");
        let b = TimeSlot::new("TS1", 3).with_name("B");
        let c = TimeSlot::new("TS2", 0).with_name("A");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
