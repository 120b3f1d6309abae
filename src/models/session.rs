//! Session model.
//!
//! A session is one scheduled occurrence of a game: bound to a time slot,
//! run by a game master at one table, with a capacity range over player
//! count. Capacity is fixed at session creation; the engine never mutates
//! it mid-solve.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::criteria::Criterion;

/// A player-count capacity range.
///
/// Invariant: `minimum <= optimum <= maximum` (checked by input validation,
/// not by construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRange {
    /// Fewest players the session can run with.
    pub minimum: u32,
    /// The player count the game master considers ideal.
    pub optimum: u32,
    /// Hard ceiling on players.
    pub maximum: u32,
}

impl CapacityRange {
    /// Creates a capacity range.
    pub fn new(minimum: u32, optimum: u32, maximum: u32) -> Self {
        Self {
            minimum,
            optimum,
            maximum,
        }
    }

    /// Whether `minimum <= optimum <= maximum` holds.
    pub fn is_well_formed(&self) -> bool {
        self.minimum <= self.optimum && self.optimum <= self.maximum
    }

    /// Whether a player count lies within `[minimum, maximum]`.
    pub fn contains(&self, count: u32) -> bool {
        count >= self.minimum && count <= self.maximum
    }
}

/// A game session occupying one table in one time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,
    /// The game this session runs.
    pub game_id: String,
    /// Player identity of the game master. The GM's party is pinned to
    /// this session with zero solver freedom.
    pub gamemaster_id: String,
    /// The time slot this session occupies.
    pub time_slot_id: String,
    /// Player-count capacity range.
    pub capacity: CapacityRange,
    /// Capability tags provided by the table/room hosting this session
    /// (e.g. `"room-large"`, `"facility-power"`, `"gm-42"`).
    pub provides: Vec<String>,
    /// Criteria the hosting table must satisfy for this game to legally
    /// occupy the slot. Order is preserved for diagnostics.
    pub requirements: Vec<Criterion>,
}

impl Session {
    /// Creates a new session.
    pub fn new(
        id: impl Into<String>,
        game_id: impl Into<String>,
        gamemaster_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            game_id: game_id.into(),
            gamemaster_id: gamemaster_id.into(),
            time_slot_id: String::new(),
            capacity: CapacityRange::new(0, 0, 0),
            provides: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Sets the time slot.
    pub fn with_time_slot(mut self, time_slot_id: impl Into<String>) -> Self {
        self.time_slot_id = time_slot_id.into();
        self
    }

    /// Sets the capacity range.
    pub fn with_capacity(mut self, minimum: u32, optimum: u32, maximum: u32) -> Self {
        self.capacity = CapacityRange::new(minimum, optimum, maximum);
        self
    }

    /// Adds a provided capability tag.
    pub fn with_provide(mut self, tag: impl Into<String>) -> Self {
        self.provides.push(tag.into());
        self
    }

    /// Adds a requirement criterion.
    pub fn with_requirement(mut self, criterion: Criterion) -> Self {
        self.requirements.push(criterion);
        self
    }

    /// Provided tags as a set, for criteria matching.
    pub fn provided_tags(&self) -> HashSet<&str> {
        self.provides.iter().map(|s| s.as_str()).collect()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}

impl std::hash::Hash for Session {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
