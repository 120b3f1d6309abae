//! Party and player models.
//!
//! A party is a group of 1–3 players who move through the schedule
//! together: one preference set per time slot, one assignment per slot.
//! A party that runs a session (its leader or a member is the GM) is
//! implicitly "in" that session and pinned there by the solver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Rating;

/// An attendee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl Player {
    /// Creates a new player.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    /// Sets the player name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A group of players sharing one schedule preference per time slot.
///
/// Member count is fixed once checked in for the slot. Preferences are an
/// ordered map so candidate enumeration stays deterministic; inserting for
/// an existing session replaces the previous rating (latest write wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// Unique party identifier.
    pub id: String,
    /// Player identity of the party leader.
    pub leader_id: String,
    /// Party members, leader included. 1..=3 players.
    pub members: Vec<Player>,
    /// Sessions this party runs as GM. The party is pinned to each of
    /// these with zero solver freedom.
    pub gm_session_ids: Vec<String>,
    /// Per-session preference ratings for the slot being solved.
    pub preferences: BTreeMap<String, Rating>,
}

impl Party {
    /// Creates a new party with the given leader as its only member.
    pub fn new(id: impl Into<String>, leader_id: impl Into<String>) -> Self {
        let leader_id = leader_id.into();
        Self {
            id: id.into(),
            leader_id: leader_id.clone(),
            members: vec![Player::new(leader_id)],
            gm_session_ids: Vec::new(),
            preferences: BTreeMap::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, player: Player) -> Self {
        self.members.push(player);
        self
    }

    /// Marks this party as GM of a session.
    pub fn with_gm_of(mut self, session_id: impl Into<String>) -> Self {
        self.gm_session_ids.push(session_id.into());
        self
    }

    /// Sets the rating for a session, replacing any previous one.
    pub fn with_preference(mut self, session_id: impl Into<String>, rating: Rating) -> Self {
        self.preferences.insert(session_id.into(), rating);
        self
    }

    /// Number of players in the party.
    #[inline]
    pub fn size(&self) -> u32 {
        self.members.len() as u32
    }

    /// Whether this party GMs the given session.
    pub fn is_gm_of(&self, session_id: &str) -> bool {
        self.gm_session_ids.iter().any(|s| s == session_id)
    }

    /// Whether this party GMs any session in the slot.
    pub fn is_gm(&self) -> bool {
        !self.gm_session_ids.is_empty()
    }

    /// The rating for a session ([`Rating::ZERO`] when none was recorded).
    pub fn rating_for(&self, session_id: &str) -> Rating {
        self.preferences
            .get(session_id)
            .copied()
            .unwrap_or(Rating::ZERO)
    }

    /// Member player IDs.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|p| p.id.as_str())
    }
}

impl PartialEq for Party {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Party {}

impl std::hash::Hash for Party {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_builder() {
        let party = Party::new("P1", "alice")
            .with_member(Player::new("bob").with_name("Bob"))
            .with_member(Player::new("carol"))
            .with_gm_of("S1")
            .with_preference("S2", Rating::Tier(10));

        assert_eq!(party.size(), 3);
        assert_eq!(party.leader_id, "alice");
        assert!(party.is_gm_of("S1"));
        assert!(!party.is_gm_of("S2"));
        assert!(party.is_gm());
        assert_eq!(party.rating_for("S2"), Rating::Tier(10));
    }

    #[test]
    fn test_party_missing_rating_is_zero() {
        let party = Party::new("P1", "alice");
        assert_eq!(party.rating_for("S99"), Rating::ZERO);
    }

    #[test]
    fn test_party_latest_preference_wins() {
        let party = Party::new("P1", "alice")
            .with_preference("S1", Rating::Tier(4))
            .with_preference("S1", Rating::D20);

        assert_eq!(party.rating_for("S1"), Rating::D20);
        assert_eq!(party.preferences.len(), 1);
    }

    #[test]
    fn test_party_member_ids() {
        let party = Party::new("P1", "alice").with_member(Player::new("bob"));
        let ids: Vec<&str> = party.member_ids().collect();
        assert_eq!(ids, vec!["alice", "bob"]);
    }
}
