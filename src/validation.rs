//! Input validation for allocation snapshots.
//!
//! Checks structural integrity of sessions and parties before any solving
//! begins. A snapshot that fails here is rejected outright — no partial
//! computation occurs. Detects:
//! - Duplicate IDs (sessions, parties, players)
//! - Malformed capacity ranges
//! - Party sizes outside 1..=3
//! - Preferences or GM flags referencing unknown sessions
//! - Ratings above the top tier, or more than one D20 per party

use crate::models::{Party, Rating, Session};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A capacity range violates minimum <= optimum <= maximum.
    InvalidCapacity,
    /// A party has no members, or more than three.
    InvalidPartySize,
    /// A preference or GM flag references a session that doesn't exist.
    UnknownSession,
    /// A numeric tier above 12, or more than one D20 preference.
    InvalidRating,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an allocation snapshot.
///
/// Checks:
/// 1. No duplicate session IDs
/// 2. No duplicate party IDs, and no player appearing in two parties
/// 3. Every capacity range is well-formed
/// 4. Every party has 1..=3 members
/// 5. All preference and GM session references point to existing sessions
/// 6. No numeric tier exceeds 12, and at most one D20 per party
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(sessions: &[Session], parties: &[Party]) -> ValidationResult {
    let mut errors = Vec::new();

    // Collect session IDs
    let mut session_ids = HashSet::new();
    for s in sessions {
        if !session_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate session ID: {}", s.id),
            ));
        }
        if !s.capacity.is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!(
                    "Session '{}' capacity ({}, {}, {}) violates min <= opt <= max",
                    s.id, s.capacity.minimum, s.capacity.optimum, s.capacity.maximum
                ),
            ));
        }
    }

    // Collect party and player IDs
    let mut party_ids = HashSet::new();
    let mut player_ids = HashSet::new();

    for party in parties {
        if !party_ids.insert(party.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate party ID: {}", party.id),
            ));
        }

        if party.members.is_empty() || party.members.len() > 3 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPartySize,
                format!(
                    "Party '{}' has {} members (expected 1..=3)",
                    party.id,
                    party.members.len()
                ),
            ));
        }

        for member in &party.members {
            if !player_ids.insert(member.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!(
                        "Player '{}' appears in more than one party",
                        member.id
                    ),
                ));
            }
        }
    }

    // Check session references and ratings
    for party in parties {
        for gm_session in &party.gm_session_ids {
            if !session_ids.contains(gm_session.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSession,
                    format!(
                        "Party '{}' is flagged GM of unknown session '{}'",
                        party.id, gm_session
                    ),
                ));
            }
        }

        let mut d20_count = 0;
        for (session_id, rating) in &party.preferences {
            if !session_ids.contains(session_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSession,
                    format!(
                        "Party '{}' rates unknown session '{}'",
                        party.id, session_id
                    ),
                ));
            }
            match rating {
                Rating::Tier(t) if *t > 12 => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidRating,
                        format!(
                            "Party '{}' rates session '{}' at tier {} (maximum is 12)",
                            party.id, session_id, t
                        ),
                    ));
                }
                Rating::D20 => d20_count += 1,
                _ => {}
            }
        }
        if d20_count > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRating,
                format!(
                    "Party '{}' holds {} D20 preferences (at most one per slot)",
                    party.id, d20_count
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
