//! Capability-tag criteria matching.
//!
//! Decides whether a set of provided capability tags (room features,
//! equipment, GM-identity tags) satisfies a requirement expression, and —
//! symmetrically — enumerates which criteria are unmet, for UI feedback.
//! The allocator's schedule validator and the editing UI share these
//! semantics, so the evaluation order must be stable.
//!
//! # Grammar
//!
//! A criterion is one of:
//! - an atomic tag: `"room-large"` — satisfied iff the tag is provided
//! - a negation: `"!gm-42"` — satisfied iff the tag is absent
//! - an alternation: `"table-size-small|table-size-large"` — satisfied iff
//!   at least one member tag is provided
//!
//! A full requirement is a conjunction: every criterion must be satisfied.
//! An empty requirement always matches (the unscheduled pool imposes no
//! constraints).
//!
//! Criteria are parsed once at data-load time into a closed expression
//! type; matching never re-parses strings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::models::Session;

/// A single placement criterion over capability tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// Satisfied iff the tag is present in the provided set.
    Atom(String),
    /// Satisfied iff the tag is absent from the provided set.
    Negation(String),
    /// Satisfied iff at least one member tag is present. Members are
    /// literal tag text and are never split further.
    Alternation(Vec<String>),
}

impl Criterion {
    /// Parses the string form of a criterion.
    ///
    /// `"tag"` → [`Criterion::Atom`], `"!tag"` → [`Criterion::Negation`],
    /// `"a|b|c"` → [`Criterion::Alternation`]. Negation is only recognized
    /// on a whole criterion: a `!` inside an alternation member is part of
    /// the literal tag text.
    pub fn parse(text: &str) -> Self {
        if text.contains('|') {
            return Criterion::Alternation(text.split('|').map(str::to_string).collect());
        }
        match text.strip_prefix('!') {
            Some(tag) => Criterion::Negation(tag.to_string()),
            None => Criterion::Atom(text.to_string()),
        }
    }

    /// Creates an atomic criterion.
    pub fn atom(tag: impl Into<String>) -> Self {
        Criterion::Atom(tag.into())
    }

    /// Creates a negated criterion.
    pub fn negation(tag: impl Into<String>) -> Self {
        Criterion::Negation(tag.into())
    }

    /// Creates an alternation over the given tags.
    pub fn alternation(tags: Vec<String>) -> Self {
        Criterion::Alternation(tags)
    }

    /// Whether the provided tag set satisfies this criterion.
    pub fn is_satisfied_by(&self, provided: &HashSet<&str>) -> bool {
        match self {
            Criterion::Atom(tag) => provided.contains(tag.as_str()),
            Criterion::Negation(tag) => !provided.contains(tag.as_str()),
            Criterion::Alternation(tags) => tags.iter().any(|t| provided.contains(t.as_str())),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Atom(tag) => write!(f, "{tag}"),
            Criterion::Negation(tag) => write!(f, "!{tag}"),
            Criterion::Alternation(tags) => write!(f, "{}", tags.join("|")),
        }
    }
}

/// Whether every criterion is satisfied by the provided tags.
///
/// Evaluates left-to-right over the required slice and short-circuits on
/// the first failure. The matcher is pure and stateless: callers may
/// mutate the provided set between invocations (e.g., to mark a GM busy
/// elsewhere in the time column) and results are never cached.
pub fn matches(provided: &HashSet<&str>, required: &[Criterion]) -> bool {
    required.iter().all(|c| c.is_satisfied_by(provided))
}

/// The criteria that fail against the provided tags, in requirement order.
///
/// Evaluates every criterion (no short-circuit) so diagnostics are
/// complete; the original order is preserved since it drives which
/// violation is reported first in the UI and in error messages.
pub fn unmatched<'a>(provided: &HashSet<&str>, required: &'a [Criterion]) -> Vec<&'a Criterion> {
    required
        .iter()
        .filter(|c| !c.is_satisfied_by(provided))
        .collect()
}

/// Whether a session's game may legally occupy a table providing the
/// given tags.
pub fn can_occupy(session: &Session, provided: &HashSet<&str>) -> bool {
    matches(provided, &session.requirements)
}

/// The session requirements the given table fails to provide.
pub fn blocking<'a>(session: &'a Session, provided: &HashSet<&str>) -> Vec<&'a Criterion> {
    unmatched(provided, &session.requirements)
}
