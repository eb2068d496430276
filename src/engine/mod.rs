//! The vote-to-text engine: classification, representation math, and text
//! composition. Everything here is pure and synchronous; all fetching lives
//! in the client modules.

pub mod classify;
pub mod compose;
pub mod represent;

use thiserror::Error;

use crate::models::QuestionType;

/// Why a structurally valid roll call is deliberately left untweeted.
/// This is normal control flow, never logged as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or "n/a" issue: a procedural vote with no subject.
    NoIssue,
    /// The menu entry carries no question text.
    NoQuestion,
    /// The question matches none of the known keywords.
    UnmatchedQuestion,
}

/// A reportable vote: its question type plus the normalized question text
/// the composer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub question_type: QuestionType,
    /// Lowercased, ordinal prefix stripped, parenthetical dropped,
    /// guaranteed to start with "the".
    pub question: String,
}

/// Per-vote processing failures. Either aborts the affected vote only; the
/// run carries on with the rest of the menu.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Population or roster lookup failed.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// The upstream record is missing a field the text needs.
    #[error("malformed vote record: {0}")]
    Composition(String),
}
