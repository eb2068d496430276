use crate::models::QuestionType;
use crate::senate::VoteSummary;

use super::{Classified, SkipReason};

/// Marker the Senate uses for votes that have no subject.
const NO_ISSUE_SENTINEL: &str = "n/a";

/// Decide whether a menu entry is worth tweeting and, if so, which question
/// type it is.
///
/// Votes without an issue are not voting on anything (the few that show up
/// are procedural), so they are skipped rather than described.
pub fn classify(summary: &VoteSummary) -> Result<Classified, SkipReason> {
    if summary.issue.is_empty() || summary.issue == NO_ISSUE_SENTINEL {
        return Err(SkipReason::NoIssue);
    }

    let raw = summary.question_text().ok_or(SkipReason::NoQuestion)?;
    let question = normalize_question(raw);

    let question_type = QuestionType::ALL
        .into_iter()
        .find(|question_type| question.contains(question_type.keyword()))
        .ok_or(SkipReason::UnmatchedQuestion)?;

    Ok(Classified {
        question_type,
        question,
    })
}

/// Normalize menu question text for matching and rendering: lowercase, drop
/// the three-character "On " lead-in, cut any parenthetical qualifier, and
/// make sure the result starts with "the".
fn normalize_question(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut question = lowered.get(3..).unwrap_or("").to_string();

    if let Some(paren) = question.find('(') {
        if paren > 0 {
            question.truncate(paren);
            question.truncate(question.trim_end().len());
        }
    }

    if !question.starts_with("the") {
        question = format!("the {question}");
    }
    question
}
