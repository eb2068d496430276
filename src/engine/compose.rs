use crate::models::{PartyBreakdown, QuestionType, RepresentationStats};
use crate::senate::{vote_page_url, RollCallVote, VoteSummary};

use super::{Classified, ProcessError};

/// Render the full tweet: the vote sentence, the three-bucket stats block,
/// and the source link.
pub fn compose(
    classified: &Classified,
    summary: &VoteSummary,
    detail: &RollCallVote,
    stats: &RepresentationStats,
    party: &PartyBreakdown,
) -> Result<String, ProcessError> {
    let mut text = vote_sentence(classified, summary, detail)?;
    text.push_str(".\n\n");
    text.push_str(&stats_block(stats, party));
    text.push_str(&format!(
        "src: {}",
        vote_page_url(&detail.congress, &detail.session, &summary.vote_number)
    ));
    Ok(text)
}

/// The leading sentence describing what was voted on and how it went,
/// one template per question type.
fn vote_sentence(
    classified: &Classified,
    summary: &VoteSummary,
    detail: &RollCallVote,
) -> Result<String, ProcessError> {
    let issue = &summary.issue;
    let result = summary.result.to_lowercase();

    let sentence = match classified.question_type {
        QuestionType::Motion => motion_sentence(classified, summary, detail, &result)?,
        QuestionType::Bill => format!("The bill {issue} was {result}"),
        QuestionType::Amendment => {
            let measure = summary.measure().ok_or_else(|| {
                ProcessError::Composition(format!(
                    "amendment vote {} has no measure",
                    summary.vote_number
                ))
            })?;
            format!("The amendment {measure} for {issue} was {result}")
        }
        QuestionType::Resolution => {
            format!(
                "{} for {issue} was {result}",
                capitalize(&classified.question)
            )
        }
        QuestionType::Nomination => {
            let nominee = nominee_name(detail)?;
            format!("The nomination for {nominee} was {result}")
        }
        QuestionType::Veto => {
            // result reads "veto sustained" / "veto overridden"; drop the
            // five-character "veto " boilerplate
            let outcome = result.get(5..).ok_or_else(|| {
                ProcessError::Composition(format!("unexpected veto result {result:?}"))
            })?;
            format!("The veto on {issue} was {outcome}")
        }
    };
    Ok(sentence)
}

/// Motions carry the most context of any question type: they can concern
/// nominations, amendments, or waivers, and very short question texts need a
/// dependent clause naming the subject.
fn motion_sentence(
    classified: &Classified,
    summary: &VoteSummary,
    detail: &RollCallVote,
    result: &str,
) -> Result<String, ProcessError> {
    let issue = &summary.issue;
    let question = capitalize(&classified.question);

    if classified.question.split_whitespace().count() > 3 {
        let sentence = if issue.contains("PN") {
            let nominee = nominee_name(detail)?;
            format!("{question} the {nominee} nomination was {result}")
        } else if title_contains(detail, "amdt")? {
            format!("{question} (an amendment to {issue}) was {result}")
        } else {
            format!("{question} ({issue}) was {result}")
        };
        return Ok(sentence);
    }

    let mut sentence = question;
    if issue.contains("PN") {
        let nominee = nominee_name(detail)?;
        sentence.push_str(&format!(" on nominating {nominee} "));
    } else if title_contains(detail, "waive")? {
        sentence.push_str(" to waive ");
        if title_contains(detail, "amdt")? {
            sentence.push_str(&format!("re: an Amdt. to {issue} "));
        }
    } else {
        sentence.push_str(&format!(" for {issue} "));
    }
    sentence.push_str(&format!("was {result}"));
    Ok(sentence)
}

fn title_contains(detail: &RollCallVote, needle: &str) -> Result<bool, ProcessError> {
    let title = detail.vote_title.as_deref().ok_or_else(|| {
        ProcessError::Composition(format!("vote {} has no title", detail.vote_number))
    })?;
    Ok(title.to_lowercase().contains(needle))
}

/// Extract "F. Last" from the vote document title, which opens with the
/// nominee's full name followed by a comma ("Jane Q. Public, of Maryland,
/// to be ...").
fn nominee_name(detail: &RollCallVote) -> Result<String, ProcessError> {
    let document = detail.vote_document_text.as_deref().ok_or_else(|| {
        ProcessError::Composition(format!("vote {} has no document text", detail.vote_number))
    })?;

    let full_name = document.split(',').next().unwrap_or("");
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return Err(ProcessError::Composition(format!(
            "cannot extract nominee from {document:?}"
        )));
    };
    let initial = first.chars().next().unwrap_or_default();
    Ok(format!("{initial}. {last}"))
}

/// One line per outcome bucket: population share, raw count, party split.
fn stats_block(stats: &RepresentationStats, party: &PartyBreakdown) -> String {
    let mut block = String::new();
    for (marker, fraction, bucket) in [
        ("✅ Yeas", stats.yea, party.yea),
        ("❎ Nays", stats.nay, party.nay),
        ("😶 No vote", stats.abstain, party.abstain),
    ] {
        let percent = format!("{:.1}%", fraction * 100.0);
        let votes = if bucket.total == 1 { "vote" } else { "votes" };
        let split = format!(
            "{} {votes} ({}-D, {}-R, {}-I)",
            bucket.total,
            bucket.democrats,
            bucket.republicans,
            bucket.others()
        );
        let line = if marker == "✅ Yeas" {
            format!("{marker}: {percent} of the country represented by {split}")
        } else {
            format!("{marker}: {percent} ... {split}")
        };
        block.push_str(&line);
        block.push_str("\n\n");
    }
    block
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
