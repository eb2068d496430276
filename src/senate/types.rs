use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::models::{Ballot, Party, VoteCast};

/// Root of `vote_menu_{congress}_{session}.xml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteMenu {
    #[serde(default)]
    pub congress: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    pub votes: VoteList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteList {
    #[serde(rename = "vote", default)]
    pub entries: Vec<VoteSummary>,
}

/// One entry of the vote menu: the roll call as the Senate summarizes it,
/// without the member roster.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteSummary {
    /// Zero-padded vote number, e.g. "00404". Kept as a string: it is used
    /// verbatim in URLs and as part of the ledger key.
    pub vote_number: String,
    pub vote_date: String,
    /// Subject of the vote (a measure or nomination number). Empty or "n/a"
    /// for purely procedural roll calls.
    #[serde(default)]
    pub issue: String,
    pub question: QuestionField,
    pub result: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// The menu `question` element. For amendment votes the Senate nests a
/// `measure` element inside the question alongside the bare text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionField {
    #[serde(default)]
    pub measure: Option<String>,
    #[serde(rename = "$text", default)]
    pub text: Option<String>,
}

impl VoteSummary {
    /// The raw question text, when the menu carries one.
    pub fn question_text(&self) -> Option<&str> {
        self.question.text.as_deref()
    }

    /// The measure identifier nested in the question element, if any.
    pub fn measure(&self) -> Option<&str> {
        self.question.measure.as_deref()
    }
}

/// Root of `vote_{congress}_{session}_{vote_number}.xml`: the full roll call
/// including every member's cast.
#[derive(Debug, Clone, Deserialize)]
pub struct RollCallVote {
    pub congress: String,
    pub session: String,
    pub vote_number: String,
    pub vote_date: String,
    #[serde(default)]
    pub vote_title: Option<String>,
    #[serde(default)]
    pub vote_question_text: Option<String>,
    /// Document title, e.g. "John Doe, of Ohio, to be a Judge ...". Source
    /// of the nominee name for nomination votes.
    #[serde(default)]
    pub vote_document_text: Option<String>,
    #[serde(default)]
    pub vote_result: Option<String>,
    pub members: MemberList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberList {
    #[serde(rename = "member", default)]
    pub entries: Vec<MemberVote>,
}

/// One member's row in the roster. The feed carries more fields (names,
/// member ids) but the bot only reads these three.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberVote {
    pub party: String,
    pub state: String,
    pub vote_cast: String,
}

impl RollCallVote {
    /// Convert the wire roster into normalized ballots.
    pub fn ballots(&self) -> Vec<Ballot> {
        self.members
            .entries
            .iter()
            .map(|member| Ballot {
                state: member.state.clone(),
                party: Party::from_code(&member.party),
                cast: VoteCast::normalize(&member.vote_cast),
            })
            .collect()
    }

    /// Human-readable vote date ("December 18, 2021"). The detail feed
    /// writes timestamps like "December 18, 2021, 04:04 PM" but older
    /// documents drop the time of day, so both shapes are accepted.
    pub fn display_date(&self) -> Option<String> {
        let raw = self.vote_date.trim();
        let date = NaiveDateTime::parse_from_str(raw, "%B %d, %Y, %I:%M %p")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%B %d, %Y"))
            .ok()?;
        Some(date.format("%B %d, %Y").to_string())
    }
}
