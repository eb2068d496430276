//! senate.gov roll-call source.
//!
//! The Senate publishes two XML documents per (congress, session): a vote
//! menu listing every roll call, and one detail document per vote carrying
//! the full member roster. [`RollCallSource`] abstracts both fetches so the
//! processor can be driven by a mock in tests; [`HttpSenateClient`] is the
//! real implementation.

mod client;
mod types;

pub use client::{vote_page_url, HttpSenateClient, RollCallSource, SourceError};
pub use types::{MemberList, MemberVote, QuestionField, RollCallVote, VoteMenu, VoteSummary};
