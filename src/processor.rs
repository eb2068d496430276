use log::debug;

use crate::census::PopulationIndex;
use crate::engine::{classify, compose, represent, ProcessError, SkipReason};
use crate::models::{PartyBreakdown, RepresentationStats};
use crate::senate::{RollCallSource, VoteSummary};

/// What processing one menu entry produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// The vote is reportable; post the text and record the stats.
    Publish(ProcessedVote),
    /// Deliberately not reported. The caller must not post anything.
    Skip(SkipReason),
}

/// A composed tweet with the structured stats that back it. The ledger
/// flattens the stats into columns when the tweet is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedVote {
    pub text: String,
    pub representation: RepresentationStats,
    pub party: PartyBreakdown,
}

/// Turns one roll call into tweet text and stats.
///
/// Stateless across votes: apart from the roster fetch, `process` is a pure
/// function of the menu entry, the detail record, and the population index,
/// so reprocessing the same vote always yields the same output.
pub struct VoteProcessor<'a> {
    source: &'a dyn RollCallSource,
    population: &'a PopulationIndex,
}

impl<'a> VoteProcessor<'a> {
    pub fn new(source: &'a dyn RollCallSource, population: &'a PopulationIndex) -> Self {
        Self { source, population }
    }

    pub async fn process(&self, summary: &VoteSummary) -> Result<Disposition, ProcessError> {
        // Classify before fetching: skipped votes cost no detail request.
        let classified = match classify::classify(summary) {
            Ok(classified) => classified,
            Err(reason) => return Ok(Disposition::Skip(reason)),
        };

        let detail = self
            .source
            .vote_detail(&summary.vote_number)
            .await
            .map_err(|e| ProcessError::DataUnavailable(e.to_string()))?;
        if let Some(date) = detail.display_date() {
            debug!("vote {} was held {}", summary.vote_number, date);
        }

        let ballots = detail.ballots();
        let (representation, party) = represent::compute(&ballots, self.population)?;
        let text = compose::compose(&classified, summary, &detail, &representation, &party)?;

        Ok(Disposition::Publish(ProcessedVote {
            text,
            representation,
            party,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::senate::{MemberList, MemberVote, QuestionField, RollCallVote, SourceError};
    use async_trait::async_trait;

    struct FixedSource {
        detail: RollCallVote,
    }

    #[async_trait]
    impl RollCallSource for FixedSource {
        async fn list_votes(&self) -> Result<Vec<VoteSummary>, SourceError> {
            Ok(Vec::new())
        }

        async fn vote_detail(&self, _vote_number: &str) -> Result<RollCallVote, SourceError> {
            Ok(self.detail.clone())
        }
    }

    fn member(state: &str, party: &str, cast: &str) -> MemberVote {
        MemberVote {
            party: party.to_string(),
            state: state.to_string(),
            vote_cast: cast.to_string(),
        }
    }

    fn fixture() -> (VoteSummary, FixedSource, PopulationIndex) {
        let summary = VoteSummary {
            vote_number: "00404".to_string(),
            vote_date: "18-Dec".to_string(),
            issue: "H.R. 3684".to_string(),
            question: QuestionField {
                measure: None,
                text: Some("On Passage of the Bill".to_string()),
            },
            result: "Agreed to".to_string(),
            title: None,
        };
        let detail = RollCallVote {
            congress: "117".to_string(),
            session: "1".to_string(),
            vote_number: "00404".to_string(),
            vote_date: "December 18, 2021, 04:04 PM".to_string(),
            vote_title: Some("Passage".to_string()),
            vote_question_text: None,
            vote_document_text: None,
            vote_result: None,
            members: MemberList {
                entries: vec![
                    member("CA", "D", "Yea"),
                    member("WY", "R", "Nay"),
                    member("WY", "R", "Not Voting"),
                ],
            },
        };
        let index = PopulationIndex::new([
            ("CA".to_string(), 39_000_000u64),
            ("WY".to_string(), 500_000u64),
        ]);
        (summary, FixedSource { detail }, index)
    }

    #[tokio::test]
    async fn processing_is_idempotent() {
        let (summary, source, index) = fixture();
        let processor = VoteProcessor::new(&source, &index);

        let first = processor.process(&summary).await.unwrap();
        let second = processor.process(&summary).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn reportable_vote_publishes_text_and_stats() {
        let (summary, source, index) = fixture();
        let processor = VoteProcessor::new(&source, &index);

        let Disposition::Publish(processed) = processor.process(&summary).await.unwrap() else {
            panic!("expected publish");
        };
        assert!(processed.text.contains("The bill H.R. 3684 was agreed to."));
        assert_eq!(processed.party.yea.total, 1);
        assert_eq!(processed.party.nay.total, 1);
        assert_eq!(processed.party.abstain.total, 1);
        let denominator = (39_500_000u64 * 2) as f64;
        assert!((processed.representation.yea - 39_000_000.0 / denominator).abs() < 1e-12);
    }

    #[tokio::test]
    async fn empty_issue_skips_without_fetching() {
        let (mut summary, source, index) = fixture();
        summary.issue.clear();
        let processor = VoteProcessor::new(&source, &index);

        let disposition = processor.process(&summary).await.unwrap();
        assert_eq!(disposition, Disposition::Skip(SkipReason::NoIssue));
    }

    #[tokio::test]
    async fn unknown_state_fails_with_data_unavailable() {
        let (summary, mut source, index) = fixture();
        source.detail.members = MemberList {
            entries: vec![member("ZZ", "D", "Yea")],
        };
        let processor = VoteProcessor::new(&source, &index);

        let err = processor.process(&summary).await.unwrap_err();
        assert!(matches!(err, ProcessError::DataUnavailable(_)));
    }
}
