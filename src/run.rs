use chrono::Utc;
use log::{error, info};
use thiserror::Error;

use crate::census::{CensusError, PopulationSource};
use crate::config::Config;
use crate::ledger::{LedgerError, LedgerStore, TweetRecord};
use crate::poster::StatusPoster;
use crate::processor::{Disposition, VoteProcessor};
use crate::senate::{RollCallSource, SourceError};

/// Failures that end the run before or after the per-vote loop. Per-vote
/// failures never surface here; they are logged and the loop moves on.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("population data unavailable: {0}")]
    Population(#[from] CensusError),

    #[error("vote menu unavailable: {0}")]
    Menu(SourceError),

    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub posted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// One full run: fetch the population index and the vote menu, tweet every
/// reportable vote not already in the ledger, and persist the grown ledger.
pub async fn run(
    config: &Config,
    source: &dyn RollCallSource,
    population: &dyn PopulationSource,
    poster: &dyn StatusPoster,
    store: &dyn LedgerStore,
) -> Result<RunReport, RunError> {
    info!("checking for new votes at {}", Utc::now().to_rfc3339());

    let index = population.fetch().await?;
    let mut ledger = store.load().await?;
    let summaries = source.list_votes().await.map_err(RunError::Menu)?;
    info!(
        "loaded {} ledger entries, menu lists {} votes",
        ledger.len(),
        summaries.len()
    );

    let processor = VoteProcessor::new(source, &index);
    let mut report = RunReport::default();
    let mut new_records: Vec<TweetRecord> = Vec::new();

    for summary in &summaries {
        if ledger.contains(
            &config.congress,
            &config.session,
            &summary.vote_date,
            &summary.vote_number,
        ) {
            continue;
        }

        match processor.process(summary).await {
            Ok(Disposition::Skip(reason)) => {
                report.skipped += 1;
                info!("vote {} not reportable: {:?}", summary.vote_number, reason);
            }
            Err(e) => {
                report.failed += 1;
                error!("vote {} failed: {}", summary.vote_number, e);
            }
            Ok(Disposition::Publish(processed)) => match poster.post_status(&processed.text).await
            {
                Err(e) => {
                    // Left out of the ledger on purpose: the next run
                    // retries this vote.
                    report.failed += 1;
                    error!("posting vote {} failed: {}", summary.vote_number, e);
                }
                Ok(post_id) => {
                    info!("posted vote {} as {}", summary.vote_number, post_id);
                    new_records.push(TweetRecord::new(
                        post_id,
                        &config.congress,
                        &config.session,
                        &summary.vote_date,
                        &summary.vote_number,
                        &processed.party,
                        &processed.representation,
                    ));
                    report.posted += 1;
                    if report.posted >= config.max_posts_per_run {
                        info!("reached per-run cap of {} posts", config.max_posts_per_run);
                        break;
                    }
                }
            },
        }
    }

    if new_records.is_empty() {
        info!("nothing new to post");
        return Ok(report);
    }

    for record in new_records {
        ledger.append(record);
    }
    ledger.sort();
    if let Err(e) = store.save(&ledger).await {
        // The tweets are out but unrecorded; the next run will repost them
        // unless the ledger is fixed first.
        error!("ledger save failed, duplicates likely on next run: {}", e);
        return Err(RunError::Ledger(e));
    }
    info!("tweeted {} new votes", report.posted);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::PopulationIndex;
    use crate::ledger::Ledger;
    use crate::poster::PostError;
    use crate::senate::{MemberList, MemberVote, QuestionField, RollCallVote, VoteSummary};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MenuSource {
        menu: Vec<VoteSummary>,
        detail: RollCallVote,
    }

    #[async_trait]
    impl RollCallSource for MenuSource {
        async fn list_votes(&self) -> Result<Vec<VoteSummary>, SourceError> {
            Ok(self.menu.clone())
        }

        async fn vote_detail(&self, vote_number: &str) -> Result<RollCallVote, SourceError> {
            let mut detail = self.detail.clone();
            detail.vote_number = vote_number.to_string();
            Ok(detail)
        }
    }

    struct StaticPopulation(PopulationIndex);

    #[async_trait]
    impl PopulationSource for StaticPopulation {
        async fn fetch(&self) -> Result<PopulationIndex, CensusError> {
            Ok(self.0.clone())
        }
    }

    struct RecordingPoster {
        posts: Mutex<Vec<String>>,
        fail: bool,
        counter: AtomicUsize,
    }

    impl RecordingPoster {
        fn new(fail: bool) -> Self {
            Self {
                posts: Mutex::new(Vec::new()),
                fail,
                counter: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatusPoster for RecordingPoster {
        async fn post_status(&self, text: &str) -> Result<String, PostError> {
            if self.fail {
                return Err(PostError::Rejected {
                    status: 403,
                    message: "nope".to_string(),
                });
            }
            self.posts.lock().unwrap().push(text.to_string());
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(format!("post-{n}"))
        }
    }

    struct MemoryStore {
        initial: Ledger,
        saved: Mutex<Option<Ledger>>,
    }

    impl MemoryStore {
        fn new(initial: Ledger) -> Self {
            Self {
                initial,
                saved: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LedgerStore for MemoryStore {
        async fn load(&self) -> Result<Ledger, LedgerError> {
            Ok(self.initial.clone())
        }

        async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
            *self.saved.lock().unwrap() = Some(ledger.clone());
            Ok(())
        }
    }

    fn summary(vote_number: &str, issue: &str) -> VoteSummary {
        VoteSummary {
            vote_number: vote_number.to_string(),
            vote_date: "18-Dec".to_string(),
            issue: issue.to_string(),
            question: QuestionField {
                measure: None,
                text: Some("On Passage of the Bill".to_string()),
            },
            result: "Agreed to".to_string(),
            title: None,
        }
    }

    fn detail() -> RollCallVote {
        RollCallVote {
            congress: "117".to_string(),
            session: "1".to_string(),
            vote_number: "00001".to_string(),
            vote_date: "December 18, 2021, 04:04 PM".to_string(),
            vote_title: Some("Passage".to_string()),
            vote_question_text: None,
            vote_document_text: None,
            vote_result: None,
            members: MemberList {
                entries: vec![MemberVote {
                    party: "D".to_string(),
                    state: "CA".to_string(),
                    vote_cast: "Yea".to_string(),
                }],
            },
        }
    }

    fn config() -> Config {
        Config {
            congress: "117".to_string(),
            session: "1".to_string(),
            census_api_key: "k".to_string(),
            census_year: "2021".to_string(),
            census_base_url: "http://census.test".to_string(),
            senate_base_url: "http://senate.test".to_string(),
            post_base_url: "http://post.test".to_string(),
            post_token: "t".to_string(),
            ledger_path: PathBuf::from("tweets.csv"),
            bootstrap_ledger: true,
            max_posts_per_run: 4,
        }
    }

    fn population() -> StaticPopulation {
        StaticPopulation(PopulationIndex::new([("CA".to_string(), 39_000_000u64)]))
    }

    #[tokio::test]
    async fn posts_new_votes_and_saves_sorted_ledger() {
        let source = MenuSource {
            menu: vec![summary("00002", "H.R. 2"), summary("00001", "H.R. 1")],
            detail: detail(),
        };
        let poster = RecordingPoster::new(false);
        let store = MemoryStore::new(Ledger::new());

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.posted, 2);
        let saved = store.saved.lock().unwrap().clone().unwrap();
        assert_eq!(saved.len(), 2);
        // sorted by vote number even though the menu listed newest first
        assert_eq!(saved.records()[0].vote, "00001");
        assert_eq!(saved.records()[1].vote, "00002");
        assert_eq!(saved.records()[0].tweet_id, "post-1");
    }

    #[tokio::test]
    async fn already_posted_votes_are_not_reposted() {
        let source = MenuSource {
            menu: vec![summary("00001", "H.R. 1")],
            detail: detail(),
        };
        let poster = RecordingPoster::new(false);

        let mut existing = Ledger::new();
        existing.append(TweetRecord::new(
            "old".to_string(),
            "117",
            "1",
            "18-Dec",
            "00001",
            &Default::default(),
            &Default::default(),
        ));
        let store = MemoryStore::new(existing);

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.posted, 0);
        assert!(poster.posts.lock().unwrap().is_empty());
        assert!(store.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn cap_limits_posts_per_run() {
        let menu = (1..=7).map(|n| summary(&format!("{n:05}"), "H.R. 1")).collect();
        let source = MenuSource {
            menu,
            detail: detail(),
        };
        let poster = RecordingPoster::new(false);
        let store = MemoryStore::new(Ledger::new());

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.posted, 4);
        assert_eq!(poster.posts.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn skipped_votes_leave_no_trace() {
        let source = MenuSource {
            menu: vec![summary("00001", "")],
            detail: detail(),
        };
        let poster = RecordingPoster::new(false);
        let store = MemoryStore::new(Ledger::new());

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.posted, 0);
        assert!(poster.posts.lock().unwrap().is_empty());
        assert!(store.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_post_is_left_for_the_next_run() {
        let source = MenuSource {
            menu: vec![summary("00001", "H.R. 1")],
            detail: detail(),
        };
        let poster = RecordingPoster::new(true);
        let store = MemoryStore::new(Ledger::new());

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.posted, 0);
        assert_eq!(report.failed, 1);
        assert!(store.saved.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_state_fails_that_vote_only() {
        let mut bad_detail = detail();
        bad_detail.members.entries[0].state = "ZZ".to_string();
        let source = MenuSource {
            menu: vec![summary("00001", "H.R. 1")],
            detail: bad_detail,
        };
        let poster = RecordingPoster::new(false);
        let store = MemoryStore::new(Ledger::new());

        let report = run(&config(), &source, &population(), &poster, &store)
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert!(store.saved.lock().unwrap().is_none());
    }
}
