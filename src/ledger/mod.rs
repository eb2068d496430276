//! The tweet ledger: the durable record of every vote already posted.
//!
//! Stored as CSV with one row per tweet. The row carries the flattened
//! representation and party-breakdown stats alongside the identifying key
//! (congress, session, date, vote), so the ledger doubles as a small data
//! set of everything the bot has ever reported.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BucketCount, PartyBreakdown, RepresentationStats};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("ledger CSV malformed: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger not found at {path} (set LEDGER_BOOTSTRAP=1 to start a new one)")]
    NotFound { path: String },
}

/// One posted tweet. Column order matches the struct field order; the
/// flattened stat columns join their nesting levels with underscores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetRecord {
    pub tweet_id: String,
    pub congress: String,
    pub session: String,
    pub date: String,
    pub vote: String,
    pub yea_vote_total: u32,
    #[serde(rename = "yea_vote_D")]
    pub yea_vote_d: u32,
    #[serde(rename = "yea_vote_R")]
    pub yea_vote_r: u32,
    pub nay_vote_total: u32,
    #[serde(rename = "nay_vote_D")]
    pub nay_vote_d: u32,
    #[serde(rename = "nay_vote_R")]
    pub nay_vote_r: u32,
    pub abstain_vote_total: u32,
    #[serde(rename = "abstain_vote_D")]
    pub abstain_vote_d: u32,
    #[serde(rename = "abstain_vote_R")]
    pub abstain_vote_r: u32,
    #[serde(rename = "Nay")]
    pub nay_rep: f64,
    #[serde(rename = "Yea")]
    pub yea_rep: f64,
    #[serde(rename = "Abstain")]
    pub abstain_rep: f64,
}

impl TweetRecord {
    /// Flatten the structured stats into one ledger row.
    pub fn new(
        tweet_id: String,
        congress: &str,
        session: &str,
        date: &str,
        vote: &str,
        party: &PartyBreakdown,
        representation: &RepresentationStats,
    ) -> Self {
        Self {
            tweet_id,
            congress: congress.to_string(),
            session: session.to_string(),
            date: date.to_string(),
            vote: vote.to_string(),
            yea_vote_total: party.yea.total,
            yea_vote_d: party.yea.democrats,
            yea_vote_r: party.yea.republicans,
            nay_vote_total: party.nay.total,
            nay_vote_d: party.nay.democrats,
            nay_vote_r: party.nay.republicans,
            abstain_vote_total: party.abstain.total,
            abstain_vote_d: party.abstain.democrats,
            abstain_vote_r: party.abstain.republicans,
            nay_rep: representation.nay,
            yea_rep: representation.yea,
            abstain_rep: representation.abstain,
        }
    }

    /// Re-nest the flattened party columns.
    pub fn party_breakdown(&self) -> PartyBreakdown {
        PartyBreakdown {
            yea: BucketCount {
                total: self.yea_vote_total,
                democrats: self.yea_vote_d,
                republicans: self.yea_vote_r,
            },
            nay: BucketCount {
                total: self.nay_vote_total,
                democrats: self.nay_vote_d,
                republicans: self.nay_vote_r,
            },
            abstain: BucketCount {
                total: self.abstain_vote_total,
                democrats: self.abstain_vote_d,
                republicans: self.abstain_vote_r,
            },
        }
    }

    /// Re-nest the flattened representation columns.
    pub fn representation(&self) -> RepresentationStats {
        RepresentationStats {
            yea: self.yea_rep,
            nay: self.nay_rep,
            abstain: self.abstain_rep,
        }
    }
}

/// In-memory view of the ledger, loaded at run start and saved at run end.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<TweetRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TweetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a vote is already recorded, by its full uniqueness key.
    pub fn contains(&self, congress: &str, session: &str, date: &str, vote: &str) -> bool {
        self.records.iter().any(|record| {
            record.congress == congress
                && record.session == session
                && record.date == date
                && record.vote == vote
        })
    }

    pub fn append(&mut self, record: TweetRecord) {
        self.records.push(record);
    }

    /// Sort by (congress, session, vote) so saved files diff cleanly.
    /// Vote numbers are zero-padded, so the string order is the vote order.
    pub fn sort(&mut self) {
        self.records.sort_by(|a, b| {
            (&a.congress, &a.session, &a.vote).cmp(&(&b.congress, &b.session, &b.vote))
        });
    }

    pub fn to_csv(&self) -> Result<String, LedgerError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &self.records {
            writer.serialize(record)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| LedgerError::Io(io::Error::other(e)))
    }

    pub fn from_csv(data: &str) -> Result<Self, LedgerError> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(Self { records })
    }
}

/// Where the ledger lives between runs.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Ledger, LedgerError>;
    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;
}

/// File-backed ledger store.
pub struct FileLedgerStore {
    path: PathBuf,
    /// Start with an empty ledger when the file does not exist yet. Off by
    /// default: a silently missing ledger would repost the whole session.
    bootstrap: bool,
}

impl FileLedgerStore {
    pub fn new(path: impl AsRef<Path>, bootstrap: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            bootstrap,
        }
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> Result<Ledger, LedgerError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ledger::from_csv(&data),
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.bootstrap => {
                warn!(
                    "ledger {} does not exist, starting empty",
                    self.path.display()
                );
                Ok(Ledger::new())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LedgerError::NotFound {
                path: self.path.display().to_string(),
            }),
            Err(e) => Err(LedgerError::Io(e)),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let csv = ledger.to_csv()?;
        tokio::fs::write(&self.path, csv).await?;
        Ok(())
    }
}
