use async_trait::async_trait;
use thiserror::Error;

use super::types::{RollCallVote, VoteMenu, VoteSummary};

/// Errors from the roll-call source. Any of these abort the affected fetch
/// only; the caller decides whether the run can continue.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("senate.gov returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed roll-call XML: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Source of roll-call data for one (congress, session).
///
/// `HttpSenateClient` is the real implementation; tests drive the processor
/// with in-memory fakes instead.
#[async_trait]
pub trait RollCallSource: Send + Sync {
    /// Fetch the vote menu: every roll call of the session, newest first.
    async fn list_votes(&self) -> Result<Vec<VoteSummary>, SourceError>;

    /// Fetch the full roll call, including the member roster.
    async fn vote_detail(&self, vote_number: &str) -> Result<RollCallVote, SourceError>;
}

/// Fetches roll-call XML from senate.gov.
pub struct HttpSenateClient {
    client: reqwest::Client,
    base_url: String,
    congress: String,
    session: String,
}

impl HttpSenateClient {
    pub fn new(
        base_url: impl Into<String>,
        congress: impl Into<String>,
        session: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            congress: congress.into(),
            session: session.into(),
        }
    }

    async fn fetch_xml(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RollCallSource for HttpSenateClient {
    async fn list_votes(&self) -> Result<Vec<VoteSummary>, SourceError> {
        let url = format!(
            "{}/legislative/LIS/roll_call_lists/vote_menu_{}_{}.xml",
            self.base_url, self.congress, self.session
        );
        let xml = self.fetch_xml(&url).await?;
        let menu: VoteMenu = quick_xml::de::from_str(&xml)?;
        Ok(menu.votes.entries)
    }

    async fn vote_detail(&self, vote_number: &str) -> Result<RollCallVote, SourceError> {
        let url = format!(
            "{}/legislative/LIS/roll_call_votes/vote{congress}{session}/vote_{congress}_{session}_{vote}.xml",
            self.base_url,
            congress = self.congress,
            session = self.session,
            vote = vote_number,
        );
        let xml = self.fetch_xml(&url).await?;
        Ok(quick_xml::de::from_str(&xml)?)
    }
}

/// Link to the human-readable roll call page, appended to every tweet.
/// Always points at the public site, whatever base URL the client fetches
/// its XML from.
pub fn vote_page_url(congress: &str, session: &str, vote_number: &str) -> String {
    format!(
        "https://www.senate.gov/legislative/LIS/roll_call_lists/roll_call_vote_cfm.cfm?congress={congress}&session={session}&vote={vote_number}"
    )
}
