//! Posting client. The bot only needs one operation from the social
//! platform: publish a short text and get back the post id for the ledger.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform refused the post (content policy, auth, length).
    /// Never retried here: the vote stays out of the ledger and the next
    /// run tries again.
    #[error("post rejected with {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed posting response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait StatusPoster: Send + Sync {
    /// Publish `text`, returning the platform's id for the new post.
    async fn post_status(&self, text: &str) -> Result<String, PostError>;
}

/// Posts over the platform's JSON API with a bearer token.
pub struct HttpStatusPoster {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
}

impl HttpStatusPoster {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl StatusPoster for HttpStatusPoster {
    async fn post_status(&self, text: &str) -> Result<String, PostError> {
        let url = format!("{}/2/tweets", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: PostResponse = response
            .json()
            .await
            .map_err(|e| PostError::Malformed(e.to_string()))?;
        Ok(body.data.id)
    }
}
