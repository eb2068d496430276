use std::env;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Tweets Senate roll-call votes together with the share of the population
/// each side represents.
#[derive(Debug, Parser)]
#[command(name = "senate-popbot")]
pub struct Args {
    /// Congress number, e.g. 117. Falls back to CONGRESS_NUMBER.
    #[arg(long)]
    pub congress: Option<String>,

    /// Session within the congress (1 or 2). Falls back to SENATE_SESSION.
    #[arg(long)]
    pub session: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the run needs, resolved up front so a bad environment fails
/// fast instead of mid-run. No module reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub congress: String,
    pub session: String,
    pub census_api_key: String,
    pub census_year: String,
    pub census_base_url: String,
    pub senate_base_url: String,
    pub post_base_url: String,
    pub post_token: String,
    pub ledger_path: PathBuf,
    pub bootstrap_ledger: bool,
    pub max_posts_per_run: usize,
}

impl Config {
    pub fn from_env(args: Args) -> Result<Self, ConfigError> {
        let congress = args
            .congress
            .or_else(|| env_opt("CONGRESS_NUMBER"))
            .ok_or(ConfigError::Missing("--congress / CONGRESS_NUMBER"))?;
        let session = args
            .session
            .or_else(|| env_opt("SENATE_SESSION"))
            .ok_or(ConfigError::Missing("--session / SENATE_SESSION"))?;

        let max_posts_per_run = match env_opt("MAX_POSTS_PER_RUN") {
            None => 4,
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "MAX_POSTS_PER_RUN",
                value: raw,
            })?,
        };

        Ok(Self {
            congress,
            session,
            census_api_key: env_opt("CENSUS_API_KEY")
                .ok_or(ConfigError::Missing("CENSUS_API_KEY"))?,
            census_year: env_opt("CENSUS_YEAR").unwrap_or_else(|| "2021".to_string()),
            census_base_url: env_opt("CENSUS_API_BASE")
                .unwrap_or_else(|| "https://api.census.gov".to_string()),
            senate_base_url: env_opt("SENATE_BASE_URL")
                .unwrap_or_else(|| "https://www.senate.gov".to_string()),
            post_base_url: env_opt("POST_API_BASE")
                .unwrap_or_else(|| "https://api.twitter.com".to_string()),
            post_token: env_opt("POST_BEARER_TOKEN")
                .ok_or(ConfigError::Missing("POST_BEARER_TOKEN"))?,
            ledger_path: env_opt("LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tweets.csv")),
            bootstrap_ledger: env_opt("LEDGER_BOOTSTRAP")
                .map(|raw| truthy(&raw))
                .unwrap_or(false),
            max_posts_per_run,
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn truthy(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "yes")
}
