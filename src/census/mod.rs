//! Census population data.
//!
//! One ACS 5-year estimate fetch per run supplies the population of every
//! state-level jurisdiction. The resulting [`PopulationIndex`] is the only
//! thing the rest of the bot sees; it never touches the Census API shapes.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// ACS variable for total population.
pub const POPULATION_VARIABLE: &str = "B01003_001E";

/// Jurisdictions whose residents have no senators. They are indexed (their
/// delegations exist in other data sets) but excluded from the national
/// denominator.
const NON_VOTING: [&str; 2] = ["DC", "PR"];

/// Census NAME field to postal code, for every jurisdiction the ACS state
/// query returns.
const STATE_CODES: [(&str, &str); 52] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

#[derive(Debug, Error)]
pub enum CensusError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("census API returned {status}")]
    Status { status: u16 },

    #[error("malformed census response: {0}")]
    Malformed(String),

    #[error("unknown jurisdiction name: {0}")]
    UnknownJurisdiction(String),
}

/// Population per jurisdiction, plus the national aggregate used as the
/// representation denominator.
#[derive(Debug, Clone)]
pub struct PopulationIndex {
    by_state: HashMap<String, u64>,
    national: u64,
}

impl PopulationIndex {
    /// Build an index from (postal code, population) pairs. The national
    /// aggregate sums every entry except the non-voting jurisdictions.
    pub fn new(entries: impl IntoIterator<Item = (String, u64)>) -> Self {
        let by_state: HashMap<String, u64> = entries.into_iter().collect();
        let national = by_state
            .iter()
            .filter(|(code, _)| !NON_VOTING.contains(&code.as_str()))
            .map(|(_, pop)| pop)
            .sum();
        Self { by_state, national }
    }

    /// Population of one jurisdiction, or None if the code is unknown.
    pub fn population_of(&self, code: &str) -> Option<u64> {
        self.by_state.get(code).copied()
    }

    /// Total population across jurisdictions with Senate representation.
    pub fn national_population(&self) -> u64 {
        self.national
    }
}

/// Source of the per-run population data.
#[async_trait]
pub trait PopulationSource: Send + Sync {
    async fn fetch(&self) -> Result<PopulationIndex, CensusError>;
}

/// Fetches state populations from the Census ACS 5-year API.
pub struct HttpCensusClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    year: String,
}

impl HttpCensusClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            year: year.into(),
        }
    }
}

#[async_trait]
impl PopulationSource for HttpCensusClient {
    async fn fetch(&self) -> Result<PopulationIndex, CensusError> {
        let url = format!(
            "{}/data/{}/acs/acs5?get=NAME,{}&for=state:*&key={}",
            self.base_url, self.year, POPULATION_VARIABLE, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CensusError::Status {
                status: status.as_u16(),
            });
        }

        let rows: Vec<Vec<String>> = response.json().await?;
        index_from_rows(&rows)
    }
}

/// Parse the Census array-of-arrays response. The first row is the header;
/// every following row holds the NAME and population columns.
pub fn index_from_rows(rows: &[Vec<String>]) -> Result<PopulationIndex, CensusError> {
    let header = rows
        .first()
        .ok_or_else(|| CensusError::Malformed("empty response".to_string()))?;
    let name_col = column(header, "NAME")?;
    let pop_col = column(header, POPULATION_VARIABLE)?;

    let mut entries = Vec::with_capacity(rows.len() - 1);
    for row in &rows[1..] {
        let name = row
            .get(name_col)
            .ok_or_else(|| CensusError::Malformed(format!("short row: {row:?}")))?;
        let population: u64 = row
            .get(pop_col)
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| CensusError::Malformed(format!("bad population in row: {row:?}")))?;
        let code = STATE_CODES
            .iter()
            .find(|(state_name, _)| state_name == name)
            .map(|(_, code)| (*code).to_string())
            .ok_or_else(|| CensusError::UnknownJurisdiction(name.clone()))?;
        entries.push((code, population));
    }

    Ok(PopulationIndex::new(entries))
}

fn column(header: &[String], name: &str) -> Result<usize, CensusError> {
    header
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| CensusError::Malformed(format!("missing column {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(entries: &[(&str, &str)]) -> Vec<Vec<String>> {
        let mut rows = vec![vec![
            "NAME".to_string(),
            POPULATION_VARIABLE.to_string(),
            "state".to_string(),
        ]];
        for (i, (name, pop)) in entries.iter().enumerate() {
            rows.push(vec![(*name).to_string(), (*pop).to_string(), format!("{i:02}")]);
        }
        rows
    }

    #[test]
    fn index_resolves_names_to_codes() {
        let index = index_from_rows(&rows(&[("Wyoming", "576851"), ("Ohio", "11780017")])).unwrap();
        assert_eq!(index.population_of("WY"), Some(576_851));
        assert_eq!(index.population_of("OH"), Some(11_780_017));
        assert_eq!(index.population_of("ZZ"), None);
    }

    #[test]
    fn national_total_excludes_non_voting_jurisdictions() {
        let index = index_from_rows(&rows(&[
            ("Wyoming", "576851"),
            ("District of Columbia", "670050"),
            ("Puerto Rico", "3263584"),
        ]))
        .unwrap();
        // DC and PR are indexed but kept out of the denominator
        assert_eq!(index.population_of("DC"), Some(670_050));
        assert_eq!(index.population_of("PR"), Some(3_263_584));
        assert_eq!(index.national_population(), 576_851);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let result = index_from_rows(&rows(&[("Atlantis", "1")]));
        assert!(matches!(result, Err(CensusError::UnknownJurisdiction(_))));
    }

    #[test]
    fn header_without_population_column_is_malformed() {
        let rows = vec![vec!["NAME".to_string(), "state".to_string()]];
        assert!(matches!(
            index_from_rows(&rows),
            Err(CensusError::Malformed(_))
        ));
    }
}
