//! Wikidata SPARQL client
//!
//! Implements both knowledge-graph collaborators: city candidate lookup
//! and per-city monument listing. Lookups are retried up to 3 attempts
//! with a fixed 2-second delay; exhausting retries yields an empty
//! result so downstream stages degrade to empty itinerary days instead
//! of aborting the run.

use crate::types::{CityCandidate, CityCandidateSource, MonumentQuerySource, MonumentStub};
use crate::utils::{retry_with_attempts, RateLimiter};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};

use super::{SourceError, USER_AGENT};

const WIKIDATA_SPARQL_URL: &str = "https://query.wikidata.org/sparql";
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const RATE_LIMIT: Duration = Duration::from_millis(1000);

/// SPARQL JSON response envelope.
#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
    #[serde(rename = "xml:lang")]
    lang: Option<String>,
}

/// Wikidata SPARQL client with retry and rate limiting.
pub struct WikidataClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
    retry_delay: Duration,
}

impl WikidataClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(RATE_LIMIT),
            retry_delay: RETRY_DELAY,
        })
    }

    /// Override the inter-attempt retry delay (tests use a short one).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn run_query(&self, query: &str) -> Result<SparqlResponse, SourceError> {
        self.rate_limiter.wait().await;

        debug!(url = WIKIDATA_SPARQL_URL, "Querying Wikidata SPARQL endpoint");

        let response = self
            .http_client
            .get(WIKIDATA_SPARQL_URL)
            .query(&[("query", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }

    /// Candidate cities whose label contains the (already normalized)
    /// name. Restricted to instances of city, minus classes that reach
    /// Q515 transitively but are not habitable cities.
    fn city_query(normalized_name: &str) -> String {
        let needle = escape_literal(normalized_name);
        format!(
            r#"SELECT DISTINCT ?city ?label ?countryLabel (LANG(?label) AS ?labelLang) WHERE {{
  ?city rdfs:label ?label .
  FILTER(LANG(?label) = "it" || LANG(?label) = "en")
  FILTER(CONTAINS(LCASE(STR(?label)), LCASE("{needle}")))
  ?city wdt:P31/wdt:P279* wd:Q515 .

  MINUS {{ ?city wdt:P31/wdt:P279* wd:Q24354 }}     # theatre
  MINUS {{ ?city wdt:P31/wdt:P279* wd:Q6581615 }}   # thermal baths
  MINUS {{ ?city wdt:P31/wdt:P279* wd:Q839954 }}    # archaeological site
  MINUS {{ ?city wdt:P31/wdt:P279* wd:Q13226383 }}  # building

  OPTIONAL {{ ?city wdt:P17 ?country . }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "it,en". }}
}}
LIMIT 20"#
        )
    }

    /// Monuments administratively located in the city, across a fixed
    /// set of sightseeing-worthy classes.
    fn monument_query(qid: &str, limit: usize) -> String {
        let qid = escape_literal(qid);
        format!(
            r#"SELECT DISTINCT ?itemLabel ?image ?description WHERE {{
  ?item wdt:P131 wd:{qid} .
  ?item wdt:P31/wdt:P279* ?class .
  VALUES ?class {{
    wd:Q33506   # museum
    wd:Q16970   # church
    wd:Q2977    # cathedral
    wd:Q163687  # basilica
    wd:Q16966   # duomo
    wd:Q44539   # temple
    wd:Q811979  # architectural structure
    wd:Q570116  # tourist attraction
    wd:Q24354   # theatre
    wd:Q170980  # obelisk
    wd:Q23413   # castle
    wd:Q483453  # fountain
  }}

  MINUS {{ ?item wdt:P31/wdt:P279* wd:Q55488 }}    # railway station
  MINUS {{ ?item wdt:P31/wdt:P279* wd:Q1248784 }}  # airport
  MINUS {{ ?item wdt:P31/wdt:P279* wd:Q483110 }}   # stadium
  MINUS {{ ?item wdt:P31/wdt:P279* wd:Q16917 }}    # hospital
  MINUS {{ ?item wdt:P31/wdt:P279* wd:Q3918 }}     # university

  OPTIONAL {{ ?item wdt:P18 ?image. }}
  OPTIONAL {{ ?item schema:description ?description. }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "it,en". }}
}} LIMIT {limit}"#
        )
    }

    /// Collapse the result rows to one candidate per QID, keeping row
    /// order and preferring the Italian label when both languages match.
    fn parse_city_candidates(response: SparqlResponse) -> Vec<CityCandidate> {
        let mut order: Vec<String> = Vec::new();
        let mut by_qid: HashMap<String, CityCandidate> = HashMap::new();

        for binding in response.results.bindings {
            let Some(qid) = binding
                .get("city")
                .and_then(|v| v.value.rsplit('/').next())
                .map(str::to_string)
            else {
                continue;
            };

            let label = match binding.get("label") {
                Some(v) => v.value.clone(),
                None => continue,
            };
            let lang = binding
                .get("labelLang")
                .map(|v| v.value.clone())
                .unwrap_or_default();

            // Candidates without a country are usually fictional or
            // abandoned entries; skip them.
            let Some(country) = binding.get("countryLabel").map(|v| v.value.clone()) else {
                continue;
            };

            match by_qid.get_mut(&qid) {
                Some(existing) => {
                    if lang == "it" {
                        existing.label = label;
                        existing.lang = lang;
                    }
                }
                None => {
                    order.push(qid.clone());
                    by_qid.insert(
                        qid.clone(),
                        CityCandidate {
                            qid,
                            label,
                            country,
                            lang,
                        },
                    );
                }
            }
        }

        order
            .into_iter()
            .filter_map(|qid| by_qid.remove(&qid))
            .collect()
    }

    fn parse_monuments(response: SparqlResponse) -> Vec<MonumentStub> {
        response
            .results
            .bindings
            .into_iter()
            .map(|binding| {
                let label = binding
                    .get("itemLabel")
                    .map(|v| v.value.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                let description = binding
                    .get("description")
                    .filter(|v| matches!(v.lang.as_deref(), Some("it") | Some("en")))
                    .map(|v| v.value.clone())
                    .filter(|s| !s.trim().is_empty());

                let image = binding.get("image").map(|v| v.value.clone());

                MonumentStub {
                    label,
                    description,
                    image,
                }
            })
            .collect()
    }
}

/// Escape a string for interpolation into a SPARQL literal.
fn escape_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl CityCandidateSource for WikidataClient {
    async fn query(&self, normalized_name: &str) -> Vec<CityCandidate> {
        let query = Self::city_query(normalized_name);

        let outcome = retry_with_attempts(
            "wikidata city candidates",
            RETRY_ATTEMPTS,
            self.retry_delay,
            || self.run_query(&query),
        )
        .await;

        match outcome {
            Ok(response) => Self::parse_city_candidates(response),
            Err(err) => {
                error!(name = normalized_name, error = %err, "city candidate lookup failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MonumentQuerySource for WikidataClient {
    async fn query(&self, qid: &str, limit: usize) -> Vec<MonumentStub> {
        let query = Self::monument_query(qid, limit);

        let outcome = retry_with_attempts(
            "wikidata monument listing",
            RETRY_ATTEMPTS,
            self.retry_delay,
            || self.run_query(&query),
        )
        .await;

        match outcome {
            Ok(response) => Self::parse_monuments(response),
            Err(err) => {
                error!(qid, error = %err, "monument listing failed");
                Vec::new()
            }
        }
    }
}
