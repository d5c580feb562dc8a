//! Wikipedia REST and search client
//!
//! Two collaborators share this client: the page summary endpoint
//! (description + thumbnail) and the MediaWiki full-text search used to
//! resolve a free-form monument label to its best-matching page title.

use crate::types::{Lang, SourceFields, WikipediaSearchSource, WikipediaSummarySource};
use crate::utils::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{SourceError, USER_AGENT};

const RATE_LIMIT: Duration = Duration::from_millis(100);

/// Page summary payload, reduced to the fields the cascade consumes.
#[derive(Debug, Deserialize)]
struct PageSummary {
    extract: Option<String>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl From<PageSummary> for SourceFields {
    fn from(summary: PageSummary) -> Self {
        SourceFields {
            description: summary.extract,
            image: summary.thumbnail.map(|t| t.source),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

/// Wikipedia API client.
pub struct WikipediaClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl WikipediaClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(RATE_LIMIT),
        })
    }

    fn summary_url(title: &str, lang: Lang) -> String {
        format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            lang.code(),
            title.replace(' ', "_")
        )
    }

    fn search_url(lang: Lang) -> String {
        format!("https://{}.wikipedia.org/w/api.php", lang.code())
    }

    async fn try_summary(&self, title: &str, lang: Lang) -> Result<PageSummary, SourceError> {
        self.rate_limiter.wait().await;

        let url = Self::summary_url(title, lang);
        let response = self
            .http_client
            .get(&url)
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

    async fn try_search(&self, label: &str, lang: Lang) -> Result<Option<String>, SourceError> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .get(Self::search_url(lang))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", label),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(parsed
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|hit| hit.title))
    }
}

#[async_trait]
impl WikipediaSummarySource for WikipediaClient {
    async fn fetch(&self, title: &str, lang: Lang) -> SourceFields {
        match self.try_summary(title, lang).await {
            Ok(summary) => summary.into(),
            Err(err) => {
                // Missing pages 404 here routinely; not worth a warning.
                debug!(title, lang = lang.code(), error = %err, "summary fetch yielded nothing");
                SourceFields::default()
            }
        }
    }
}

#[async_trait]
impl WikipediaSearchSource for WikipediaClient {
    async fn search(&self, label: &str, lang: Lang) -> Option<String> {
        match self.try_search(label, lang).await {
            Ok(best_title) => best_title,
            Err(err) => {
                debug!(label, lang = lang.code(), error = %err, "search yielded nothing");
                None
            }
        }
    }
}
