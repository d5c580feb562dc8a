//! Wikimedia Commons image client
//!
//! Image-only fallback at the bottom of the cascade: a `pageimages`
//! thumbnail lookup on the monument label.

use crate::types::CommonsImageSource;
use crate::utils::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::{SourceError, USER_AGENT};

const COMMONS_API_URL: &str = "https://commons.wikimedia.org/w/api.php";
const THUMBNAIL_SIZE: &str = "600";
const RATE_LIMIT: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct PageImagesResponse {
    query: Option<PagesEnvelope>,
}

#[derive(Debug, Deserialize)]
struct PagesEnvelope {
    pages: HashMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// Wikimedia Commons API client.
pub struct CommonsClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl CommonsClient {
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

    async fn try_fetch(&self, label: &str) -> Result<Option<String>, SourceError> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .get(COMMONS_API_URL)
            .query(&[
                ("action", "query"),
                ("titles", label),
                ("prop", "pageimages"),
                ("pithumbsize", THUMBNAIL_SIZE),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let parsed: PageImagesResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(first_thumbnail(parsed))
    }
}

/// First page entry carrying a thumbnail, if any.
fn first_thumbnail(response: PageImagesResponse) -> Option<String> {
    response
        .query?
        .pages
        .into_values()
        .find_map(|page| page.thumbnail.map(|t| t.source))
}

#[async_trait]
impl CommonsImageSource for CommonsClient {
    async fn fetch(&self, label: &str) -> Option<String> {
        match self.try_fetch(label).await {
            Ok(image) => image,
            Err(err) => {
                debug!(label, error = %err, "commons lookup yielded nothing");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_thumbnail_present() {
        let parsed: PageImagesResponse = serde_json::from_str(
            r#"{
                "query": { "pages": {
                    "12345": {
                        "pageid": 12345,
                        "title": "Ponte Vecchio",
                        "thumbnail": { "source": "https://example.org/ponte-600.jpg", "width": 600 }
                    }
                }}
            }"#,
        )
        .unwrap();

        assert_eq!(
            first_thumbnail(parsed).as_deref(),
            Some("https://example.org/ponte-600.jpg")
        );
    }

    #[test]
    fn test_first_thumbnail_missing() {
        let parsed: PageImagesResponse = serde_json::from_str(
            r#"{
                "query": { "pages": {
                    "-1": { "title": "No such page" }
                }}
            }"#,
        )
        .unwrap();

        assert!(first_thumbnail(parsed).is_none());
    }

    #[test]
    fn test_first_thumbnail_empty_response() {
        let parsed: PageImagesResponse = serde_json::from_str("{}").unwrap();
        assert!(first_thumbnail(parsed).is_none());
    }
}
