//! Planning pipeline orchestrator
//!
//! Coordinates the full run: city resolution → monument listing →
//! deduplication → concurrent enrichment → distribution. Collaborators
//! are injected as trait objects so the whole pipeline runs against
//! fakes in tests.
//!
//! # Error handling
//! Source failures never abort a run: empty collaborator results flow
//! through as empty itinerary days. The only hard errors are invalid
//! caller input (zero days) — the capacity precondition is satisfied
//! here by capping the enriched list before distribution.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fusion::{dedupe_by_label, CascadeResolver};
use crate::types::{
    CityCandidate, CityCandidateSource, EnrichedMonument, Itinerary, MonumentQuerySource,
};
use crate::workflow::distributor;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

/// Outcome of a city lookup. Ambiguity is a selection decision for the
/// caller, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityMatch {
    /// No candidate (or transient failure upstream; not distinguished).
    NoMatch,
    /// Exactly one candidate.
    Unique(CityCandidate),
    /// Several candidates; the caller picks one.
    Ambiguous(Vec<CityCandidate>),
}

/// End-to-end planner over injectable sources.
pub struct Planner {
    cities: Arc<dyn CityCandidateSource>,
    monuments: Arc<dyn MonumentQuerySource>,
    resolver: CascadeResolver,
    settings: Settings,
}

impl Planner {
    pub fn new(
        cities: Arc<dyn CityCandidateSource>,
        monuments: Arc<dyn MonumentQuerySource>,
        resolver: CascadeResolver,
        settings: Settings,
    ) -> Self {
        Self {
            cities,
            monuments,
            resolver,
            settings,
        }
    }

    /// NFKC-normalize, trim, and lowercase a user-typed city name.
    pub fn normalize_city_name(name: &str) -> String {
        name.nfkc().collect::<String>().trim().to_lowercase()
    }

    /// Query the knowledge graph for cities matching `name`.
    pub async fn find_city_candidates(&self, name: &str) -> Vec<CityCandidate> {
        let normalized = Self::normalize_city_name(name);
        if normalized.is_empty() {
            return Vec::new();
        }
        self.cities.query(&normalized).await
    }

    /// Resolve a city name to a match outcome.
    pub async fn resolve_city(&self, name: &str) -> CityMatch {
        let mut candidates = self.find_city_candidates(name).await;
        match candidates.len() {
            0 => CityMatch::NoMatch,
            1 => CityMatch::Unique(candidates.remove(0)),
            _ => CityMatch::Ambiguous(candidates),
        }
    }

    /// Plan a `days`-day itinerary for the city identified by `qid`.
    ///
    /// An empty monument listing (including exhausted upstream retries)
    /// yields `days` empty day-buckets rather than an error.
    pub async fn plan(&self, qid: &str, days: usize) -> Result<Itinerary> {
        if days == 0 {
            return Err(Error::InvalidInput(
                "itinerary needs at least one day".to_string(),
            ));
        }

        let stubs = self
            .monuments
            .query(qid, self.settings.monument_limit)
            .await;
        info!(qid, stubs = stubs.len(), "Retrieved monument stubs");

        let stubs = dedupe_by_label(stubs);

        // Enrichment is independent per stub; fan out with bounded
        // concurrency. `buffered` keeps input order, which the stable
        // partition downstream depends on.
        let resolver = &self.resolver;
        let mut enriched: Vec<EnrichedMonument> = stream::iter(stubs)
            .map(|stub| resolver.enrich(stub))
            .buffered(self.settings.enrich_concurrency.max(1))
            .collect()
            .await;

        let capacity = days * self.settings.per_day_capacity;
        if enriched.len() > capacity {
            warn!(
                count = enriched.len(),
                capacity,
                "More monuments than the itinerary can hold; keeping the first ones"
            );
            enriched.truncate(capacity);
        }

        distributor::distribute(enriched, days, self.settings.per_day_capacity)
    }
}
