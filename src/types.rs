//! Core types and collaborator traits for the planning pipeline
//!
//! Defines the data model flowing through the pipeline
//! (stub → enriched record → itinerary) and the injectable source
//! traits the enrichment cascade and the planner are built against,
//! so both are unit-testable against fakes without network access.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Fallback description applied when every source comes back empty.
///
/// The quality scorer compares against this exact string, so the cascade
/// and the scorer must share it.
pub const PLACEHOLDER_DESCRIPTION: &str = "Description not available.";

/// Query language for Wikipedia-backed sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Lang {
    It,
    En,
}

impl Lang {
    /// ISO 639-1 code used in Wikipedia hostnames and API parameters.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::It => "it",
            Lang::En => "en",
        }
    }
}

/// Cascade language order: Italian first, then English.
pub const LANG_PRIORITY: [Lang; 2] = [Lang::It, Lang::En];

/// Provenance of an enriched field.
///
/// Declaration order is cascade priority: earlier variants are probed
/// first and win first. `None` marks a field no source could fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SourceTag {
    KnowledgeGraph,
    WikipediaSummaryIt,
    WikipediaSummaryEn,
    WikipediaSearchIt,
    WikipediaSearchEn,
    CommonsImage,
    None,
}

impl SourceTag {
    /// Tag for a Wikipedia summary hit in the given language.
    pub fn summary(lang: Lang) -> Self {
        match lang {
            Lang::It => SourceTag::WikipediaSummaryIt,
            Lang::En => SourceTag::WikipediaSummaryEn,
        }
    }

    /// Tag for a Wikipedia full-text-search hit in the given language.
    pub fn search(lang: Lang) -> Self {
        match lang {
            Lang::It => SourceTag::WikipediaSearchIt,
            Lang::En => SourceTag::WikipediaSearchEn,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceTag::KnowledgeGraph => "knowledge-graph",
            SourceTag::WikipediaSummaryIt => "wikipedia-summary-it",
            SourceTag::WikipediaSummaryEn => "wikipedia-summary-en",
            SourceTag::WikipediaSearchIt => "wikipedia-search-it",
            SourceTag::WikipediaSearchEn => "wikipedia-search-en",
            SourceTag::CommonsImage => "commons-image",
            SourceTag::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Point-of-interest record as returned by the knowledge graph, before
/// enrichment. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonumentStub {
    pub label: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Fully enriched point-of-interest record. Built once by the cascade,
/// then read-only. `description` is never empty: absence resolves to
/// [`PLACEHOLDER_DESCRIPTION`] with source [`SourceTag::None`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMonument {
    pub label: String,
    pub description: String,
    pub description_source: SourceTag,
    pub image: Option<String>,
    pub image_source: SourceTag,
}

/// Anything carrying a place label; the deduplication key seam.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for MonumentStub {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Labeled for EnrichedMonument {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Completeness tier driving distribution priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum QualityTier {
    /// Neither description nor image present.
    Empty = 0,
    /// Exactly one of description/image present.
    Partial = 1,
    /// Both description and image present.
    Complete = 2,
}

impl QualityTier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One day-bucket of the itinerary. Insertion order is the order in
/// which the distributor placed items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItineraryDay {
    pub monuments: Vec<EnrichedMonument>,
}

impl ItineraryDay {
    pub fn len(&self) -> usize {
        self.monuments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monuments.is_empty()
    }
}

/// Ordered sequence of day-buckets of fixed length. Created fresh per
/// planning run; replaces any previous itinerary held by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
}

impl Itinerary {
    /// Fresh itinerary with `days` empty day-buckets.
    pub fn with_days(days: usize) -> Self {
        Self {
            days: vec![ItineraryDay::default(); days],
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total monuments placed across all days.
    pub fn total_monuments(&self) -> usize {
        self.days.iter().map(ItineraryDay::len).sum()
    }
}

/// One knowledge-graph city match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCandidate {
    pub qid: String,
    pub label: String,
    pub country: String,
    pub lang: String,
}

/// Per-call yield of a cascade source. Empty fields mean the source had
/// nothing for this record (or the call failed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFields {
    pub description: Option<String>,
    pub image: Option<String>,
}

/// City candidate lookup. An empty result means "no match or transient
/// failure" — the two are not distinguished.
#[async_trait]
pub trait CityCandidateSource: Send + Sync {
    async fn query(&self, normalized_name: &str) -> Vec<CityCandidate>;
}

/// Monument listing for a city QID. Same empty-on-failure contract as
/// [`CityCandidateSource`].
#[async_trait]
pub trait MonumentQuerySource: Send + Sync {
    async fn query(&self, qid: &str, limit: usize) -> Vec<MonumentStub>;
}

/// Wikipedia page summary (description + thumbnail). Returns empty
/// fields on any failure; never raises to the caller.
#[async_trait]
pub trait WikipediaSummarySource: Send + Sync {
    async fn fetch(&self, title: &str, lang: Lang) -> SourceFields;
}

/// Wikipedia full-text search resolving a free-form label to the best
/// matching page title, if any.
#[async_trait]
pub trait WikipediaSearchSource: Send + Sync {
    async fn search(&self, label: &str, lang: Lang) -> Option<String>;
}

/// Wikimedia Commons image lookup, image only.
#[async_trait]
pub trait CommonsImageSource: Send + Sync {
    async fn fetch(&self, label: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tag_order_is_cascade_priority() {
        assert!(SourceTag::KnowledgeGraph < SourceTag::WikipediaSummaryIt);
        assert!(SourceTag::WikipediaSummaryIt < SourceTag::WikipediaSummaryEn);
        assert!(SourceTag::WikipediaSummaryEn < SourceTag::WikipediaSearchIt);
        assert!(SourceTag::WikipediaSearchIt < SourceTag::WikipediaSearchEn);
        assert!(SourceTag::WikipediaSearchEn < SourceTag::CommonsImage);
        assert!(SourceTag::CommonsImage < SourceTag::None);
    }

    #[test]
    fn test_source_tag_lang_helpers() {
        assert_eq!(SourceTag::summary(Lang::It), SourceTag::WikipediaSummaryIt);
        assert_eq!(SourceTag::summary(Lang::En), SourceTag::WikipediaSummaryEn);
        assert_eq!(SourceTag::search(Lang::It), SourceTag::WikipediaSearchIt);
        assert_eq!(SourceTag::search(Lang::En), SourceTag::WikipediaSearchEn);
    }

    #[test]
    fn test_quality_tier_ordering() {
        assert!(QualityTier::Complete > QualityTier::Partial);
        assert!(QualityTier::Partial > QualityTier::Empty);
        assert_eq!(QualityTier::Complete.as_u8(), 2);
        assert_eq!(QualityTier::Partial.as_u8(), 1);
        assert_eq!(QualityTier::Empty.as_u8(), 0);
    }

    #[test]
    fn test_itinerary_with_days() {
        let itinerary = Itinerary::with_days(3);
        assert_eq!(itinerary.len(), 3);
        assert!(itinerary.days.iter().all(ItineraryDay::is_empty));
        assert_eq!(itinerary.total_monuments(), 0);
    }
}
