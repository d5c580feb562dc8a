//! Source cascade resolver
//!
//! Fills the missing description/image of one monument stub by probing
//! an ordered list of external sources, recording which source satisfied
//! each field.
//!
//! # Field-wise resolution
//! The two fields resolve independently but share one pass over the
//! sources:
//! - Seed each field from the stub, tagged [`SourceTag::KnowledgeGraph`].
//! - Wikipedia summary, language `it` then `en`.
//! - Wikipedia full-text search → summary of the best hit, `it` then `en`.
//! - Commons image lookup, image only, as final fallback.
//! - A still-empty description resolves to [`PLACEHOLDER_DESCRIPTION`]
//!   with source [`SourceTag::None`].
//!
//! First-writer-wins: once a field is filled no later source may
//! overwrite it, enforced by the [`FieldSlot`] guard rather than by
//! call-site discipline. A source call is skipped entirely once both
//! fields are filled. Failed calls surface as empty results from the
//! collaborators, so the cascade just moves on to the next source.
//!
//! Probing within one stub is strictly sequential; concurrency lives one
//! level up, across stubs.

use crate::types::{
    CommonsImageSource, EnrichedMonument, MonumentStub, SourceFields, SourceTag,
    WikipediaSearchSource, WikipediaSummarySource, LANG_PRIORITY, PLACEHOLDER_DESCRIPTION,
};
use std::sync::Arc;
use tracing::debug;

/// Per-field fill state with provenance.
///
/// `fill` is the single write path; it refuses to overwrite and treats
/// whitespace-only candidates as empty.
#[derive(Debug)]
struct FieldSlot {
    value: Option<String>,
    source: SourceTag,
}

impl FieldSlot {
    fn empty() -> Self {
        Self {
            value: None,
            source: SourceTag::None,
        }
    }

    fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// Offer a candidate value. Returns true if the slot accepted it.
    fn fill(&mut self, candidate: Option<String>, tag: SourceTag) -> bool {
        if self.value.is_some() {
            return false;
        }

        let Some(candidate) = candidate else {
            return false;
        };
        if candidate.trim().is_empty() {
            return false;
        }

        self.value = Some(candidate);
        self.source = tag;
        true
    }
}

/// Source cascade resolver with injectable collaborators.
pub struct CascadeResolver {
    summaries: Arc<dyn WikipediaSummarySource>,
    search: Arc<dyn WikipediaSearchSource>,
    commons: Arc<dyn CommonsImageSource>,
}

impl CascadeResolver {
    pub fn new(
        summaries: Arc<dyn WikipediaSummarySource>,
        search: Arc<dyn WikipediaSearchSource>,
        commons: Arc<dyn CommonsImageSource>,
    ) -> Self {
        Self {
            summaries,
            search,
            commons,
        }
    }

    /// Resolve one stub into an enriched record.
    pub async fn enrich(&self, stub: MonumentStub) -> EnrichedMonument {
        let MonumentStub {
            label,
            description: stub_description,
            image: stub_image,
        } = stub;

        let mut description = FieldSlot::empty();
        let mut image = FieldSlot::empty();

        description.fill(stub_description, SourceTag::KnowledgeGraph);
        image.fill(stub_image, SourceTag::KnowledgeGraph);

        for lang in LANG_PRIORITY {
            if description.is_filled() && image.is_filled() {
                break;
            }
            let fields = self.summaries.fetch(&label, lang).await;
            self.offer(&mut description, &mut image, fields, SourceTag::summary(lang));
        }

        for lang in LANG_PRIORITY {
            if description.is_filled() && image.is_filled() {
                break;
            }
            let Some(best_title) = self.search.search(&label, lang).await else {
                continue;
            };
            let fields = self.summaries.fetch(&best_title, lang).await;
            self.offer(&mut description, &mut image, fields, SourceTag::search(lang));
        }

        if !image.is_filled() {
            image.fill(self.commons.fetch(&label).await, SourceTag::CommonsImage);
        }

        let description_value = match description.value {
            Some(value) => value,
            None => PLACEHOLDER_DESCRIPTION.to_string(),
        };

        debug!(
            label = %label,
            description_source = %description.source,
            image_source = %image.source,
            "Enriched monument"
        );

        EnrichedMonument {
            label,
            description: description_value,
            description_source: description.source,
            image: image.value,
            image_source: image.source,
        }
    }

    fn offer(
        &self,
        description: &mut FieldSlot,
        image: &mut FieldSlot,
        fields: SourceFields,
        tag: SourceTag,
    ) {
        description.fill(fields.description, tag);
        image.fill(fields.image, tag);
    }
}
