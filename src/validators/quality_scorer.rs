//! Completeness-based quality classification
//!
//! Pure function mapping an enriched record to a tier in {0,1,2}:
//! 2 = description and image both genuinely present, 1 = exactly one,
//! 0 = neither. Total and side-effect-free; no error conditions.

use crate::types::{EnrichedMonument, QualityTier, PLACEHOLDER_DESCRIPTION};

/// Classify an enriched record by field completeness.
pub fn score(monument: &EnrichedMonument) -> QualityTier {
    let has_description = has_real_description(&monument.description);
    let has_image = monument
        .image
        .as_deref()
        .map(is_real_image)
        .unwrap_or(false);

    match (has_description, has_image) {
        (true, true) => QualityTier::Complete,
        (false, false) => QualityTier::Empty,
        _ => QualityTier::Partial,
    }
}

/// A description counts unless empty, whitespace-only, or exactly the
/// cascade's placeholder text.
fn has_real_description(description: &str) -> bool {
    !description.trim().is_empty() && description != PLACEHOLDER_DESCRIPTION
}

/// An image counts unless empty or it smells like a locally substituted
/// placeholder graphic.
fn is_real_image(url: &str) -> bool {
    !url.is_empty() && !url.to_lowercase().contains("placeholder")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceTag;

    fn monument(description: &str, image: Option<&str>) -> EnrichedMonument {
        EnrichedMonument {
            label: "test".to_string(),
            description: description.to_string(),
            description_source: SourceTag::KnowledgeGraph,
            image: image.map(str::to_string),
            image_source: SourceTag::KnowledgeGraph,
        }
    }

    #[test]
    fn test_both_present_is_complete() {
        let m = monument("a cathedral", Some("https://img/duomo.jpg"));
        assert_eq!(score(&m), QualityTier::Complete);
    }

    #[test]
    fn test_one_present_is_partial() {
        assert_eq!(score(&monument("a cathedral", None)), QualityTier::Partial);
        assert_eq!(
            score(&monument(PLACEHOLDER_DESCRIPTION, Some("https://img/x.jpg"))),
            QualityTier::Partial
        );
    }

    #[test]
    fn test_neither_present_is_empty() {
        assert_eq!(score(&monument(PLACEHOLDER_DESCRIPTION, None)), QualityTier::Empty);
        assert_eq!(score(&monument("   ", None)), QualityTier::Empty);
        assert_eq!(score(&monument("", None)), QualityTier::Empty);
    }

    #[test]
    fn test_placeholder_image_does_not_count() {
        let m = monument("a cathedral", Some("https://img/PlaceHolder.png"));
        assert_eq!(score(&m), QualityTier::Partial);

        let m = monument(PLACEHOLDER_DESCRIPTION, Some("file:///assets/placeholder.png"));
        assert_eq!(score(&m), QualityTier::Empty);
    }

    #[test]
    fn test_empty_image_url_does_not_count() {
        let m = monument("a cathedral", Some(""));
        assert_eq!(score(&m), QualityTier::Partial);
    }

    #[test]
    fn test_score_is_monotone_as_fields_appear() {
        let bare = monument(PLACEHOLDER_DESCRIPTION, None);
        let with_description = monument("a cathedral", None);
        let with_both = monument("a cathedral", Some("https://img/duomo.jpg"));

        assert!(score(&bare) <= score(&with_description));
        assert!(score(&with_description) <= score(&with_both));
        assert_eq!(score(&with_both), QualityTier::Complete);
    }
}
