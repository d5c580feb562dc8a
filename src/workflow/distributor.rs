//! Capacity-aware round-robin day distribution
//!
//! # Algorithm
//! 1. Stable-partition the monuments into tiers 2/1/0 by completeness
//!    score.
//! 2. Process tiers in descending order with a single day cursor that
//!    persists across tier boundaries.
//! 3. Per monument: advance the cursor (wrapping modulo the day count)
//!    until a day below capacity, append there, then unconditionally
//!    advance once more.
//!
//! The capacity precondition (`monuments.len() <= days * per_day`) is
//! what bounds the cursor search, so it is enforced up front with a
//! typed error instead of being left to the caller's goodwill.

use crate::error::{Error, Result};
use crate::types::{EnrichedMonument, Itinerary, QualityTier};
use crate::validators::quality_scorer;
use tracing::debug;

/// Distribute enriched monuments across `days` day-buckets, at most
/// `per_day_capacity` per day, highest completeness tier first.
pub fn distribute(
    monuments: Vec<EnrichedMonument>,
    days: usize,
    per_day_capacity: usize,
) -> Result<Itinerary> {
    if days == 0 {
        return Err(Error::InvalidInput(
            "itinerary needs at least one day".to_string(),
        ));
    }

    if monuments.len() > days * per_day_capacity {
        return Err(Error::CapacityExceeded {
            count: monuments.len(),
            days,
            per_day: per_day_capacity,
        });
    }

    // Stable partition: original relative order survives within a tier.
    let mut complete = Vec::new();
    let mut partial = Vec::new();
    let mut empty = Vec::new();
    for monument in monuments {
        match quality_scorer::score(&monument) {
            QualityTier::Complete => complete.push(monument),
            QualityTier::Partial => partial.push(monument),
            QualityTier::Empty => empty.push(monument),
        }
    }

    debug!(
        complete = complete.len(),
        partial = partial.len(),
        empty = empty.len(),
        days,
        "Distributing monuments across days"
    );

    let mut itinerary = Itinerary::with_days(days);
    let mut cursor = 0usize;

    for monument in complete.into_iter().chain(partial).chain(empty) {
        while itinerary.days[cursor].monuments.len() >= per_day_capacity {
            cursor = (cursor + 1) % days;
        }
        itinerary.days[cursor].monuments.push(monument);
        cursor = (cursor + 1) % days;
    }

    Ok(itinerary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceTag;

    /// Build a monument of the requested tier, labeled for tracking.
    fn monument(label: &str, tier: QualityTier) -> EnrichedMonument {
        let (description, image) = match tier {
            QualityTier::Complete => ("a real description", Some("https://img/x.jpg")),
            QualityTier::Partial => ("a real description", None),
            QualityTier::Empty => (crate::types::PLACEHOLDER_DESCRIPTION, None),
        };

        EnrichedMonument {
            label: label.to_string(),
            description: description.to_string(),
            description_source: SourceTag::KnowledgeGraph,
            image: image.map(str::to_string),
            image_source: SourceTag::KnowledgeGraph,
        }
    }

    fn day_labels(itinerary: &Itinerary, day: usize) -> Vec<&str> {
        itinerary.days[day]
            .monuments
            .iter()
            .map(|m| m.label.as_str())
            .collect()
    }

    #[test]
    fn test_worked_two_day_scenario() {
        // Tiers [2,2,1,0,0] over two days of four.
        let monuments = vec![
            monument("t2_a", QualityTier::Complete),
            monument("t2_b", QualityTier::Complete),
            monument("t1", QualityTier::Partial),
            monument("t0_a", QualityTier::Empty),
            monument("t0_b", QualityTier::Empty),
        ];

        let itinerary = distribute(monuments, 2, 4).unwrap();

        assert_eq!(day_labels(&itinerary, 0), vec!["t2_a", "t1", "t0_b"]);
        assert_eq!(day_labels(&itinerary, 1), vec!["t2_b", "t0_a"]);
    }

    #[test]
    fn test_itinerary_always_has_requested_length() {
        for days in 1..=6 {
            let itinerary = distribute(vec![monument("m", QualityTier::Complete)], days, 4).unwrap();
            assert_eq!(itinerary.len(), days);
        }

        let empty = distribute(Vec::new(), 4, 4).unwrap();
        assert_eq!(empty.len(), 4);
        assert!(empty.days.iter().all(|d| d.is_empty()));
    }

    #[test]
    fn test_conservation() {
        let monuments: Vec<_> = (0..11)
            .map(|i| {
                let tier = match i % 3 {
                    0 => QualityTier::Complete,
                    1 => QualityTier::Partial,
                    _ => QualityTier::Empty,
                };
                monument(&format!("m{i}"), tier)
            })
            .collect();

        let itinerary = distribute(monuments, 3, 4).unwrap();
        assert_eq!(itinerary.total_monuments(), 11);

        // No duplication either.
        let mut labels: Vec<&str> = itinerary
            .days
            .iter()
            .flat_map(|d| d.monuments.iter().map(|m| m.label.as_str()))
            .collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 11);
    }

    #[test]
    fn test_tiers_never_increase_within_a_day() {
        let monuments = vec![
            monument("a", QualityTier::Partial),
            monument("b", QualityTier::Complete),
            monument("c", QualityTier::Empty),
            monument("d", QualityTier::Complete),
            monument("e", QualityTier::Partial),
            monument("f", QualityTier::Complete),
        ];

        let itinerary = distribute(monuments, 3, 4).unwrap();

        // Global placement order is descending tier, so each day's
        // top-to-bottom tier sequence must be non-increasing.
        for day in &itinerary.days {
            let tiers: Vec<u8> = day
                .monuments
                .iter()
                .map(|m| quality_scorer::score(m).as_u8())
                .collect();
            assert!(tiers.windows(2).all(|w| w[0] >= w[1]), "tiers {tiers:?}");
        }

        // And the first slot of each day went to a tier-2 item.
        for day in 0..3 {
            assert_eq!(
                quality_scorer::score(&itinerary.days[day].monuments[0]),
                QualityTier::Complete
            );
        }
    }

    #[test]
    fn test_skip_full_day() {
        let monuments = vec![
            monument("t2_a", QualityTier::Complete),
            monument("t2_b", QualityTier::Complete),
            monument("t2_c", QualityTier::Complete),
            monument("t1", QualityTier::Partial),
        ];

        let itinerary = distribute(monuments, 2, 2).unwrap();

        // Third tier-2 item lands on day 0 (occupancy 1 of 2); the
        // tier-1 item then skips the now-full day 0.
        assert_eq!(day_labels(&itinerary, 0), vec!["t2_a", "t2_c"]);
        assert_eq!(day_labels(&itinerary, 1), vec!["t2_b", "t1"]);
    }

    #[test]
    fn test_exact_capacity_fills_every_day() {
        let monuments: Vec<_> = (0..8)
            .map(|i| monument(&format!("m{i}"), QualityTier::Complete))
            .collect();

        let itinerary = distribute(monuments, 2, 4).unwrap();
        assert_eq!(itinerary.days[0].len(), 4);
        assert_eq!(itinerary.days[1].len(), 4);
    }

    #[test]
    fn test_capacity_exceeded_is_rejected() {
        let monuments: Vec<_> = (0..9)
            .map(|i| monument(&format!("m{i}"), QualityTier::Complete))
            .collect();

        let err = distribute(monuments, 2, 4).unwrap_err();
        match err {
            Error::CapacityExceeded { count, days, per_day } => {
                assert_eq!(count, 9);
                assert_eq!(days, 2);
                assert_eq!(per_day, 4);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_days_is_rejected() {
        let err = distribute(Vec::new(), 0, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_single_day_keeps_tier_order() {
        let monuments = vec![
            monument("low", QualityTier::Empty),
            monument("high", QualityTier::Complete),
            monument("mid", QualityTier::Partial),
        ];

        let itinerary = distribute(monuments, 1, 4).unwrap();
        assert_eq!(day_labels(&itinerary, 0), vec!["high", "mid", "low"]);
    }
}
