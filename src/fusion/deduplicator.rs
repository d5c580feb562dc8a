//! Label-keyed deduplication
//!
//! Stable: keeps the first occurrence of each label in original order;
//! later duplicates are discarded even when they carry richer data.

use crate::types::Labeled;
use std::collections::HashSet;

/// Collapse repeated entries referring to the same labeled place.
pub fn dedupe_by_label<T: Labeled>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut result = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert(item.label().to_string()) {
            result.push(item);
        }
    }

    result
}
