//! Validation layer: completeness-based quality classification

pub mod quality_scorer;

pub use quality_scorer::score;
