//! Planning workflow: tier-aware day distribution and the end-to-end
//! pipeline orchestrator

pub mod distributor;
pub mod pipeline;

pub use distributor::distribute;
pub use pipeline::{CityMatch, Planner};
