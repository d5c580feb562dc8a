//! Concrete HTTP clients for the external data sources
//!
//! Every client keeps its transport errors internal: the collaborator
//! traits it implements return optional/empty results, so a failed call
//! degrades to "nothing found" with a log line and the pipeline keeps
//! going.

pub mod commons_client;
pub mod wikidata_client;
pub mod wikipedia_client;

pub use commons_client::CommonsClient;
pub use wikidata_client::WikidataClient;
pub use wikipedia_client::WikipediaClient;

use thiserror::Error;

/// HTTP user agent shared by all clients, per Wikimedia etiquette.
pub const USER_AGENT: &str = "triplanner/0.1.0 (educational use)";

/// Errors internal to the concrete source clients.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(String),
}
