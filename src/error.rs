//! Error types for triplanner

use thiserror::Error;

/// Common result type for triplanner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Distributor received more monuments than the itinerary can hold
    #[error("Capacity exceeded: {count} monuments for {days} days x {per_day} per day")]
    CapacityExceeded {
        count: usize,
        days: usize,
        per_day: usize,
    },

    /// HTTP transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
