//! Configuration resolution for triplanner
//!
//! Provides two-tier configuration resolution with ENV → TOML priority
//! on top of compiled defaults. The TOML file may be partial; missing
//! keys fall back to defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum monuments requested from the knowledge graph per run.
    pub monument_limit: usize,
    /// Maximum monuments per itinerary day.
    pub per_day_capacity: usize,
    /// Concurrent enrichment cascades.
    pub enrich_concurrency: usize,
    /// Per-request HTTP timeout, seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monument_limit: 100,
            per_day_capacity: 4,
            enrich_concurrency: 8,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Resolve settings: compiled defaults, overlaid by the TOML file
    /// (explicit path or the default location), overlaid by
    /// `TRIPLANNER_*` environment variables.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut settings = match Self::config_path(explicit_path) {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading settings from TOML");
                Self::from_toml_file(&path)?
            }
            Some(_) | None => Self::default(),
        };

        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(|| {
            dirs::config_dir().map(|dir| dir.join("triplanner").join("config.toml"))
        })
    }

    fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("parse {} failed: {}", path.display(), e)))
    }

    fn apply_env_overrides(&mut self) {
        env_override("TRIPLANNER_MONUMENT_LIMIT", &mut self.monument_limit);
        env_override("TRIPLANNER_PER_DAY_CAPACITY", &mut self.per_day_capacity);
        env_override("TRIPLANNER_ENRICH_CONCURRENCY", &mut self.enrich_concurrency);
        env_override("TRIPLANNER_REQUEST_TIMEOUT_SECS", &mut self.request_timeout_secs);
    }

    fn validate(&self) -> Result<()> {
        if self.per_day_capacity == 0 {
            return Err(Error::Config(
                "per_day_capacity must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Replace `target` with the parsed value of the environment variable,
/// if set and parsable; unparsable values are ignored with a warning.
fn env_override<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, raw = %raw, "Ignoring unparsable environment override"),
        }
    }
}
