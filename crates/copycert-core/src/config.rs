//! Externally supplied thresholds and timing.
//!
//! Everything here has a default, so a settings file only needs the fields it
//! changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::catalog::{EdictId, RuleCatalog};

pub const DEFAULT_CLIENT_REVIEW_MINIMUM: u8 = 85;
pub const DEFAULT_CERTIFICATION_MINIMUM: u8 = 90;

/// Per-edict replacement for the catalog's threshold and weight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdictOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_threshold: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Thresholds {
    /// Local total needed before a document may be submitted.
    pub client_review_minimum_score: u8,
    /// Remote total needed for certification.
    pub certification_minimum_score: u8,
    pub edict_overrides: BTreeMap<EdictId, EdictOverride>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            client_review_minimum_score: DEFAULT_CLIENT_REVIEW_MINIMUM,
            certification_minimum_score: DEFAULT_CERTIFICATION_MINIMUM,
            edict_overrides: BTreeMap::new(),
        }
    }
}

impl Thresholds {
    /// Reject minimums above 100 and overrides that do not fit the catalog.
    pub fn validate(&self, catalog: &RuleCatalog) -> Result<(), ConfigError> {
        check_score("client_review_minimum_score", self.client_review_minimum_score)?;
        check_score("certification_minimum_score", self.certification_minimum_score)?;

        for (id, over) in &self.edict_overrides {
            if !catalog.contains(*id) {
                return Err(ConfigError::UnknownEdict(*id));
            }
            if let Some(threshold) = over.passing_threshold {
                check_score(&format!("edict_overrides.{}.passing_threshold", id.0), threshold)?;
            }
            if over.weight == Some(0) {
                return Err(ConfigError::ZeroWeight(*id));
            }
        }
        Ok(())
    }
}

fn check_score(field: &str, value: u8) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Thresholds plus the timing knobs of the session boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub review_timeout_ms: u64,
    pub settle_window_ms: u64,
    pub simulated_latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            review_timeout_ms: 30_000,
            settle_window_ms: 1_000,
            simulated_latency_ms: 1_500,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file: {}", path.display()))
    }

    pub fn review_timeout(&self) -> Duration {
        Duration::from_millis(self.review_timeout_ms)
    }

    pub fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}
