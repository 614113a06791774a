use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ReviewError;
use crate::report::model::{RemoteEdictResult, RemoteValidationResult};
use crate::review::{ReviewRequest, Reviewer};
use crate::rules::aggregate::{Validator, weighted_total};
use crate::rules::eval::evaluate;
use crate::signals::normalize;

/// In-process stand-in for the remote reviewer.
///
/// Waits `latency`, then scores every edict with remote affinity using the
/// same analyzers as local validation, and certifies at the configured
/// certification minimum.
#[derive(Debug, Clone)]
pub struct SimulatedReviewer {
    validator: Validator,
    latency: Duration,
}

impl SimulatedReviewer {
    pub fn new(validator: Validator, latency: Duration) -> Self {
        Self { validator, latency }
    }

    fn score(&self, document: &str) -> RemoteValidationResult {
        let text = normalize(document);
        let passing_threshold = self.validator.thresholds().certification_minimum_score;

        let mut weighted = Vec::new();
        let mut edict_results = BTreeMap::new();
        let mut weakest = Vec::new();

        for edict in self
            .validator
            .catalog()
            .all_edicts()
            .filter(|e| e.affinity.is_remote())
        {
            let (config, weight) = self.validator.resolve(edict);
            let (passed, score, feedback) = match evaluate(edict.rule, &text, &config) {
                Ok(v) => (v.passed, v.score, v.feedback),
                Err(err) => {
                    warn!(edict = %edict.id, error = %err, "reviewer analyzer failed");
                    (false, 0, err.to_string())
                }
            };
            if !passed {
                weakest.push(edict.name.as_str());
            }
            weighted.push((score, weight));
            edict_results.insert(
                edict.id,
                RemoteEdictResult {
                    edict_id: edict.id,
                    passed,
                    score,
                    feedback,
                },
            );
        }

        let total_score = weighted_total(&weighted);
        let passed = total_score >= passing_threshold;
        let feedback = if passed {
            format!("Certified. Your copy scored {total_score} against a bar of {passing_threshold}.")
        } else if weakest.is_empty() {
            format!("Scored {total_score}; {passing_threshold} is needed for certification.")
        } else {
            format!(
                "Scored {total_score}; {passing_threshold} is needed. Work on: {}.",
                weakest.join(", ")
            )
        };

        RemoteValidationResult {
            total_score,
            passing_threshold,
            passed,
            feedback,
            edict_results,
        }
    }
}

#[async_trait]
impl Reviewer for SimulatedReviewer {
    async fn review(&self, request: ReviewRequest) -> Result<RemoteValidationResult, ReviewError> {
        debug!(
            fingerprint = %request.fingerprint,
            latency_ms = self.latency.as_millis() as u64,
            "simulated review started"
        );
        tokio::time::sleep(self.latency).await;
        Ok(self.score(&request.document))
    }
}
