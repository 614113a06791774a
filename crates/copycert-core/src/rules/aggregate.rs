//! Local validation: run every locally scorable edict and combine the
//! sub-scores into a weighted total and a submission decision.
//!
//! The policy is deliberately plain:
//!
//!   total_score = round(Σ score × weight / Σ weight)
//!   can_submit  = total_score >= client_review_minimum_score
//!
//! Remote-only edicts never appear in a local result.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Thresholds;
use crate::document::fingerprint;
use crate::error::{ConfigError, ValidationError};
use crate::report::model::{AnalysisStatus, EdictResult, LocalValidationResult};
use crate::rules::catalog::{Edict, RuleCatalog};
use crate::rules::eval::{RuleConfig, evaluate};
use crate::signals::normalize;

/// Weighted mean of `(score, weight)` pairs, rounded half up.
///
/// Zero total weight yields 0.
pub fn weighted_total(scores: &[(u8, u32)]) -> u8 {
    let weight: u64 = scores.iter().map(|&(_, w)| u64::from(w)).sum();
    if weight == 0 {
        return 0;
    }
    let sum: u64 = scores
        .iter()
        .map(|&(s, w)| u64::from(s.min(100)) * u64::from(w))
        .sum();
    ((sum * 2 + weight) / (weight * 2)) as u8
}

/// Scores documents against an immutable catalog and threshold set.
#[derive(Debug, Clone)]
pub struct Validator {
    catalog: Arc<RuleCatalog>,
    thresholds: Thresholds,
}

impl Validator {
    pub fn new(catalog: Arc<RuleCatalog>, thresholds: Thresholds) -> Result<Self, ConfigError> {
        thresholds.validate(&catalog)?;
        Ok(Self {
            catalog,
            thresholds,
        })
    }

    pub fn catalog(&self) -> &Arc<RuleCatalog> {
        &self.catalog
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn minimum_score(&self) -> u8 {
        self.thresholds.client_review_minimum_score
    }

    /// Effective threshold and weight: override first, catalog otherwise.
    pub fn resolve(&self, edict: &Edict) -> (RuleConfig, u32) {
        let over = self.thresholds.edict_overrides.get(&edict.id);
        let threshold = over
            .and_then(|o| o.passing_threshold)
            .unwrap_or(edict.threshold);
        let weight = over.and_then(|o| o.weight).unwrap_or(edict.weight);
        (RuleConfig { threshold }, weight)
    }

    /// Score `document`. An empty document or catalog is not an error: it
    /// yields an `Empty` result that cannot be submitted.
    pub fn run(&self, document: &str) -> Result<LocalValidationResult, ValidationError> {
        let fingerprint = fingerprint(document);
        let text = normalize(document);

        if text.is_empty() || self.catalog.is_empty() {
            debug!(empty_text = text.is_empty(), "nothing to analyze");
            return Ok(LocalValidationResult::empty(
                fingerprint,
                self.minimum_score(),
            ));
        }

        let results = self
            .catalog
            .all_edicts()
            .filter(|e| e.affinity.is_local())
            .map(|edict| {
                let (config, _) = self.resolve(edict);
                match evaluate(edict.rule, &text, &config) {
                    Ok(verdict) => EdictResult::from_verdict(edict.id, verdict),
                    Err(err) => {
                        warn!(edict = %edict.id, error = %err, "analyzer failed; scoring as zero");
                        EdictResult {
                            edict_id: edict.id,
                            passed: false,
                            score: 0,
                            feedback: Some(err.to_string()),
                            highlights: Vec::new(),
                        }
                    }
                }
            })
            .collect();

        self.assemble_local(fingerprint, results)
    }

    /// Combine per-edict results into a local result.
    ///
    /// Every result must name an edict of this catalog and carry a score in
    /// 0..=100.
    pub fn assemble_local(
        &self,
        fingerprint: String,
        results: Vec<EdictResult>,
    ) -> Result<LocalValidationResult, ValidationError> {
        if results.is_empty() {
            return Ok(LocalValidationResult::empty(
                fingerprint,
                self.minimum_score(),
            ));
        }

        let mut weighted = Vec::with_capacity(results.len());
        let mut edict_results = BTreeMap::new();

        for result in results {
            let edict = self
                .catalog
                .edict(result.edict_id)
                .map_err(|_| ValidationError::UnknownEdict(result.edict_id))?;
            if result.score > 100 {
                return Err(ValidationError::ScoreOutOfRange {
                    edict: result.edict_id,
                    score: result.score,
                });
            }
            let (_, weight) = self.resolve(edict);
            weighted.push((result.score, weight));
            edict_results.insert(result.edict_id, result);
        }

        let total_score = weighted_total(&weighted);
        let minimum_score = self.minimum_score();
        let can_submit = total_score >= minimum_score;

        debug!(
            total_score,
            minimum_score,
            can_submit,
            rules = edict_results.len(),
            "local validation complete"
        );

        Ok(LocalValidationResult {
            fingerprint,
            status: AnalysisStatus::Ok,
            total_score,
            minimum_score,
            can_submit,
            edict_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdictOverride;
    use crate::rules::catalog::{Affinity, EdictId, Pillar, PillarId, RuleKind};

    fn edict(id: u32, weight: u32, affinity: Affinity) -> Edict {
        Edict {
            id: EdictId(id),
            pillar_id: PillarId(1),
            name: format!("rule {id}"),
            description: "d".into(),
            example: "e".into(),
            threshold: 80,
            weight,
            affinity,
            rule: RuleKind::SentenceLength,
        }
    }

    fn validator(edicts: Vec<Edict>, thresholds: Thresholds) -> Validator {
        let catalog = RuleCatalog::from_pillars(vec![Pillar {
            id: PillarId(1),
            name: "p".into(),
            description: "d".into(),
            edicts,
        }])
        .unwrap();
        Validator::new(Arc::new(catalog), thresholds).unwrap()
    }

    fn result(id: u32, score: u8) -> EdictResult {
        EdictResult {
            edict_id: EdictId(id),
            passed: score >= 80,
            score,
            feedback: None,
            highlights: Vec::new(),
        }
    }

    #[test]
    fn weighted_total_matches_weights() {
        assert_eq!(weighted_total(&[(100, 1), (0, 3)]), 25);
        assert_eq!(weighted_total(&[(90, 2), (60, 2)]), 75);
        assert_eq!(weighted_total(&[]), 0);
    }

    #[test]
    fn weighted_total_rounds_half_up() {
        assert_eq!(weighted_total(&[(1, 1), (0, 1)]), 1);
        assert_eq!(weighted_total(&[(100, 1), (0, 2)]), 33);
        assert_eq!(weighted_total(&[(100, 2), (0, 1)]), 67);
    }

    #[test]
    fn assembly_uses_catalog_weights() {
        let v = validator(
            vec![edict(1, 1, Affinity::Local), edict(2, 3, Affinity::Local)],
            Thresholds::default(),
        );
        let local = v
            .assemble_local("f".into(), vec![result(1, 100), result(2, 0)])
            .unwrap();
        assert_eq!(local.total_score, 25);
        assert!(!local.can_submit);
        assert_eq!(local.status, AnalysisStatus::Ok);
    }

    #[test]
    fn overrides_replace_weight() {
        let mut thresholds = Thresholds::default();
        thresholds.edict_overrides.insert(
            EdictId(2),
            EdictOverride {
                passing_threshold: None,
                weight: Some(1),
            },
        );
        let v = validator(
            vec![edict(1, 1, Affinity::Local), edict(2, 3, Affinity::Local)],
            thresholds,
        );
        let local = v
            .assemble_local("f".into(), vec![result(1, 100), result(2, 0)])
            .unwrap();
        assert_eq!(local.total_score, 50);
    }

    #[test]
    fn unknown_edict_is_rejected() {
        let v = validator(vec![edict(1, 1, Affinity::Local)], Thresholds::default());
        let err = v
            .assemble_local("f".into(), vec![result(1, 90), result(9, 90)])
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownEdict(EdictId(9)));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let v = validator(vec![edict(1, 1, Affinity::Local)], Thresholds::default());
        let err = v
            .assemble_local("f".into(), vec![result(1, 120)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::ScoreOutOfRange { score: 120, .. }));
    }

    #[test]
    fn eligibility_follows_minimum() {
        let v = validator(vec![edict(1, 1, Affinity::Local)], Thresholds::default());
        let at = v.assemble_local("f".into(), vec![result(1, 85)]).unwrap();
        let below = v.assemble_local("f".into(), vec![result(1, 84)]).unwrap();
        assert!(at.can_submit);
        assert!(!below.can_submit);
        assert_eq!(at.minimum_score, 85);
    }

    #[test]
    fn remote_only_edicts_are_skipped() {
        let v = validator(
            vec![
                edict(1, 1, Affinity::Local),
                edict(2, 1, Affinity::Remote),
                edict(3, 1, Affinity::Both),
            ],
            Thresholds::default(),
        );
        let local = v.run("Buy now. It works.").unwrap();
        let ids: Vec<_> = local.edict_results.keys().copied().collect();
        assert_eq!(ids, vec![EdictId(1), EdictId(3)]);
    }

    #[test]
    fn empty_document_is_not_an_error() {
        let v = Validator::new(Arc::new(RuleCatalog::standard()), Thresholds::default()).unwrap();
        for doc in ["", "   ", "<p></p>"] {
            let local = v.run(doc).unwrap();
            assert_eq!(local.status, AnalysisStatus::Empty);
            assert_eq!(local.total_score, 0);
            assert!(!local.can_submit);
            assert!(local.edict_results.is_empty());
        }
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        let v = Validator::new(Arc::new(RuleCatalog::empty()), Thresholds::default()).unwrap();
        let local = v.run("Buy now.").unwrap();
        assert_eq!(local.status, AnalysisStatus::Empty);
        assert_eq!(local.total_score, 0);
    }

    #[test]
    fn run_records_fingerprint_of_raw_text() {
        let v = Validator::new(Arc::new(RuleCatalog::standard()), Thresholds::default()).unwrap();
        let doc = "<p>Buy now.</p>";
        assert_eq!(v.run(doc).unwrap().fingerprint, fingerprint(doc));
    }

    #[test]
    fn standard_run_covers_local_edicts_only() {
        let v = Validator::new(Arc::new(RuleCatalog::standard()), Thresholds::default()).unwrap();
        let local = v.run("You will love it. Buy now!").unwrap();
        assert_eq!(local.edict_results.len(), 18);
        for id in [14, 19, 21] {
            assert!(!local.edict_results.contains_key(&EdictId(id)));
        }
        assert!(local.total_score <= 100);
    }

    #[test]
    fn new_rejects_invalid_thresholds() {
        let thresholds = Thresholds {
            client_review_minimum_score: 120,
            ..Thresholds::default()
        };
        assert!(Validator::new(Arc::new(RuleCatalog::standard()), thresholds).is_err());
    }
}
