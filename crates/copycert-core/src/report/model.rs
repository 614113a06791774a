use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::error::ValidationError;
use crate::rules::catalog::{EdictId, RuleCatalog};
use crate::rules::eval::{Highlight, Verdict};

/// Outcome of one rule in one validation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdictResult {
    pub edict_id: EdictId,
    pub passed: bool,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

impl EdictResult {
    pub fn from_verdict(edict_id: EdictId, verdict: Verdict) -> Self {
        Self {
            edict_id,
            passed: verdict.passed,
            score: verdict.score,
            feedback: Some(verdict.feedback),
            highlights: verdict.highlights,
        }
    }
}

/// Whether the document had anything to analyze.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    /// Nothing to analyze. Informational, not a failure.
    Empty,
}

/// Result of running every locally scorable edict over a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalValidationResult {
    /// SHA-256 hex of the raw document text that was scored.
    pub fingerprint: String,
    pub status: AnalysisStatus,
    pub total_score: u8,
    /// Submission minimum the `can_submit` decision was made against.
    pub minimum_score: u8,
    pub can_submit: bool,
    pub edict_results: BTreeMap<EdictId, EdictResult>,
}

impl LocalValidationResult {
    /// The "nothing to analyze" result: zero score, no rules, not submittable.
    pub fn empty(fingerprint: String, minimum_score: u8) -> Self {
        Self {
            fingerprint,
            status: AnalysisStatus::Empty,
            total_score: 0,
            minimum_score,
            can_submit: false,
            edict_results: BTreeMap::new(),
        }
    }

    pub fn passed_count(&self) -> usize {
        self.edict_results.values().filter(|r| r.passed).count()
    }
}

/// Per-rule result from the remote reviewer. Feedback is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteEdictResult {
    pub edict_id: EdictId,
    pub passed: bool,
    pub score: u8,
    pub feedback: String,
}

/// Authoritative review of a submitted document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteValidationResult {
    pub total_score: u8,
    pub passing_threshold: u8,
    pub passed: bool,
    pub feedback: String,
    pub edict_results: BTreeMap<EdictId, RemoteEdictResult>,
}

impl RemoteValidationResult {
    /// Check a result received from outside against the catalog and the
    /// configured certification minimum.
    ///
    /// `passed` must agree with the scores, and every per-edict entry must be
    /// a reviewable edict with feedback.
    pub fn verify(
        &self,
        catalog: &RuleCatalog,
        certification_minimum: u8,
    ) -> Result<(), ValidationError> {
        if self.total_score > 100 {
            return Err(ValidationError::TotalOutOfRange(self.total_score));
        }
        if self.passing_threshold < certification_minimum {
            return Err(ValidationError::ThresholdBelowMinimum {
                threshold: self.passing_threshold,
                minimum: certification_minimum,
            });
        }
        if self.passed != (self.total_score >= self.passing_threshold) {
            return Err(ValidationError::PassedMismatch {
                total_score: self.total_score,
                passing_threshold: self.passing_threshold,
                passed: self.passed,
            });
        }
        for (id, result) in &self.edict_results {
            if result.edict_id != *id {
                return Err(ValidationError::UnknownEdict(result.edict_id));
            }
            let edict = catalog
                .edict(*id)
                .map_err(|_| ValidationError::UnknownEdict(*id))?;
            if !edict.affinity.is_remote() {
                return Err(ValidationError::NotReviewable(*id));
            }
            if result.score > 100 {
                return Err(ValidationError::ScoreOutOfRange {
                    edict: *id,
                    score: result.score,
                });
            }
            if result.feedback.trim().is_empty() {
                return Err(ValidationError::MissingFeedback(*id));
            }
        }
        Ok(())
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Document metadata bound to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub fingerprint: String,
}

/// Top-level JSON envelope written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub catalog_version: String,
    pub tool: ToolInfo,
    pub document: DocumentInfo,
    pub local: LocalValidationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewReport>,
    pub exit_code: i32,
}

/// Review section of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReviewReport {
    Certified { result: RemoteValidationResult },
    NeedsRevision { result: RemoteValidationResult },
    Failed { error: String },
    Refused { reason: String },
}

impl Report {
    /// Exit code: 0 when eligible (local only) or certified (with review),
    /// 1 otherwise.
    pub fn new(
        tool: ToolInfo,
        document: DocumentInfo,
        local: LocalValidationResult,
        review: Option<ReviewReport>,
    ) -> Self {
        let ok = match &review {
            None => local.can_submit,
            Some(ReviewReport::Certified { .. }) => true,
            Some(_) => false,
        };
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            catalog_version: crate::RULE_CATALOG_VERSION.to_string(),
            tool,
            document,
            local,
            review,
            exit_code: if ok { 0 } else { 1 },
        }
    }
}
