//! Error taxonomy for the copycert core.
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures a step can produce. None of these cross the external boundary
//! as panics; they are always returned as typed results.

use std::time::Duration;

use thiserror::Error;

use crate::rules::catalog::{EdictId, PillarId};

/// Catalog construction and lookup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown edict {0}")]
    UnknownEdict(EdictId),

    #[error("duplicate edict id {0}")]
    DuplicateEdict(EdictId),

    #[error("duplicate pillar id {0}")]
    DuplicatePillar(PillarId),

    #[error("pillar ids start at 1")]
    ZeroPillarId,

    #[error("edict ids start at 1 (edict listed under pillar {0})")]
    ZeroEdictId(PillarId),

    #[error("edict {edict} declares pillar {declared} but is listed under pillar {listed}")]
    PillarMismatch {
        edict: EdictId,
        declared: PillarId,
        listed: PillarId,
    },

    #[error("edict {0} has a threshold above 100")]
    ThresholdOutOfRange(EdictId),

    #[error("edict {0} has a zero weight")]
    ZeroWeight(EdictId),
}

/// Invalid externally supplied threshold configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("override references unknown edict {0}")]
    UnknownEdict(EdictId),

    #[error("{field} must be within 0..=100, got {value}")]
    ScoreOutOfRange { field: String, value: u8 },

    #[error("override for edict {0} has a zero weight")]
    ZeroWeight(EdictId),
}

/// Failures of the aggregation step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A result references an edict the catalog does not know. This means the
    /// catalog and the producer of the result disagree on versions.
    #[error("result references unknown edict {0}")]
    UnknownEdict(EdictId),

    #[error("edict {edict} reported score {score}, outside 0..=100")]
    ScoreOutOfRange { edict: EdictId, score: u8 },

    #[error("total score {0} is outside 0..=100")]
    TotalOutOfRange(u8),

    #[error("passed={passed} contradicts score {total_score} against threshold {passing_threshold}")]
    PassedMismatch {
        total_score: u8,
        passing_threshold: u8,
        passed: bool,
    },

    #[error("passing threshold {threshold} is below the certification minimum of {minimum}")]
    ThresholdBelowMinimum { threshold: u8, minimum: u8 },

    #[error("edict {0} is missing feedback")]
    MissingFeedback(EdictId),

    #[error("edict {0} is not scored by the reviewer")]
    NotReviewable(EdictId),
}

/// A submission was refused before anything was sent to the reviewer.
///
/// Returning one of these never changes certification state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("document has not been validated since the last edit")]
    NotValidated,

    #[error("score {total_score} is below the submission minimum of {minimum}")]
    NotEligible { total_score: u8, minimum: u8 },

    #[error("a review is already in flight")]
    InFlight,

    #[error("the last review asked for revisions; edit the document first")]
    RevisionRequired,

    #[error("already certified")]
    AlreadyCertified,

    #[error("no review is in flight")]
    NotSubmitted,
}

/// The remote reviewer failed to produce a usable result.
///
/// Kept distinct from a normal failing review so callers can offer a retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("review timed out after {0:?}")]
    Timeout(Duration),

    #[error("review transport failed: {0}")]
    Transport(String),

    #[error("review was cancelled")]
    Cancelled,

    #[error("reviewer returned an invalid result: {0}")]
    InvalidResult(#[from] ValidationError),
}

/// Session-level misuse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("document cannot be edited while a review is in flight")]
    ReviewInFlight,
}
