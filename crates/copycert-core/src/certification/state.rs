//! Certification state machine.
//!
//!   Draft -> Analyzed -> Eligible -> Submitted -> Certified
//!                                              \-> NeedsRevision
//!
//! Every transition is a method; invalid ones return an error and leave the
//! machine untouched. Certification is recorded once and never revoked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReviewError, SessionError, SubmissionError};
use crate::report::model::{LocalValidationResult, RemoteValidationResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Edited since the last validation.
    Draft,
    Analyzed,
    /// Analyzed and above the submission minimum.
    Eligible,
    /// Review in flight.
    Submitted,
    Certified,
    NeedsRevision,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    Pending,
    Passed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificationState {
    pub status: CertificationStatus,
    pub certification_date: Option<DateTime<Utc>>,
}

impl CertificationState {
    pub fn pending() -> Self {
        Self {
            status: CertificationStatus::Pending,
            certification_date: None,
        }
    }

    pub fn is_certified(&self) -> bool {
        self.status == CertificationStatus::Passed
    }
}

#[derive(Debug, Clone)]
pub struct CertificationMachine {
    phase: Phase,
    certification: CertificationState,
}

impl Default for CertificationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificationMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Draft,
            certification: CertificationState::pending(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn certification(&self) -> &CertificationState {
        &self.certification
    }

    /// Content changed. Rejected while a review is in flight; a certified
    /// machine accepts the edit and stays certified.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Submitted => Err(SessionError::ReviewInFlight),
            Phase::Certified => Ok(()),
            _ => {
                self.transition(Phase::Draft);
                Ok(())
            }
        }
    }

    /// A local result for the current text arrived.
    pub fn apply_local(&mut self, result: &LocalValidationResult) {
        match self.phase {
            Phase::Draft | Phase::Analyzed | Phase::Eligible => {
                let next = if result.can_submit {
                    Phase::Eligible
                } else {
                    Phase::Analyzed
                };
                self.transition(next);
            }
            Phase::Submitted | Phase::Certified | Phase::NeedsRevision => {}
        }
    }

    /// Eligible -> Submitted, provided the latest result may be submitted.
    pub fn begin_submission(
        &mut self,
        latest: Option<&LocalValidationResult>,
    ) -> Result<(), SubmissionError> {
        match self.phase {
            Phase::Certified => return Err(SubmissionError::AlreadyCertified),
            Phase::Submitted => return Err(SubmissionError::InFlight),
            Phase::NeedsRevision => return Err(SubmissionError::RevisionRequired),
            Phase::Draft => return Err(SubmissionError::NotValidated),
            Phase::Analyzed | Phase::Eligible => {}
        }

        let latest = latest.ok_or(SubmissionError::NotValidated)?;
        if !latest.can_submit || self.phase != Phase::Eligible {
            return Err(SubmissionError::NotEligible {
                total_score: latest.total_score,
                minimum: latest.minimum_score,
            });
        }

        self.transition(Phase::Submitted);
        Ok(())
    }

    /// Resolve an in-flight submission.
    ///
    /// A passing review certifies; a failing one asks for revision; a review
    /// that could not be obtained returns to where the submission started.
    pub fn complete_submission(
        &mut self,
        review: &Result<RemoteValidationResult, ReviewError>,
        latest_can_submit: bool,
        now: DateTime<Utc>,
    ) -> Result<(), SubmissionError> {
        if self.phase != Phase::Submitted {
            return Err(SubmissionError::NotSubmitted);
        }

        match review {
            Ok(result) if result.passed => {
                if self.certification.certification_date.is_none() {
                    self.certification.certification_date = Some(now);
                }
                self.certification.status = CertificationStatus::Passed;
                info!(total_score = result.total_score, "document certified");
                self.transition(Phase::Certified);
            }
            Ok(result) => {
                info!(total_score = result.total_score, "review asked for revisions");
                self.transition(Phase::NeedsRevision);
            }
            Err(_) if latest_can_submit => self.transition(Phase::Eligible),
            Err(_) => self.transition(Phase::Analyzed),
        }
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            info!(from = ?self.phase, to = ?next, "certification phase changed");
            self.phase = next;
        }
    }
}
