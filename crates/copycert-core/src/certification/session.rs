use chrono::{DateTime, Utc};
use tracing::debug;

use crate::certification::state::{CertificationMachine, CertificationState, Phase};
use crate::document::fingerprint;
use crate::error::{ReviewError, SessionError, SubmissionError, ValidationError};
use crate::report::model::{LocalValidationResult, RemoteValidationResult};
use crate::review::ReviewRequest;
use crate::rules::aggregate::Validator;

/// One user's live document and its certification progress.
///
/// Results are tied to the text they scored by fingerprint; a result for
/// text that has since been edited is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    document: String,
    fingerprint: String,
    validator: Validator,
    machine: CertificationMachine,
    latest: Option<LocalValidationResult>,
}

impl Session {
    pub fn new(validator: Validator, document: impl Into<String>) -> Self {
        let document = document.into();
        Self {
            fingerprint: fingerprint(&document),
            document,
            validator,
            machine: CertificationMachine::new(),
            latest: None,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn certification(&self) -> &CertificationState {
        self.machine.certification()
    }

    pub fn latest(&self) -> Option<&LocalValidationResult> {
        self.latest.as_ref()
    }

    /// Replace the document text.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.machine.edit()?;
        self.document = text.into();
        self.fingerprint = fingerprint(&self.document);
        self.latest = None;
        Ok(())
    }

    /// Apply a local result. Returns false when the result scored text other
    /// than the current document.
    pub fn apply_local(&mut self, result: LocalValidationResult) -> bool {
        if result.fingerprint != self.fingerprint {
            debug!(
                stale = %result.fingerprint,
                current = %self.fingerprint,
                "dropping result for superseded text"
            );
            return false;
        }
        self.machine.apply_local(&result);
        self.latest = Some(result);
        true
    }

    /// Validate the current text and apply the result.
    pub fn validate(&mut self) -> Result<&LocalValidationResult, ValidationError> {
        let result = self.validator.run(&self.document)?;
        self.machine.apply_local(&result);
        Ok(self.latest.insert(result))
    }

    /// Enter `Submitted` and hand back what should be sent to the reviewer.
    pub fn begin_submission(&mut self) -> Result<ReviewRequest, SubmissionError> {
        self.machine.begin_submission(self.latest.as_ref())?;
        Ok(ReviewRequest {
            document: self.document.clone(),
            fingerprint: self.fingerprint.clone(),
        })
    }

    pub fn complete_submission(
        &mut self,
        review: &Result<RemoteValidationResult, ReviewError>,
        now: DateTime<Utc>,
    ) -> Result<(), SubmissionError> {
        let can_submit = self.latest.as_ref().is_some_and(|r| r.can_submit);
        self.machine.complete_submission(review, can_submit, now)
    }
}
