use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::certification::session::Session;
use crate::error::{ReviewError, SubmissionError};
use crate::report::model::{RemoteValidationResult, ReviewReport};
use crate::review::Reviewer;

pub const DEFAULT_REVIEW_TIMEOUT: Duration = Duration::from_secs(30);

/// How a submission that reached the reviewer ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Certified(RemoteValidationResult),
    NeedsRevision(RemoteValidationResult),
    /// No usable review. The document can be resubmitted.
    Failed(ReviewError),
}

impl From<ReviewOutcome> for ReviewReport {
    fn from(outcome: ReviewOutcome) -> Self {
        match outcome {
            ReviewOutcome::Certified(result) => ReviewReport::Certified { result },
            ReviewOutcome::NeedsRevision(result) => ReviewReport::NeedsRevision { result },
            ReviewOutcome::Failed(err) => ReviewReport::Failed {
                error: err.to_string(),
            },
        }
    }
}

pub(crate) fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Submits the session's document to a reviewer.
///
/// The session lock is never held across the review. At most one submission
/// is in flight; a dropped submission is treated as cancelled.
#[derive(Clone)]
pub struct Certifier {
    session: Arc<Mutex<Session>>,
    reviewer: Arc<dyn Reviewer>,
    timeout: Duration,
    cancel: Arc<Notify>,
}

impl Certifier {
    pub fn new(
        session: Arc<Mutex<Session>>,
        reviewer: Arc<dyn Reviewer>,
        timeout: Duration,
    ) -> Self {
        Self {
            session,
            reviewer,
            timeout,
            cancel: Arc::new(Notify::new()),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// Abort the review currently in flight, if any.
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    pub async fn submit(&self) -> Result<ReviewOutcome, SubmissionError> {
        let (request, catalog, minimum) = {
            let mut session = lock(&self.session);
            let request = session.begin_submission()?;
            let validator = session.validator();
            (
                request,
                Arc::clone(validator.catalog()),
                validator.thresholds().certification_minimum_score,
            )
        };
        info!(fingerprint = %request.fingerprint, "submitted for review");

        let mut guard = InFlight {
            session: &self.session,
            armed: true,
        };

        let review = tokio::select! {
            reviewed = tokio::time::timeout(self.timeout, self.reviewer.review(request)) => {
                reviewed.unwrap_or(Err(ReviewError::Timeout(self.timeout)))
            }
            _ = self.cancel.notified() => Err(ReviewError::Cancelled),
        };
        let review = review.and_then(|result| {
            result.verify(&catalog, minimum)?;
            Ok(result)
        });

        guard.armed = false;
        lock(&self.session).complete_submission(&review, Utc::now())?;

        Ok(match review {
            Ok(result) if result.passed => ReviewOutcome::Certified(result),
            Ok(result) => ReviewOutcome::NeedsRevision(result),
            Err(err) => {
                warn!(error = %err, "review failed");
                ReviewOutcome::Failed(err)
            }
        })
    }
}

/// Releases the in-flight state if a submission future is dropped mid-review.
struct InFlight<'a> {
    session: &'a Mutex<Session>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("submission dropped before the review finished");
            let cancelled = Err(ReviewError::Cancelled);
            let _ = lock(self.session).complete_submission(&cancelled, Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certification::state::Phase;
    use crate::config::Thresholds;
    use crate::error::ValidationError;
    use crate::review::ReviewRequest;
    use crate::rules::aggregate::Validator;
    use crate::rules::catalog::{EdictId, RuleCatalog};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct Fixed {
        delay: Duration,
        result: Result<RemoteValidationResult, ReviewError>,
    }

    #[async_trait]
    impl Reviewer for Fixed {
        async fn review(&self, _: ReviewRequest) -> Result<RemoteValidationResult, ReviewError> {
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn remote(passed: bool, edict: u32) -> RemoteValidationResult {
        RemoteValidationResult {
            total_score: if passed { 95 } else { 50 },
            passing_threshold: 90,
            passed,
            feedback: "f".into(),
            edict_results: BTreeMap::from([(
                EdictId(edict),
                crate::report::model::RemoteEdictResult {
                    edict_id: EdictId(edict),
                    passed,
                    score: 80,
                    feedback: "x".into(),
                },
            )]),
        }
    }

    fn eligible_session() -> Arc<Mutex<Session>> {
        let thresholds = Thresholds {
            client_review_minimum_score: 0,
            ..Thresholds::default()
        };
        let validator = Validator::new(Arc::new(RuleCatalog::standard()), thresholds).unwrap();
        let mut session = Session::new(validator, "Buy now. You will love it.");
        session.validate().unwrap();
        assert_eq!(session.phase(), Phase::Eligible);
        Arc::new(Mutex::new(session))
    }

    fn certifier(delay_ms: u64, result: Result<RemoteValidationResult, ReviewError>) -> Certifier {
        let reviewer = Fixed {
            delay: Duration::from_millis(delay_ms),
            result,
        };
        Certifier::new(eligible_session(), Arc::new(reviewer), DEFAULT_REVIEW_TIMEOUT)
    }

    fn phase(c: &Certifier) -> Phase {
        lock(c.session()).phase()
    }

    #[tokio::test(start_paused = true)]
    async fn passing_review_certifies() {
        let c = certifier(100, Ok(remote(true, 14)));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, ReviewOutcome::Certified(_)));
        assert_eq!(phase(&c), Phase::Certified);
        assert!(lock(c.session()).certification().certification_date.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_review_needs_revision() {
        let c = certifier(100, Ok(remote(false, 14)));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, ReviewOutcome::NeedsRevision(_)));
        assert_eq!(phase(&c), Phase::NeedsRevision);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reviewer_times_out() {
        let c = certifier(60_000, Ok(remote(true, 14)));
        let outcome = c.submit().await.unwrap();
        assert_eq!(
            outcome,
            ReviewOutcome::Failed(ReviewError::Timeout(DEFAULT_REVIEW_TIMEOUT))
        );
        assert_eq!(phase(&c), Phase::Eligible);
        assert!(!lock(c.session()).certification().is_certified());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_edicts_in_review_are_rejected() {
        let c = certifier(10, Ok(remote(true, 99)));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(
            outcome,
            ReviewOutcome::Failed(ReviewError::InvalidResult(_))
        ));
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn self_contradicting_review_does_not_certify() {
        let lenient_bar = RemoteValidationResult {
            total_score: 10,
            passing_threshold: 5,
            passed: true,
            feedback: "Certified.".into(),
            edict_results: BTreeMap::new(),
        };
        let c = certifier(10, Ok(lenient_bar));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(
            outcome,
            ReviewOutcome::Failed(ReviewError::InvalidResult(
                ValidationError::ThresholdBelowMinimum { threshold: 5, minimum: 90 }
            ))
        ));
        assert_eq!(phase(&c), Phase::Eligible);
        assert!(!lock(c.session()).certification().is_certified());

        let mut wrong_flag = remote(true, 14);
        wrong_flag.total_score = 50;
        let c = certifier(10, Ok(wrong_flag));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(
            outcome,
            ReviewOutcome::Failed(ReviewError::InvalidResult(
                ValidationError::PassedMismatch { .. }
            ))
        ));
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn review_scoring_local_only_edict_is_rejected() {
        let c = certifier(10, Ok(remote(true, 1)));
        let outcome = c.submit().await.unwrap();
        assert_eq!(
            outcome,
            ReviewOutcome::Failed(ReviewError::InvalidResult(ValidationError::NotReviewable(
                EdictId(1)
            )))
        );
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_is_distinct_from_revision() {
        let c = certifier(10, Err(ReviewError::Transport("connection reset".into())));
        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, ReviewOutcome::Failed(ReviewError::Transport(_))));
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_submission_is_rejected() {
        let c = certifier(1_000, Ok(remote(true, 14)));
        let first = tokio::spawn({
            let c = c.clone();
            async move { c.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(phase(&c), Phase::Submitted);
        assert_eq!(c.submit().await, Err(SubmissionError::InFlight));

        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, ReviewOutcome::Certified(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_review() {
        let c = certifier(10_000, Ok(remote(true, 14)));
        let pending = tokio::spawn({
            let c = c.clone();
            async move { c.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        c.cancel();

        let outcome = pending.await.unwrap().unwrap();
        assert_eq!(outcome, ReviewOutcome::Failed(ReviewError::Cancelled));
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_submission_releases_in_flight_state() {
        let c = certifier(10_000, Ok(remote(true, 14)));
        let pending = tokio::spawn({
            let c = c.clone();
            async move { c.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(phase(&c), Phase::Submitted);

        pending.abort();
        let _ = pending.await;
        assert_eq!(phase(&c), Phase::Eligible);
    }

    #[test]
    fn outcome_converts_to_report() {
        let report: ReviewReport = ReviewOutcome::Failed(ReviewError::Cancelled).into();
        assert!(matches!(report, ReviewReport::Failed { .. }));
    }
}
