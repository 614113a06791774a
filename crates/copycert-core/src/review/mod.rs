//! The remote review seam.
//!
//! A reviewer is an opaque, slower, higher-bar validator. The core sends it
//! the document text and trusts nothing it returns until the result has been
//! checked against the catalog.

pub mod simulated;

use async_trait::async_trait;

use crate::error::ReviewError;
use crate::report::model::RemoteValidationResult;

pub use simulated::SimulatedReviewer;

/// What gets submitted for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub document: String,
    /// Fingerprint of `document`, as recorded by the local result it passed.
    pub fingerprint: String,
}

#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn review(&self, request: ReviewRequest) -> Result<RemoteValidationResult, ReviewError>;
}
