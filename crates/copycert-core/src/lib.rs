pub mod certification;
pub mod config;
pub mod document;
pub mod error;
pub mod report;
pub mod review;
pub mod rules;
pub mod signals;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::certification::{Certifier, Session};
use crate::config::Settings;
use crate::document::read_document;
use crate::report::model::{Report, ReviewReport, ToolInfo};
use crate::review::SimulatedReviewer;
use crate::rules::aggregate::Validator;
use crate::rules::catalog::RuleCatalog;

pub const TOOL_NAME: &str = "copycert";

/// JSON schema version of copycert reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

pub const RULE_CATALOG_VERSION: &str = "0.1.0";

fn standard_validator(settings: &Settings) -> Result<Validator> {
    Validator::new(
        Arc::new(RuleCatalog::standard()),
        settings.thresholds.clone(),
    )
    .context("invalid thresholds in settings")
}

/// Read a document and score it locally.
pub fn validate(path: &Path, settings: &Settings, tool: ToolInfo) -> Result<Report> {
    let doc = read_document(path)?;
    let validator = standard_validator(settings)?;
    let local = validator.run(&doc.text)?;
    Ok(Report::new(tool, doc.info(), local, None))
}

/// Score a document locally, then submit it to the simulated reviewer.
///
/// A refused submission (below the minimum, empty document) is part of the
/// report, not an error.
pub async fn review(path: &Path, settings: &Settings, tool: ToolInfo) -> Result<Report> {
    let doc = read_document(path)?;
    let validator = standard_validator(settings)?;

    let mut session = Session::new(validator.clone(), doc.text.clone());
    let local = session.validate()?.clone();

    let reviewer = SimulatedReviewer::new(validator, settings.simulated_latency());
    let certifier = Certifier::new(
        Arc::new(Mutex::new(session)),
        Arc::new(reviewer),
        settings.review_timeout(),
    );

    let review = match certifier.submit().await {
        Ok(outcome) => ReviewReport::from(outcome),
        Err(err) => ReviewReport::Refused {
            reason: err.to_string(),
        },
    };
    Ok(Report::new(tool, doc.info(), local, Some(review)))
}
