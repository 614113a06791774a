//! Re-validation on edit, at most once per settle window.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::certification::certifier::lock;
use crate::certification::session::Session;
use crate::report::model::LocalValidationResult;

pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(1_000);

const EDIT_QUEUE: usize = 64;

/// Handles to a running debounced validation task.
///
/// Dropping `edits` stops the task after a final validation of any pending
/// edit.
pub struct DebouncedValidation {
    pub edits: mpsc::Sender<String>,
    pub results: watch::Receiver<Option<LocalValidationResult>>,
    pub handle: JoinHandle<()>,
}

/// Apply edits to `session` as they arrive and validate once no edit has
/// arrived for `settle`.
pub fn spawn_debounced_validation(
    session: Arc<Mutex<Session>>,
    settle: Duration,
) -> DebouncedValidation {
    let (edit_tx, mut edit_rx) = mpsc::channel::<String>(EDIT_QUEUE);
    let (result_tx, result_rx) = watch::channel(None);

    let handle = tokio::spawn(async move {
        let mut pending = false;
        loop {
            if !pending {
                match edit_rx.recv().await {
                    Some(text) => pending = apply_edit(&session, text),
                    None => break,
                }
                continue;
            }

            tokio::select! {
                edit = edit_rx.recv() => match edit {
                    Some(text) => {
                        apply_edit(&session, text);
                    }
                    None => {
                        validate_now(&session, &result_tx);
                        break;
                    }
                },
                _ = tokio::time::sleep(settle) => {
                    validate_now(&session, &result_tx);
                    pending = false;
                }
            }
        }
        debug!("debounced validation stopped");
    });

    DebouncedValidation {
        edits: edit_tx,
        results: result_rx,
        handle,
    }
}

fn apply_edit(session: &Mutex<Session>, text: String) -> bool {
    match lock(session).edit(text) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "edit rejected");
            false
        }
    }
}

/// Score outside the lock, then apply only if the text is still current.
fn validate_now(
    session: &Mutex<Session>,
    results: &watch::Sender<Option<LocalValidationResult>>,
) {
    let (document, validator) = {
        let s = lock(session);
        (s.document().to_string(), s.validator().clone())
    };

    let result = match validator.run(&document) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "local validation failed");
            return;
        }
    };

    if lock(session).apply_local(result.clone()) {
        results.send_replace(Some(result));
    }
}
