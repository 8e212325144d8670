//! Async driver for one form instance.
//!
//! A [`FormSession`] owns the current [`FormSnapshot`] and swaps it for the
//! next one on every transition. The lock is only held while a transition is
//! computed, never across the store round-trip; the `Submitting` phase is
//! what keeps a second submit from reaching the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::form::Form;
use super::form_state::{
    Completion, EditRejected, FormSnapshot, SubmissionToken, SubmitRejected, SubmitStep,
};
use super::notification::TerminalOutcome;
use super::ports::{NotificationRelay, RecordStore};
use super::submission::{PersistenceFailure, RecordId, SubmissionAdapter};
use super::validation::{FieldPath, ValidationErrors};

/// What a call to [`FormSession::submit`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The record was inserted and the form reset.
    Saved(Option<RecordId>),
    /// Validation failed; nothing was sent.
    Invalid(ValidationErrors),
    /// The insert failed; the values were kept.
    Failed(PersistenceFailure),
    /// The form was abandoned while the insert was in flight; the answer was
    /// dropped and no notice raised.
    Discarded,
}

impl SubmissionOutcome {
    /// Outcome reported to the notification relay, if any.
    pub fn terminal(&self) -> Option<TerminalOutcome> {
        match self {
            Self::Saved(_) => Some(TerminalOutcome::Success),
            Self::Invalid(_) => Some(TerminalOutcome::ValidationFailed),
            Self::Failed(_) => Some(TerminalOutcome::PersistenceFailure),
            Self::Discarded => None,
        }
    }
}

/// One live instance of form `F`.
pub struct FormSession<F: Form, S, N: ?Sized> {
    snapshot: Mutex<FormSnapshot<F>>,
    adapter: SubmissionAdapter<S>,
    relay: Arc<N>,
}

impl<F, S, N> FormSession<F, S, N>
where
    F: Form,
    S: RecordStore,
    N: NotificationRelay + ?Sized,
{
    /// Start a blank session.
    pub fn new(adapter: SubmissionAdapter<S>, relay: Arc<N>) -> Self {
        Self {
            snapshot: Mutex::new(FormSnapshot::new()),
            adapter,
            relay,
        }
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> FormSnapshot<F> {
        self.state().clone()
    }

    /// Apply one user edit.
    ///
    /// # Errors
    ///
    /// Returns [`EditRejected`] while a submission is in flight.
    pub fn edit(&self, edit: F::Edit) -> Result<(), EditRejected> {
        let mut state = self.state();
        *state = state.edit(edit)?;
        Ok(())
    }

    /// Record that `field` lost focus.
    pub fn touch(&self, field: FieldPath) {
        let mut state = self.state();
        *state = state.touch(field);
    }

    /// Reset the form, e.g. when the user navigates away. An in-flight
    /// submission still completes at the store, but its answer is dropped.
    pub fn abandon(&self) {
        let mut state = self.state();
        if let Some(token) = state.in_flight() {
            debug!(form = %F::ID, token = %token, "form abandoned with submission in flight");
        }
        *state = state.abandon();
    }

    /// Validate the current values and, if they pass, insert the record.
    ///
    /// Exactly one notice is relayed per terminal outcome; a discarded
    /// completion relays nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::InFlight`] when a submission is already
    /// outstanding. No write is attempted in that case.
    pub async fn submit(&self) -> Result<SubmissionOutcome, SubmitRejected> {
        let (record, token) = {
            let mut state = self.state();
            match state.begin_submit()? {
                SubmitStep::Invalid(next) => {
                    let errors = next.errors().clone();
                    *state = next;
                    drop(state);
                    debug!(
                        form = %F::ID,
                        fields = errors.field_count(),
                        "submission rejected by validation"
                    );
                    return Ok(self.finish(SubmissionOutcome::Invalid(errors)));
                }
                SubmitStep::Ready {
                    snapshot,
                    record,
                    token,
                } => {
                    *state = snapshot;
                    (record, token)
                }
            }
        };

        info!(form = %F::ID, token = %token, "submission started");
        let result = self.adapter.submit::<F>(&record).await;
        let completion = if result.is_ok() {
            Completion::Saved
        } else {
            Completion::Failed
        };

        if !self.apply_completion(token, completion) {
            return Ok(SubmissionOutcome::Discarded);
        }
        Ok(self.finish(match result {
            Ok(id) => SubmissionOutcome::Saved(id),
            Err(failure) => SubmissionOutcome::Failed(failure),
        }))
    }

    fn apply_completion(&self, token: SubmissionToken, completion: Completion) -> bool {
        let mut state = self.state();
        match state.complete(token, completion) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(stale) => {
                debug!(
                    form = %F::ID,
                    token = %stale.token,
                    current = ?stale.current,
                    "stale submission completion discarded"
                );
                false
            }
        }
    }

    fn finish(&self, outcome: SubmissionOutcome) -> SubmissionOutcome {
        if let Some(terminal) = outcome.terminal() {
            self.relay.relay(F::ID, terminal);
        }
        outcome
    }

    fn state(&self) -> MutexGuard<'_, FormSnapshot<F>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
