//! Immutable snapshots of one form instance.
//!
//! Each transition borrows the current [`FormSnapshot`] and returns the next
//! one, so the rendering layer and the session can compare, store or discard
//! snapshots freely. The phase is the submission guard: while a submission is
//! in flight, edits and further submits are rejected.
//!
//! Submissions carry a [`SubmissionToken`]. Tokens increase monotonically for
//! the lifetime of a snapshot lineage, survive resets, and are never reused,
//! so a completion for anything but the current submission is recognised as
//! stale.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::form::Form;
use super::validation::{FieldPath, ValidationErrors};

/// Identifies one submission attempt of a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubmissionToken(u64);

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Accepting edits.
    Editing,
    /// Waiting for the store to answer submission `token`.
    Submitting {
        /// In-flight submission.
        token: SubmissionToken,
    },
}

/// How the store answered an in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The record was inserted.
    Saved,
    /// The insert failed.
    Failed,
}

/// An edit arrived while the form was submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditRejected {
    /// Inputs are locked until the in-flight submission completes.
    #[error("the form is locked while submission {0} is in flight")]
    Submitting(SubmissionToken),
}

/// A submit was requested while another was outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// Submission `0` has not completed yet.
    #[error("submission {0} is already in flight")]
    InFlight(SubmissionToken),
}

/// A completion did not match the in-flight submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("completion for submission {token} is stale")]
pub struct StaleCompletion {
    /// Token the completion carried.
    pub token: SubmissionToken,
    /// Submission in flight when the completion arrived, if any.
    pub current: Option<SubmissionToken>,
}

/// Result of asking a snapshot to submit.
#[derive(Debug)]
pub enum SubmitStep<F: Form> {
    /// Validation failed; the snapshot carries the field errors.
    Invalid(FormSnapshot<F>),
    /// Validation passed; the snapshot is submitting `token`.
    Ready {
        /// Snapshot in the `Submitting` phase.
        snapshot: FormSnapshot<F>,
        /// Typed record to persist.
        record: F::Record,
        /// Token the completion must present.
        token: SubmissionToken,
    },
}

/// Full state of one form instance at a point in time.
#[derive(Debug, PartialEq)]
pub struct FormSnapshot<F: Form> {
    values: F::Values,
    dirty: BTreeSet<FieldPath>,
    touched: BTreeSet<FieldPath>,
    errors: ValidationErrors,
    phase: FormPhase,
    next_token: u64,
}

impl<F: Form> Clone for FormSnapshot<F> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            dirty: self.dirty.clone(),
            touched: self.touched.clone(),
            errors: self.errors.clone(),
            phase: self.phase,
            next_token: self.next_token,
        }
    }
}

impl<F: Form> Default for FormSnapshot<F> {
    fn default() -> Self {
        Self {
            values: F::Values::default(),
            dirty: BTreeSet::new(),
            touched: BTreeSet::new(),
            errors: ValidationErrors::new(),
            phase: FormPhase::Editing,
            next_token: 1,
        }
    }
}

impl<F: Form> FormSnapshot<F> {
    /// Blank form in the `Editing` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw values.
    pub fn values(&self) -> &F::Values {
        &self.values
    }

    /// Current phase.
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Errors from the last failed submit, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Fields changed since the last reset.
    pub fn dirty(&self) -> &BTreeSet<FieldPath> {
        &self.dirty
    }

    /// Fields that have lost focus at least once since the last reset.
    pub fn touched(&self) -> &BTreeSet<FieldPath> {
        &self.touched
    }

    /// Whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    /// Token of the in-flight submission.
    pub fn in_flight(&self) -> Option<SubmissionToken> {
        match self.phase {
            FormPhase::Submitting { token } => Some(token),
            FormPhase::Editing => None,
        }
    }

    /// Apply one edit, marking the field dirty and clearing its errors.
    ///
    /// # Errors
    ///
    /// Returns [`EditRejected::Submitting`] while a submission is in flight.
    pub fn edit(&self, edit: F::Edit) -> Result<Self, EditRejected> {
        if let Some(token) = self.in_flight() {
            return Err(EditRejected::Submitting(token));
        }
        let mut next = self.clone();
        let path = F::apply(&mut next.values, edit);
        next.dirty.insert(path);
        next.errors.clear_field(path);
        Ok(next)
    }

    /// Mark `field` as touched.
    #[must_use]
    pub fn touch(&self, field: FieldPath) -> Self {
        let mut next = self.clone();
        next.touched.insert(field);
        next
    }

    /// Validate and, when every field passes, enter the `Submitting` phase.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::InFlight`] when a submission is already
    /// outstanding. Validation failures are not errors: they come back as
    /// [`SubmitStep::Invalid`].
    pub fn begin_submit(&self) -> Result<SubmitStep<F>, SubmitRejected> {
        if let Some(token) = self.in_flight() {
            return Err(SubmitRejected::InFlight(token));
        }

        let mut next = self.clone();
        match F::validate(&self.values) {
            Err(errors) => {
                next.errors = errors;
                Ok(SubmitStep::Invalid(next))
            }
            Ok(record) => {
                let token = SubmissionToken(self.next_token);
                next.next_token = self.next_token.saturating_add(1);
                next.errors = ValidationErrors::new();
                next.phase = FormPhase::Submitting { token };
                Ok(SubmitStep::Ready {
                    snapshot: next,
                    record,
                    token,
                })
            }
        }
    }

    /// Apply the store's answer for submission `token`.
    ///
    /// A saved submission resets the form; a failed one returns to editing
    /// with every value intact.
    ///
    /// # Errors
    ///
    /// Returns [`StaleCompletion`] when `token` is not the in-flight
    /// submission; the snapshot is left unchanged.
    pub fn complete(
        &self,
        token: SubmissionToken,
        completion: Completion,
    ) -> Result<Self, StaleCompletion> {
        let current = self.in_flight();
        if current != Some(token) {
            return Err(StaleCompletion { token, current });
        }
        Ok(match completion {
            Completion::Saved => self.reset(),
            Completion::Failed => Self {
                phase: FormPhase::Editing,
                ..self.clone()
            },
        })
    }

    /// Discard the instance, e.g. on navigation away.
    ///
    /// Any in-flight token becomes stale.
    #[must_use]
    pub fn abandon(&self) -> Self {
        self.reset()
    }

    fn reset(&self) -> Self {
        Self {
            next_token: self.next_token,
            ..Self::default()
        }
    }
}
