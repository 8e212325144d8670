//! Transient notices shown after a submission finishes.
//!
//! Every terminal outcome produces exactly one [`Notice`]. The
//! [`NoticeBoard`] keeps at most one live notice per form: a newer notice
//! replaces the previous one, and notices disappear once their lifetime has
//! elapsed according to the injected clock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use tracing::info;

use super::form::FormId;
use super::ports::NotificationRelay;

/// How long a notice stays visible unless configured otherwise.
pub const DEFAULT_NOTICE_LIFETIME: Duration = Duration::from_secs(4);

const CANDIDATE_SAVED: &str =
    "Thank you for your application! We'll review your profile and get back to you soon.";
const CANDIDATE_FAILED: &str =
    "There was an error submitting your application. Please try again.";
const INVESTOR_SAVED: &str =
    "Thank you for your interest! We'll recommend our founders about your profile.";
const INVESTOR_FAILED: &str = "There was an error submitting your form. Please try again.";
const VALIDATION_FAILED: &str = "Please fix the highlighted fields and try again.";

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalOutcome {
    /// The record was inserted.
    Success,
    /// At least one field failed validation; nothing was sent.
    ValidationFailed,
    /// The insert failed.
    PersistenceFailure,
}

/// Visual severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Confirmation.
    Success,
    /// User input needs attention.
    Warning,
    /// The submission could not be saved.
    Error,
}

impl From<TerminalOutcome> for NoticeLevel {
    fn from(outcome: TerminalOutcome) -> Self {
        match outcome {
            TerminalOutcome::Success => Self::Success,
            TerminalOutcome::ValidationFailed => Self::Warning,
            TerminalOutcome::PersistenceFailure => Self::Error,
        }
    }
}

/// Message shown for `outcome` on `form`.
pub const fn message_for(form: FormId, outcome: TerminalOutcome) -> &'static str {
    match (form, outcome) {
        (FormId::Candidate, TerminalOutcome::Success) => CANDIDATE_SAVED,
        (FormId::Candidate, TerminalOutcome::PersistenceFailure) => CANDIDATE_FAILED,
        (FormId::Investor, TerminalOutcome::Success) => INVESTOR_SAVED,
        (FormId::Investor, TerminalOutcome::PersistenceFailure) => INVESTOR_FAILED,
        (_, TerminalOutcome::ValidationFailed) => VALIDATION_FAILED,
    }
}

/// One auto-dismissing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    form: FormId,
    level: NoticeLevel,
    message: &'static str,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Notice {
    /// Build the notice for `outcome`, visible from `issued_at` for `lifetime`.
    pub fn for_outcome(
        form: FormId,
        outcome: TerminalOutcome,
        issued_at: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Self {
        Self {
            form,
            level: outcome.into(),
            message: message_for(form, outcome),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Form the notice belongs to.
    pub fn form(&self) -> FormId {
        self.form
    }

    /// Severity.
    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    /// Text shown to the user.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// When the notice was raised.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the notice dismisses itself.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the notice is still visible at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory relay holding the live notice of each form.
pub struct NoticeBoard {
    clock: Arc<dyn Clock>,
    lifetime: TimeDelta,
    live: Mutex<BTreeMap<FormId, Notice>>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    /// Board using the system clock and [`DEFAULT_NOTICE_LIFETIME`].
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock), DEFAULT_NOTICE_LIFETIME)
    }

    /// Board with an explicit clock and notice lifetime.
    ///
    /// Lifetimes reaching past the end of the calendar keep the notice live
    /// until `DateTime::<Utc>::MAX_UTC`.
    pub fn with_clock(clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        Self {
            clock,
            lifetime: TimeDelta::from_std(lifetime).unwrap_or(TimeDelta::MAX),
            live: Mutex::new(BTreeMap::new()),
        }
    }

    /// Live notice for `form`, dropping it first if it has expired.
    pub fn current(&self, form: FormId) -> Option<Notice> {
        let now = self.clock.utc();
        let mut live = self.live();
        match live.get(&form) {
            Some(notice) if notice.is_live_at(now) => Some(notice.clone()),
            Some(_) => {
                live.remove(&form);
                None
            }
            None => None,
        }
    }

    /// Dismiss the live notice of `form`, if any.
    pub fn dismiss(&self, form: FormId) {
        self.live().remove(&form);
    }

    fn live(&self) -> MutexGuard<'_, BTreeMap<FormId, Notice>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationRelay for NoticeBoard {
    fn relay(&self, form: FormId, outcome: TerminalOutcome) {
        let notice = Notice::for_outcome(form, outcome, self.clock.utc(), self.lifetime);
        info!(
            form = %form,
            level = ?notice.level(),
            expires_at = %notice.expires_at(),
            "notice raised"
        );
        self.live().insert(form, notice);
    }
}
