//! Driven port for surfacing submission outcomes to the user.

use crate::domain::{FormId, TerminalOutcome};

/// Receives exactly one call per terminal submission outcome.
///
/// Implementations decide how the outcome is shown (toast, banner, log) and
/// must not block: the call happens while the form session finishes a
/// submission.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRelay: Send + Sync {
    /// Report the outcome of one submission of `form`.
    fn relay(&self, form: FormId, outcome: TerminalOutcome);
}
