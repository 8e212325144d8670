//! Domain layer for the signup forms.
//!
//! Purpose: define both forms, their validation, the per-instance state
//! machine and the submission flow, and declare the ports the flow drives.
//! Nothing here performs I/O directly; the record store and notification
//! relay are injected.
//!
//! Public surface:
//! - `CandidateForm` / `InvestorForm`: the two [`Form`] kinds.
//! - `FormSnapshot`: immutable state of one form instance.
//! - `FormSession`: async driver enforcing the submission guard.
//! - `SubmissionAdapter`: single insert through the `RecordStore` port.
//! - `NoticeBoard`: in-memory `NotificationRelay` with expiry.

pub mod candidate;
pub mod form;
pub mod form_session;
pub mod form_state;
pub mod investor;
pub mod notification;
pub mod ports;
pub mod submission;
pub mod validation;

pub use self::candidate::{
    CandidateApplication, CandidateEdit, CandidateField, CandidateForm, CandidateValues,
};
pub use self::form::{Form, FormId};
pub use self::form_session::{FormSession, SubmissionOutcome};
pub use self::form_state::{
    Completion, EditRejected, FormPhase, FormSnapshot, StaleCompletion, SubmissionToken,
    SubmitRejected, SubmitStep,
};
pub use self::investor::{
    InterestArea, InvestorEdit, InvestorForm, InvestorProfile, InvestorType, InvestorValues, Stage,
};
pub use self::notification::{
    DEFAULT_NOTICE_LIFETIME, Notice, NoticeBoard, NoticeLevel, TerminalOutcome,
};
pub use self::submission::{PersistenceFailure, RecordId, SubmissionAdapter};
pub use self::validation::{ErrorKind, FieldError, FieldPath, ValidationErrors};
