//! Shared description of a signup form.

use std::fmt;

use serde::Serialize;

use super::ports::{Collection, Row};
use super::validation::{FieldPath, ValidationErrors};

/// Identifies which signup form an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormId {
    /// Job-seeker application.
    Candidate,
    /// Investor network signup.
    Investor,
}

impl FormId {
    /// Stable label used in logs and views.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Investor => "investor",
        }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form kind: its raw values, the edits a user can make, and the typed
/// record produced once every field passes validation.
pub trait Form: 'static {
    /// Which form this is.
    const ID: FormId;
    /// Collection the validated record is inserted into.
    const COLLECTION: Collection;

    /// Raw input state; `Default` is the blank form.
    type Values: Clone + Default + fmt::Debug + PartialEq + Serialize + Send + Sync;
    /// One user edit to the raw values.
    type Edit: fmt::Debug + Send;
    /// Normalised record ready for persistence.
    type Record: Clone + fmt::Debug + Send + Sync;

    /// Apply `edit` and return the path of the field it changed.
    fn apply(values: &mut Self::Values, edit: Self::Edit) -> FieldPath;

    /// Check every field and build the typed record.
    ///
    /// # Errors
    ///
    /// Returns all field errors together when any constraint fails.
    fn validate(values: &Self::Values) -> Result<Self::Record, ValidationErrors>;

    /// Map a validated record to the store's row shape.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be serialised to a JSON object.
    fn to_row(record: &Self::Record) -> Result<Row, serde_json::Error>;
}
