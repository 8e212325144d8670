//! Submission adapter: one validated record becomes one inserted row.
//!
//! The adapter maps the record to the row shape of its collection and calls
//! [`RecordStore::insert`] exactly once. Store errors never reach the user:
//! they are logged with their kind and collapsed into an opaque
//! [`PersistenceFailure`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::form::{Form, FormId};
use super::ports::{RecordStore, Row};

/// Identity of a created row, as reported by the store's `id` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Read the `id` column of a created row, if present.
    pub fn from_row(row: &Row) -> Option<Self> {
        match row.get("id")? {
            Value::String(id) => Some(Self(id.clone())),
            Value::Number(id) => Some(Self(id.to_string())),
            _ => None,
        }
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submission could not be saved. The cause is logged, not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the {form} submission could not be saved")]
pub struct PersistenceFailure {
    form: FormId,
}

impl PersistenceFailure {
    /// Failure for `form`.
    pub const fn new(form: FormId) -> Self {
        Self { form }
    }

    /// Form whose submission failed.
    pub const fn form(&self) -> FormId {
        self.form
    }
}

/// Writes validated records through a [`RecordStore`].
pub struct SubmissionAdapter<S> {
    store: Arc<S>,
}

impl<S> Clone for SubmissionAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> SubmissionAdapter<S> {
    /// Wrap a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Insert `record` into the collection of form `F`.
    ///
    /// Returns the identity of the created row when the store reports one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceFailure`] when the row cannot be built or the
    /// store rejects the insert. No retry is attempted.
    pub async fn submit<F: Form>(
        &self,
        record: &F::Record,
    ) -> Result<Option<RecordId>, PersistenceFailure> {
        let row = F::to_row(record).map_err(|error| {
            warn!(
                form = %F::ID,
                collection = %F::COLLECTION,
                error = %error,
                "record could not be mapped to a row"
            );
            PersistenceFailure::new(F::ID)
        })?;

        match self.store.insert(F::COLLECTION, row).await {
            Ok(created) => {
                let id = created.first().and_then(RecordId::from_row);
                info!(
                    form = %F::ID,
                    collection = %F::COLLECTION,
                    created = created.len(),
                    id = id.as_ref().map(RecordId::as_str),
                    "record inserted"
                );
                Ok(id)
            }
            Err(error) => {
                warn!(
                    form = %F::ID,
                    collection = %F::COLLECTION,
                    kind = error.kind(),
                    error = %error,
                    "record insert failed"
                );
                Err(PersistenceFailure::new(F::ID))
            }
        }
    }
}

/// Row shapes of the `talents` and `investors` collections.
pub(crate) mod rows {
    use std::collections::BTreeSet;

    use serde::Serialize;
    use serde::ser::Error as _;
    use serde_json::Value;

    use crate::domain::candidate::{AdditionalLinks, CandidateApplication};
    use crate::domain::investor::{InterestArea, InvestorProfile, InvestorType, Stage};
    use crate::domain::ports::Row;

    #[derive(Serialize)]
    struct LinksRow<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        github: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        portfolio: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        other: Option<&'a str>,
    }

    impl<'a> LinksRow<'a> {
        fn from_links(links: &'a AdditionalLinks) -> Option<Self> {
            (!links.is_empty()).then(|| Self {
                github: links.github(),
                portfolio: links.portfolio(),
                other: links.other(),
            })
        }
    }

    #[derive(Serialize)]
    struct TalentRow<'a> {
        name: &'a str,
        linkedin: &'a str,
        resume_link: &'a str,
        additional_links: Option<LinksRow<'a>>,
        location: &'a str,
        description: &'a str,
        current_company: Option<&'a str>,
        experience: u8,
        skills: &'a [String],
    }

    #[derive(Serialize)]
    struct InvestorRow<'a> {
        name: &'a str,
        associated_firm: Option<&'a str>,
        investor_type: InvestorType,
        stage: Stage,
        interest_areas: &'a BTreeSet<InterestArea>,
        location: Option<&'a str>,
        linkedin_or_website: &'a str,
        notify_matches: bool,
    }

    pub(crate) fn talent_row(record: &CandidateApplication) -> Result<Row, serde_json::Error> {
        object(&TalentRow {
            name: record.name(),
            linkedin: record.linkedin_url(),
            resume_link: record.resume_url(),
            additional_links: LinksRow::from_links(record.additional_links()),
            location: record.location(),
            description: record.description(),
            current_company: record.current_company(),
            experience: record.experience_years(),
            skills: record.skills(),
        })
    }

    pub(crate) fn investor_row(record: &InvestorProfile) -> Result<Row, serde_json::Error> {
        object(&InvestorRow {
            name: record.name(),
            associated_firm: record.associated_firm(),
            investor_type: record.investor_type(),
            stage: record.stage(),
            interest_areas: record.interest_areas(),
            location: record.location(),
            linkedin_or_website: record.contact_url(),
            notify_matches: record.notify_matches(),
        })
    }

    fn object(row: &impl Serialize) -> Result<Row, serde_json::Error> {
        match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            _ => Err(serde_json::Error::custom("row must serialise to a JSON object")),
        }
    }
}
