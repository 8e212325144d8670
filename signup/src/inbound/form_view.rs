//! Serialisable projection of a form instance for rendering adapters.
//!
//! ```text
//! {
//!   "form": "candidate",
//!   "values": { ... },
//!   "errors": [{ "field": "name", "code": "too_short", "message": "..." }],
//!   "touched": ["name"],
//!   "dirty": ["name"],
//!   "busy": false,
//!   "notice": null
//! }
//! ```

use serde::Serialize;

use crate::domain::notification::{Notice, NoticeBoard};
use crate::domain::ports::{NotificationRelay, RecordStore};
use crate::domain::{FieldPath, Form, FormId, FormSession, FormSnapshot};

/// One inline error beneath an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrorView {
    /// Field the error belongs to.
    pub field: FieldPath,
    /// Stable error code, e.g. `too_short`.
    pub code: &'static str,
    /// Text shown beneath the input.
    pub message: &'static str,
}

/// Everything a renderer needs to draw one form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView<V> {
    /// Form being rendered.
    pub form: FormId,
    /// Raw input values.
    pub values: V,
    /// Inline errors from the last failed submit.
    pub errors: Vec<FieldErrorView>,
    /// Fields that have lost focus.
    pub touched: Vec<FieldPath>,
    /// Fields changed since the last reset.
    pub dirty: Vec<FieldPath>,
    /// True while a submission is in flight; the submit control is disabled.
    pub busy: bool,
    /// Live notice for this form, if any.
    pub notice: Option<Notice>,
}

impl<V> FormView<V> {
    /// Project `snapshot` together with the live `notice`, if any.
    pub fn from_snapshot<F>(snapshot: &FormSnapshot<F>, notice: Option<Notice>) -> Self
    where
        F: Form<Values = V>,
        V: Clone,
    {
        let errors = snapshot
            .errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldErrorView {
                    field,
                    code: error.kind().code(),
                    message: error.message(),
                })
            })
            .collect();

        Self {
            form: F::ID,
            values: snapshot.values().clone(),
            errors,
            touched: snapshot.touched().iter().copied().collect(),
            dirty: snapshot.dirty().iter().copied().collect(),
            busy: snapshot.is_busy(),
            notice,
        }
    }

    /// Messages to show beneath `field`.
    pub fn messages_for(&self, field: FieldPath) -> impl Iterator<Item = &'static str> + '_ {
        self.errors
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| error.message)
    }
}

/// Project the current state of `session` with its live notice.
pub fn project<F, S, N>(session: &FormSession<F, S, N>, notices: &NoticeBoard) -> FormView<F::Values>
where
    F: Form,
    S: RecordStore,
    N: NotificationRelay + ?Sized,
{
    FormView::from_snapshot(&session.snapshot(), notices.current(F::ID))
}

#[cfg(test)]
mod tests {
    //! Projection and serialisation coverage for form views.

    use std::sync::Arc;

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::candidate::{self, CandidateEdit, CandidateField, CandidateForm};
    use crate::domain::investor::{self, InterestArea, InvestorEdit, InvestorForm};
    use crate::domain::ports::FixtureRecordStore;
    use crate::domain::{SubmissionAdapter, SubmitStep};

    #[rstest]
    fn invalid_submit_projects_inline_errors() {
        let snapshot = FormSnapshot::<InvestorForm>::new()
            .edit(InvestorEdit::Name("A".to_owned()))
            .expect("edit accepted")
            .touch(investor::NAME);
        let SubmitStep::Invalid(snapshot) = snapshot.begin_submit().expect("submit accepted")
        else {
            panic!("incomplete form must not validate");
        };

        let view = FormView::from_snapshot(&snapshot, None);

        assert_eq!(view.form, FormId::Investor);
        assert!(!view.busy);
        assert_eq!(view.touched, vec![investor::NAME]);
        assert_eq!(view.dirty, vec![investor::NAME]);
        assert_eq!(
            view.messages_for(investor::INTEREST_AREAS).collect::<Vec<_>>(),
            vec!["Please select at least one area"]
        );
        assert!(view.errors.iter().any(|error| error.code == "too_short"));
    }

    #[rstest]
    fn view_serialises_in_camel_case() {
        let snapshot = FormSnapshot::<InvestorForm>::new()
            .edit(InvestorEdit::ToggleInterest {
                area: InterestArea::Climate,
                checked: true,
            })
            .expect("edit accepted")
            .edit(InvestorEdit::NotifyMatches(true))
            .expect("edit accepted");

        let json = serde_json::to_value(FormView::from_snapshot(&snapshot, None))
            .expect("view serialises");

        assert_eq!(json["form"], "investor");
        assert_eq!(json["values"]["interest_areas"], json!(["Climate"]));
        assert_eq!(json["values"]["notify_matches"], true);
        assert_eq!(json["busy"], false);
        assert_eq!(json["notice"], json!(null));
        assert_eq!(json["dirty"], json!(["interest_areas", "notify_matches"]));
    }

    #[rstest]
    #[tokio::test]
    async fn project_includes_live_notice_after_submit() {
        let board = Arc::new(NoticeBoard::new());
        let session: FormSession<CandidateForm, _, _> = FormSession::new(
            SubmissionAdapter::new(Arc::new(FixtureRecordStore)),
            board.clone(),
        );
        session
            .edit(CandidateEdit::new(CandidateField::Name, "Jane Doe"))
            .expect("edit accepted");

        session.submit().await.expect("submit accepted");
        let view = project(&session, &board);

        let notice = view.notice.as_ref().expect("validation notice is live");
        assert_eq!(notice.message(), "Please fix the highlighted fields and try again.");
        assert!(view.messages_for(candidate::NAME).next().is_none());
        assert!(view.messages_for(candidate::SKILLS).next().is_some());
    }
}
