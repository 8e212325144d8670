//! Step definitions and scenario bindings for form submission BDD tests.

use super::*;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use signup::domain::candidate::{CandidateEdit, CandidateField, CandidateValues};
use signup::domain::investor::{self, InterestArea, InvestorEdit};
use signup::domain::{ErrorKind, FormId, NoticeLevel};

const JANE_DESCRIPTION: &str =
    "Backend engineer with ten years of payments experience, looking for a founding team.";

fn assert_notice(world: &FormSubmissionWorld, form: FormId, level: NoticeLevel) {
    let notice = world
        .notices()
        .current(form)
        .expect("a notice should be live");
    assert_eq!(notice.level(), level);
}

#[given("a candidate form backed by a working store")]
fn a_candidate_form_backed_by_a_working_store(world: &FormSubmissionWorld) {
    world.setup_candidate(RecordingStore::default());
}

#[given("a candidate form backed by a failing store")]
fn a_candidate_form_backed_by_a_failing_store(world: &FormSubmissionWorld) {
    world.setup_candidate(RecordingStore::failing());
}

#[given("an investor form backed by a working store")]
fn an_investor_form_backed_by_a_working_store(world: &FormSubmissionWorld) {
    world.setup_investor(RecordingStore::default());
}

#[when("the candidate fills in the Jane Doe application")]
fn the_candidate_fills_in_the_jane_doe_application(world: &FormSubmissionWorld) {
    let session = world.candidate();
    for (field, value) in [
        (CandidateField::Name, "Jane Doe"),
        (CandidateField::LinkedIn, "https://linkedin.com/in/jane"),
        (CandidateField::ResumeLink, "https://example.com/r.pdf"),
        (CandidateField::Location, "Remote"),
        (CandidateField::Description, JANE_DESCRIPTION),
        (CandidateField::Experience, "5"),
        (CandidateField::Skills, "Go, SQL"),
    ] {
        session
            .edit(CandidateEdit::new(field, value))
            .expect("edit accepted");
        session.touch(field.path());
    }
}

#[when("the candidate submits the form")]
fn the_candidate_submits_the_form(world: &FormSubmissionWorld) {
    let session = world.candidate();
    let outcome = world
        .block_on(session.submit())
        .expect("submit accepted");
    world.last_outcome.set(outcome);
}

#[when("the investor fills in every field except interest areas")]
fn the_investor_fills_in_every_field_except_interest_areas(world: &FormSubmissionWorld) {
    let session = world.investor();
    for edit in [
        InvestorEdit::Name("Ada Byron".to_owned()),
        InvestorEdit::AssociatedFirm("Analytical Ventures".to_owned()),
        InvestorEdit::InvestorType("Angel".to_owned()),
        InvestorEdit::Stage("Seed".to_owned()),
        InvestorEdit::ContactUrl("https://www.linkedin.com/in/ada".to_owned()),
        InvestorEdit::NotifyMatches(true),
    ] {
        session.edit(edit).expect("edit accepted");
    }
}

#[when("the investor ticks Climate and AI")]
fn the_investor_ticks_climate_and_ai(world: &FormSubmissionWorld) {
    let session = world.investor();
    for area in [InterestArea::Climate, InterestArea::Ai] {
        session
            .edit(InvestorEdit::ToggleInterest {
                area,
                checked: true,
            })
            .expect("edit accepted");
    }
}

#[when("the investor submits the form")]
fn the_investor_submits_the_form(world: &FormSubmissionWorld) {
    let session = world.investor();
    let outcome = world
        .block_on(session.submit())
        .expect("submit accepted");
    world.last_outcome.set(outcome);
}

#[then("exactly {count} row is written to {collection}")]
fn exactly_rows_are_written_to(world: &FormSubmissionWorld, count: usize, collection: String) {
    let rows = world.stored_rows();
    assert_eq!(rows.len(), count);
    assert!(
        rows.iter()
            .all(|(written_to, _)| written_to.as_str() == collection),
        "rows should target {collection}"
    );
}

#[then("no row is written")]
fn no_row_is_written(world: &FormSubmissionWorld) {
    assert!(world.stored_rows().is_empty());
}

#[then("the stored talent has skills Go and SQL with 5 years of experience")]
fn the_stored_talent_has_skills_and_experience(world: &FormSubmissionWorld) {
    let rows = world.stored_rows();
    let (_, row) = rows.first().expect("one talent row");
    assert_eq!(row.get("skills"), Some(&json!(["Go", "SQL"])));
    assert_eq!(row.get("experience"), Some(&json!(5)));
    assert_eq!(row.get("additional_links"), Some(&json!(null)));
    assert_eq!(row.get("current_company"), Some(&json!(null)));
}

#[then("the stored investor lists interest areas AI then Climate")]
fn the_stored_investor_lists_interest_areas(world: &FormSubmissionWorld) {
    let rows = world.stored_rows();
    let (_, row) = rows.first().expect("one investor row");
    assert_eq!(row.get("interest_areas"), Some(&json!(["AI", "Climate"])));
    assert_eq!(row.get("investor_type"), Some(&json!("Angel")));
    assert_eq!(
        row.get("linkedin_or_website"),
        Some(&json!("https://www.linkedin.com/in/ada"))
    );
}

#[then("the candidate form is reset")]
fn the_candidate_form_is_reset(world: &FormSubmissionWorld) {
    let snapshot = world.candidate().snapshot();
    assert_eq!(snapshot.values(), &CandidateValues::default());
    assert!(snapshot.touched().is_empty());
    assert!(!snapshot.is_busy());
}

#[then("the candidate form keeps the entered values")]
fn the_candidate_form_keeps_the_entered_values(world: &FormSubmissionWorld) {
    assert!(matches!(
        world.last_outcome.get(),
        Some(SubmissionOutcome::Failed(_))
    ));
    let snapshot = world.candidate().snapshot();
    assert_eq!(snapshot.values().name, "Jane Doe");
    assert_eq!(snapshot.values().skills, "Go, SQL");
    assert!(!snapshot.is_busy());
}

#[then("the interest areas field reports an empty selection")]
fn the_interest_areas_field_reports_an_empty_selection(world: &FormSubmissionWorld) {
    let Some(SubmissionOutcome::Invalid(errors)) = world.last_outcome.get() else {
        panic!("submission should fail validation");
    };
    assert_eq!(errors.field_count(), 1);
    assert_eq!(
        errors.kinds(investor::INTEREST_AREAS),
        vec![ErrorKind::EmptySelection]
    );
}

#[then("a success notice is shown for the candidate form")]
fn a_success_notice_is_shown_for_the_candidate_form(world: &FormSubmissionWorld) {
    assert_notice(world, FormId::Candidate, NoticeLevel::Success);
}

#[then("an error notice is shown for the candidate form")]
fn an_error_notice_is_shown_for_the_candidate_form(world: &FormSubmissionWorld) {
    assert_notice(world, FormId::Candidate, NoticeLevel::Error);
}

#[then("a warning notice is shown for the investor form")]
fn a_warning_notice_is_shown_for_the_investor_form(world: &FormSubmissionWorld) {
    assert_notice(world, FormId::Investor, NoticeLevel::Warning);
}

#[then("a success notice is shown for the investor form")]
fn a_success_notice_is_shown_for_the_investor_form(world: &FormSubmissionWorld) {
    assert_notice(world, FormId::Investor, NoticeLevel::Success);
}

#[scenario(
    path = "tests/features/form_submission.feature",
    name = "A complete job application is stored and the form resets"
)]
fn a_complete_job_application_is_stored(world: FormSubmissionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/form_submission.feature",
    name = "A store failure keeps the job application for another attempt"
)]
fn a_store_failure_keeps_the_job_application(world: FormSubmissionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/form_submission.feature",
    name = "An investor without interest areas is asked to pick one"
)]
fn an_investor_without_interest_areas_is_asked_to_pick_one(world: FormSubmissionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/form_submission.feature",
    name = "An investor signup stores the chosen interest areas in layout order"
)]
fn an_investor_signup_stores_interest_areas_in_layout_order(world: FormSubmissionWorld) {
    drop(world);
}
