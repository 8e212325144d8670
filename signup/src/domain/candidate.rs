//! Job-seeker application form.
//!
//! Raw values mirror the inputs on the page: every field is text, the years
//! of experience come from a select of `"1"` to `"30"`, and skills are typed
//! as one comma-separated string. Validation turns them into a
//! [`CandidateApplication`] with trimmed text, an integer experience level and
//! a skill list.

use std::sync::OnceLock;

use serde::Serialize;

use super::form::{Form, FormId};
use super::ports::{Collection, Row};
use super::submission::rows;
use super::validation::{
    ErrorKind, FieldError, FieldPath, FieldValue, Rule, Schema, ValidationErrors, optional_text,
};

/// Full name input.
pub const NAME: FieldPath = FieldPath::new("name");
/// LinkedIn profile URL input.
pub const LINKEDIN: FieldPath = FieldPath::new("linkedin");
/// Resume or CV link input.
pub const RESUME_LINK: FieldPath = FieldPath::new("resume_link");
/// Optional GitHub profile URL.
pub const GITHUB: FieldPath = FieldPath::new("additional_links.github");
/// Optional portfolio URL.
pub const PORTFOLIO: FieldPath = FieldPath::new("additional_links.portfolio");
/// Optional personal site or blog URL.
pub const OTHER_LINK: FieldPath = FieldPath::new("additional_links.other");
/// Location input.
pub const LOCATION: FieldPath = FieldPath::new("location");
/// Free-form self description.
pub const DESCRIPTION: FieldPath = FieldPath::new("description");
/// Optional current employer.
pub const CURRENT_COMPANY: FieldPath = FieldPath::new("current_company");
/// Years-of-experience select.
pub const EXPERIENCE: FieldPath = FieldPath::new("experience");
/// Comma-separated skills input.
pub const SKILLS: FieldPath = FieldPath::new("skills");

/// Minimum characters for the self description.
pub const DESCRIPTION_MIN: usize = 50;

/// Prefixes a LinkedIn profile URL must start with.
pub const LINKEDIN_PREFIXES: &[&str] = &["https://linkedin.com/", "https://www.linkedin.com/"];

/// Options offered by the years-of-experience select.
pub const EXPERIENCE_LEVELS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30",
];

const SKILLS_MESSAGE: &str = "Please enter at least one skill";
const EXPERIENCE_MESSAGE: &str = "Please select your years of experience";

/// Raw optional link inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkInputs {
    /// GitHub profile.
    pub github: String,
    /// Portfolio site.
    pub portfolio: String,
    /// Any other link.
    pub other: String,
}

/// Raw values of the job-seeker form; `Default` is the blank form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateValues {
    /// Full name.
    pub name: String,
    /// LinkedIn profile URL.
    pub linkedin: String,
    /// Resume or CV link.
    pub resume_link: String,
    /// Optional extra links.
    pub additional_links: LinkInputs,
    /// City and country, or "Remote".
    pub location: String,
    /// Background and what the candidate is looking for.
    pub description: String,
    /// Current employer, may be blank.
    pub current_company: String,
    /// Selected years of experience, blank until chosen.
    pub experience: String,
    /// Comma-separated skills.
    pub skills: String,
}

/// Inputs of the job-seeker form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateField {
    /// Full name.
    Name,
    /// LinkedIn profile URL.
    LinkedIn,
    /// Resume or CV link.
    ResumeLink,
    /// GitHub profile URL.
    GitHub,
    /// Portfolio URL.
    Portfolio,
    /// Other link.
    OtherLink,
    /// Location.
    Location,
    /// Self description.
    Description,
    /// Current employer.
    CurrentCompany,
    /// Years-of-experience select.
    Experience,
    /// Comma-separated skills.
    Skills,
}

impl CandidateField {
    /// Field path used for error annotations.
    pub const fn path(self) -> FieldPath {
        match self {
            Self::Name => NAME,
            Self::LinkedIn => LINKEDIN,
            Self::ResumeLink => RESUME_LINK,
            Self::GitHub => GITHUB,
            Self::Portfolio => PORTFOLIO,
            Self::OtherLink => OTHER_LINK,
            Self::Location => LOCATION,
            Self::Description => DESCRIPTION,
            Self::CurrentCompany => CURRENT_COMPANY,
            Self::Experience => EXPERIENCE,
            Self::Skills => SKILLS,
        }
    }

    fn slot(self, values: &mut CandidateValues) -> &mut String {
        match self {
            Self::Name => &mut values.name,
            Self::LinkedIn => &mut values.linkedin,
            Self::ResumeLink => &mut values.resume_link,
            Self::GitHub => &mut values.additional_links.github,
            Self::Portfolio => &mut values.additional_links.portfolio,
            Self::OtherLink => &mut values.additional_links.other,
            Self::Location => &mut values.location,
            Self::Description => &mut values.description,
            Self::CurrentCompany => &mut values.current_company,
            Self::Experience => &mut values.experience,
            Self::Skills => &mut values.skills,
        }
    }
}

/// Replace the text of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEdit {
    field: CandidateField,
    value: String,
}

impl CandidateEdit {
    /// Set `field` to `value`.
    pub fn new(field: CandidateField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Validated optional links; only non-blank inputs are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalLinks {
    github: Option<String>,
    portfolio: Option<String>,
    other: Option<String>,
}

impl AdditionalLinks {
    /// GitHub profile, if given.
    pub fn github(&self) -> Option<&str> {
        self.github.as_deref()
    }

    /// Portfolio, if given.
    pub fn portfolio(&self) -> Option<&str> {
        self.portfolio.as_deref()
    }

    /// Other link, if given.
    pub fn other(&self) -> Option<&str> {
        self.other.as_deref()
    }

    /// Whether no link was provided.
    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.portfolio.is_none() && self.other.is_none()
    }
}

/// A job-seeker application that passed every field constraint.
///
/// ## Invariants
/// - `linkedin_url` starts with one of [`LINKEDIN_PREFIXES`].
/// - `experience_years` is within `1..=30`.
/// - `skills` is non-empty and holds trimmed, non-empty entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateApplication {
    name: String,
    linkedin_url: String,
    resume_url: String,
    additional_links: AdditionalLinks,
    location: String,
    description: String,
    current_company: Option<String>,
    experience_years: u8,
    skills: Vec<String>,
}

impl CandidateApplication {
    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// LinkedIn profile URL.
    pub fn linkedin_url(&self) -> &str {
        &self.linkedin_url
    }

    /// Resume or CV link.
    pub fn resume_url(&self) -> &str {
        &self.resume_url
    }

    /// Optional extra links.
    pub fn additional_links(&self) -> &AdditionalLinks {
        &self.additional_links
    }

    /// Location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Self description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current employer, absent when left blank.
    pub fn current_company(&self) -> Option<&str> {
        self.current_company.as_deref()
    }

    /// Years of experience.
    pub fn experience_years(&self) -> u8 {
        self.experience_years
    }

    /// Skills in the order typed.
    pub fn skills(&self) -> &[String] {
        &self.skills
    }
}

/// Split a comma-separated skills input, trimming entries and dropping
/// empty segments.
///
/// # Examples
/// ```
/// use signup::domain::candidate::parse_skills;
///
/// assert_eq!(parse_skills("Go, Rust , C++"), ["Go", "Rust", "C++"]);
/// assert_eq!(parse_skills("a,,b"), ["a", "b"]);
/// assert!(parse_skills("").is_empty());
/// ```
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_owned)
        .collect()
}

fn schema() -> &'static Schema<CandidateValues> {
    static SCHEMA: OnceLock<Schema<CandidateValues>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let link_rules = [Rule::absolute_url("Must be a valid URL")];
        Schema::<CandidateValues>::new()
            .required(
                NAME,
                |values| FieldValue::Text(&values.name),
                [Rule::min_chars(2, "Full name is required")],
            )
            .required(
                LINKEDIN,
                |values| FieldValue::Text(&values.linkedin),
                [
                    Rule::absolute_url("Please enter a valid LinkedIn URL"),
                    Rule::prefix(LINKEDIN_PREFIXES, "Must be a valid LinkedIn URL"),
                ],
            )
            .required(
                RESUME_LINK,
                |values| FieldValue::Text(&values.resume_link),
                [Rule::absolute_url("Please enter a valid URL to your resume")],
            )
            .optional(
                GITHUB,
                |values| FieldValue::Text(&values.additional_links.github),
                link_rules,
            )
            .optional(
                PORTFOLIO,
                |values| FieldValue::Text(&values.additional_links.portfolio),
                link_rules,
            )
            .optional(
                OTHER_LINK,
                |values| FieldValue::Text(&values.additional_links.other),
                link_rules,
            )
            .required(
                LOCATION,
                |values| FieldValue::Text(&values.location),
                [Rule::min_chars(2, "Location is required")],
            )
            .required(
                DESCRIPTION,
                |values| FieldValue::Text(&values.description),
                [Rule::min_chars(
                    DESCRIPTION_MIN,
                    "Please provide a detailed description (at least 50 characters)",
                )],
            )
            .required(
                EXPERIENCE,
                |values| FieldValue::Text(&values.experience),
                [Rule::one_of(EXPERIENCE_LEVELS, EXPERIENCE_MESSAGE)],
            )
            .required(
                SKILLS,
                |values| FieldValue::Selection(parse_skills(&values.skills).len()),
                [Rule::min_chars(1, SKILLS_MESSAGE)],
            )
    })
}

fn single_error(field: FieldPath, kind: ErrorKind, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.push(field, FieldError::new(kind, message));
    errors
}

/// Marker type for the job-seeker form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateForm;

impl Form for CandidateForm {
    const ID: FormId = FormId::Candidate;
    const COLLECTION: Collection = Collection::Talents;

    type Values = CandidateValues;
    type Edit = CandidateEdit;
    type Record = CandidateApplication;

    fn apply(values: &mut CandidateValues, edit: CandidateEdit) -> FieldPath {
        let CandidateEdit { field, value } = edit;
        *field.slot(values) = value;
        field.path()
    }

    fn validate(values: &CandidateValues) -> Result<CandidateApplication, ValidationErrors> {
        schema().check(values).into_result(())?;

        let experience_years = values.experience.trim().parse::<u8>().map_err(|_| {
            single_error(EXPERIENCE, ErrorKind::NotSelected, EXPERIENCE_MESSAGE)
        })?;
        let links = &values.additional_links;

        Ok(CandidateApplication {
            name: values.name.trim().to_owned(),
            linkedin_url: values.linkedin.trim().to_owned(),
            resume_url: values.resume_link.trim().to_owned(),
            additional_links: AdditionalLinks {
                github: optional_text(&links.github),
                portfolio: optional_text(&links.portfolio),
                other: optional_text(&links.other),
            },
            location: values.location.trim().to_owned(),
            description: values.description.trim().to_owned(),
            current_company: optional_text(&values.current_company),
            experience_years,
            skills: parse_skills(&values.skills),
        })
    }

    fn to_row(record: &CandidateApplication) -> Result<Row, serde_json::Error> {
        rows::talent_row(record)
    }
}
