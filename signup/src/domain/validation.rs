//! Declarative field validation shared by both signup forms.
//!
//! A [`Schema`] maps each field path to an ordered list of [`Rule`]s. Every
//! field is read from the raw form values, every rule is evaluated
//! independently, and all failures are collected into one
//! [`ValidationErrors`] so the caller can show them together.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use url::Url;

/// Dotted path naming one form field, e.g. `additional_links.github`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(&'static str);

impl FieldPath {
    /// Wrap a static field path.
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    /// Borrow the path text.
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Category of a failed field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Text shorter than the declared minimum (counted in characters).
    TooShort {
        /// Declared minimum length.
        min: usize,
    },
    /// Not a well-formed absolute URL.
    InvalidUrl,
    /// URL does not start with any accepted prefix.
    DomainMismatch,
    /// Enumeration left empty or set to an unknown value.
    NotSelected,
    /// Multi-select field with nothing selected.
    EmptySelection,
}

impl ErrorKind {
    /// Stable machine-readable code for adapters.
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::InvalidUrl => "invalid_url",
            Self::DomainMismatch => "domain_mismatch",
            Self::NotSelected => "not_selected",
            Self::EmptySelection => "empty_selection",
        }
    }
}

/// One failed constraint with the message shown beneath the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    kind: ErrorKind,
    message: &'static str,
}

impl FieldError {
    /// Build an error from its kind and user-facing message.
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// Failure category.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message.
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Field-level errors collected from one validation pass.
///
/// ## Invariants
/// - A field present in the map has at least one error.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct ValidationErrors {
    fields: BTreeMap<FieldPath, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error against `field`.
    pub fn push(&mut self, field: FieldPath, error: FieldError) {
        self.fields.entry(field).or_default().push(error);
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Errors recorded for `field`, in rule order.
    pub fn get(&self, field: FieldPath) -> &[FieldError] {
        self.fields
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Error kinds recorded for `field`, in rule order.
    pub fn kinds(&self, field: FieldPath) -> Vec<ErrorKind> {
        self.get(field).iter().map(FieldError::kind).collect()
    }

    /// Iterate failing fields and their errors in path order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &[FieldError])> {
        self.fields
            .iter()
            .map(|(path, errors)| (*path, errors.as_slice()))
    }

    /// Drop every error recorded for `field`.
    pub fn clear_field(&mut self, field: FieldPath) {
        self.fields.remove(&field);
    }

    /// Return `value` when nothing failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Raw value of one field as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Free text, select value, or URL input.
    Text(&'a str),
    /// Number of options checked in a multi-select.
    Selection(usize),
}

impl FieldValue<'_> {
    fn is_blank(self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Selection(count) => count == 0,
        }
    }
}

/// Declarative predicate over one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Trimmed text (or selection count) reaches the minimum.
    MinChars(usize),
    /// Parses as an absolute URL with a host.
    AbsoluteUrl,
    /// Starts with one of the listed prefixes.
    Prefix(&'static [&'static str]),
    /// Equals one of the listed options.
    OneOf(&'static [&'static str]),
    /// At least one option selected.
    NonEmpty,
}

impl Constraint {
    const fn kind(self) -> ErrorKind {
        match self {
            Self::MinChars(min) => ErrorKind::TooShort { min },
            Self::AbsoluteUrl => ErrorKind::InvalidUrl,
            Self::Prefix(_) => ErrorKind::DomainMismatch,
            Self::OneOf(_) => ErrorKind::NotSelected,
            Self::NonEmpty => ErrorKind::EmptySelection,
        }
    }

    fn holds(self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Self::MinChars(min), FieldValue::Text(text)) => text.trim().chars().count() >= min,
            (Self::MinChars(min), FieldValue::Selection(count)) => count >= min,
            (Self::AbsoluteUrl, FieldValue::Text(text)) => is_absolute_url(text),
            (Self::Prefix(prefixes), FieldValue::Text(text)) => {
                let trimmed = text.trim();
                prefixes.iter().any(|prefix| trimmed.starts_with(prefix))
            }
            (Self::OneOf(options), FieldValue::Text(text)) => {
                let trimmed = text.trim();
                options.iter().any(|option| *option == trimmed)
            }
            (Self::NonEmpty, value) => !value.is_blank(),
            (Self::AbsoluteUrl | Self::Prefix(_) | Self::OneOf(_), FieldValue::Selection(_)) => {
                false
            }
        }
    }
}

/// Whether `text` is a well-formed absolute URL with a host.
pub fn is_absolute_url(text: &str) -> bool {
    Url::parse(text.trim()).is_ok_and(|url| url.has_host())
}

/// Trim `raw`, treating a blank value as absent.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// A constraint paired with the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    constraint: Constraint,
    message: &'static str,
}

impl Rule {
    /// Pair an arbitrary constraint with its message.
    pub const fn new(constraint: Constraint, message: &'static str) -> Self {
        Self {
            constraint,
            message,
        }
    }

    /// Shorthand for [`Constraint::MinChars`].
    pub const fn min_chars(min: usize, message: &'static str) -> Self {
        Self::new(Constraint::MinChars(min), message)
    }

    /// Shorthand for [`Constraint::AbsoluteUrl`].
    pub const fn absolute_url(message: &'static str) -> Self {
        Self::new(Constraint::AbsoluteUrl, message)
    }

    /// Shorthand for [`Constraint::Prefix`].
    pub const fn prefix(prefixes: &'static [&'static str], message: &'static str) -> Self {
        Self::new(Constraint::Prefix(prefixes), message)
    }

    /// Shorthand for [`Constraint::OneOf`].
    pub const fn one_of(options: &'static [&'static str], message: &'static str) -> Self {
        Self::new(Constraint::OneOf(options), message)
    }

    /// Shorthand for [`Constraint::NonEmpty`].
    pub const fn non_empty(message: &'static str) -> Self {
        Self::new(Constraint::NonEmpty, message)
    }

    const fn error(&self) -> FieldError {
        FieldError::new(self.constraint.kind(), self.message)
    }
}

/// Whether a blank value skips a field's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// Reads one field out of the raw form values.
pub type FieldReader<V> = for<'a> fn(&'a V) -> FieldValue<'a>;

struct FieldSpec<V> {
    path: FieldPath,
    presence: Presence,
    read: FieldReader<V>,
    rules: Vec<Rule>,
}

/// Field → ordered rule list for one form's raw values.
pub struct Schema<V> {
    fields: Vec<FieldSpec<V>>,
}

impl<V> Default for Schema<V> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<V> Schema<V> {
    /// Start an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field whose rules always run.
    #[must_use]
    pub fn required(
        self,
        path: FieldPath,
        read: FieldReader<V>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.field(path, Presence::Required, read, rules)
    }

    /// Declare a field whose rules are skipped when the value is blank.
    #[must_use]
    pub fn optional(
        self,
        path: FieldPath,
        read: FieldReader<V>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.field(path, Presence::Optional, read, rules)
    }

    fn field(
        mut self,
        path: FieldPath,
        presence: Presence,
        read: FieldReader<V>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSpec {
            path,
            presence,
            read,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Evaluate every rule of every field and collect the failures.
    pub fn check(&self, values: &V) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            let value = (field.read)(values);
            if field.presence == Presence::Optional && value.is_blank() {
                continue;
            }
            for rule in &field.rules {
                if !rule.constraint.holds(value) {
                    errors.push(field.path, rule.error());
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    //! Rule evaluation and aggregation coverage.

    use super::*;
    use rstest::{fixture, rstest};

    const TITLE: FieldPath = FieldPath::new("title");
    const HOMEPAGE: FieldPath = FieldPath::new("homepage");
    const COLOUR: FieldPath = FieldPath::new("colour");
    const TAGS: FieldPath = FieldPath::new("tags");

    const COLOURS: &[&str] = &["red", "green"];
    const EXAMPLE_PREFIXES: &[&str] = &["https://example.com/"];

    #[derive(Debug, Default)]
    struct Sample {
        title: String,
        homepage: String,
        colour: String,
        tags: Vec<String>,
    }

    #[fixture]
    fn schema() -> Schema<Sample> {
        Schema::<Sample>::new()
            .required(
                TITLE,
                |sample| FieldValue::Text(&sample.title),
                [Rule::min_chars(3, "Title is required")],
            )
            .optional(
                HOMEPAGE,
                |sample| FieldValue::Text(&sample.homepage),
                [
                    Rule::absolute_url("Must be a valid URL"),
                    Rule::prefix(EXAMPLE_PREFIXES, "Must be an example.com URL"),
                ],
            )
            .required(
                COLOUR,
                |sample| FieldValue::Text(&sample.colour),
                [Rule::one_of(COLOURS, "Pick a colour")],
            )
            .required(
                TAGS,
                |sample| FieldValue::Selection(sample.tags.len()),
                [Rule::non_empty("Pick at least one tag")],
            )
    }

    fn valid_sample() -> Sample {
        Sample {
            title: "Launch".to_owned(),
            homepage: String::new(),
            colour: "red".to_owned(),
            tags: vec!["news".to_owned()],
        }
    }

    #[rstest]
    fn valid_values_produce_no_errors(schema: Schema<Sample>) {
        assert!(schema.check(&valid_sample()).is_empty());
    }

    #[rstest]
    fn reports_every_failing_field_at_once(schema: Schema<Sample>) {
        let errors = schema.check(&Sample::default());

        assert_eq!(errors.field_count(), 3);
        assert_eq!(errors.kinds(TITLE), vec![ErrorKind::TooShort { min: 3 }]);
        assert_eq!(errors.kinds(COLOUR), vec![ErrorKind::NotSelected]);
        assert_eq!(errors.kinds(TAGS), vec![ErrorKind::EmptySelection]);
        assert!(errors.get(HOMEPAGE).is_empty(), "blank optional field is skipped");
    }

    #[rstest]
    #[case("ab", false)]
    #[case("  ab  ", false)]
    #[case("abc", true)]
    #[case("déjà", true)]
    fn min_chars_counts_trimmed_characters(
        schema: Schema<Sample>,
        #[case] title: &str,
        #[case] accepted: bool,
    ) {
        let sample = Sample {
            title: title.to_owned(),
            ..valid_sample()
        };
        assert_eq!(schema.check(&sample).get(TITLE).is_empty(), accepted);
    }

    #[rstest]
    #[case("not a url", vec![ErrorKind::InvalidUrl, ErrorKind::DomainMismatch])]
    #[case("https://other.org/page", vec![ErrorKind::DomainMismatch])]
    #[case("https://example.com/page", vec![])]
    fn url_predicates_are_evaluated_independently(
        schema: Schema<Sample>,
        #[case] homepage: &str,
        #[case] expected: Vec<ErrorKind>,
    ) {
        let sample = Sample {
            homepage: homepage.to_owned(),
            ..valid_sample()
        };
        assert_eq!(schema.check(&sample).kinds(HOMEPAGE), expected);
    }

    #[rstest]
    fn unknown_option_is_not_selected(schema: Schema<Sample>) {
        let sample = Sample {
            colour: "purple".to_owned(),
            ..valid_sample()
        };
        assert_eq!(schema.check(&sample).kinds(COLOUR), vec![ErrorKind::NotSelected]);
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://localhost:8080/x", true)]
    #[case("example.com", false)]
    #[case("mailto:jane@example.com", false)]
    #[case("", false)]
    fn absolute_url_requires_scheme_and_host(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_absolute_url(input), expected);
    }

    #[test]
    fn clear_field_drops_only_that_field() {
        let mut errors = ValidationErrors::new();
        errors.push(TITLE, FieldError::new(ErrorKind::TooShort { min: 3 }, "short"));
        errors.push(COLOUR, FieldError::new(ErrorKind::NotSelected, "pick"));

        errors.clear_field(TITLE);

        assert_eq!(errors.field_count(), 1);
        assert_eq!(errors.to_string(), "1 field(s) failed validation");
        assert!(errors.into_result(()).is_err());
    }
}
