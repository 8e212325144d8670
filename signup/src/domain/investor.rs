//! Investor network signup form.
//!
//! The investor type and stage arrive as select values, interest areas as a
//! set of toggled checkboxes. The contact URL accepts any `http(s)` URL; a
//! LinkedIn profile is preferred but not enforced.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use super::candidate::LINKEDIN_PREFIXES;
use super::form::{Form, FormId};
use super::ports::{Collection, Row};
use super::submission::rows;
use super::validation::{
    ErrorKind, FieldError, FieldPath, FieldValue, Rule, Schema, ValidationErrors, optional_text,
};

/// Investor or contact name.
pub const NAME: FieldPath = FieldPath::new("name");
/// Optional firm name.
pub const ASSOCIATED_FIRM: FieldPath = FieldPath::new("associated_firm");
/// Investor type select.
pub const INVESTOR_TYPE: FieldPath = FieldPath::new("investor_type");
/// Investment stage select.
pub const STAGE: FieldPath = FieldPath::new("stage");
/// Interest area checkboxes.
pub const INTEREST_AREAS: FieldPath = FieldPath::new("interest_areas");
/// Optional location.
pub const LOCATION: FieldPath = FieldPath::new("location");
/// LinkedIn profile or website.
pub const CONTACT_URL: FieldPath = FieldPath::new("contact_url");
/// Match notification opt-in.
pub const NOTIFY_MATCHES: FieldPath = FieldPath::new("notify_matches");

/// Prefixes accepted for the contact URL.
pub const CONTACT_PREFIXES: &[&str] = &[
    "https://linkedin.com/",
    "https://www.linkedin.com/",
    "http://",
    "https://",
];

const INVESTOR_TYPE_NAMES: &[&str] = &["VC", "Angel", "Accelerator", "Syndicate"];
const STAGE_NAMES: &[&str] = &["PreSeed", "Seed", "SeriesA", "SeriesB"];
const INVESTOR_TYPE_MESSAGE: &str = "Please select an investor type";
const STAGE_MESSAGE: &str = "Please select a stage";

/// Kind of investor signing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InvestorType {
    /// Venture capital firm.
    #[serde(rename = "VC")]
    Vc,
    /// Angel investor.
    Angel,
    /// Accelerator programme.
    Accelerator,
    /// Syndicate lead.
    Syndicate,
}

impl InvestorType {
    /// Every option, in select order.
    pub const ALL: [Self; 4] = [Self::Vc, Self::Angel, Self::Accelerator, Self::Syndicate];

    /// Stored value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vc => "VC",
            Self::Angel => "Angel",
            Self::Accelerator => "Accelerator",
            Self::Syndicate => "Syndicate",
        }
    }

    /// Look up an option by its stored value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

/// Stage an investor writes cheques at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    /// Pre-seed.
    PreSeed,
    /// Seed.
    Seed,
    /// Series A.
    SeriesA,
    /// Series B.
    SeriesB,
}

impl Stage {
    /// Every option, in select order.
    pub const ALL: [Self; 4] = [Self::PreSeed, Self::Seed, Self::SeriesA, Self::SeriesB];

    /// Stored value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreSeed => "PreSeed",
            Self::Seed => "Seed",
            Self::SeriesA => "SeriesA",
            Self::SeriesB => "SeriesB",
        }
    }

    /// Look up an option by its stored value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == value)
    }
}

macro_rules! interest_areas {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Sector an investor wants to hear about.
        ///
        /// Ordering follows declaration order, so a set of areas serialises
        /// in the order the checkboxes are laid out.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum InterestArea {
            $(
                #[doc = $name]
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl InterestArea {
            /// Every category, in checkbox order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Stored value.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

interest_areas! {
    Ai => "AI",
    Saas => "Saas",
    Infrastructure => "Infrastructure",
    Consumer => "Consumer",
    EnterpriseTech => "EnterpriseTech",
    Agriculture => "Agriculture",
    Space => "Space",
    DeepTech => "DeepTech",
    Robotics => "Robotics",
    Healthcare => "Healthcare",
    FinTech => "FinTech",
    Automotive => "Automotive",
    EdTech => "EdTech",
    Blockchain => "Blockchain",
    SupplyChain => "SupplyChain",
    Entertainment => "Entertainment",
    CyberSecurity => "CyberSecurity",
    Climate => "Climate",
    Marketplace => "Marketplace",
    Research => "Research",
    Automation => "Automation",
    Mobility => "Mobility",
    SocialMedia => "SocialMedia",
    Other => "Other",
}

impl InterestArea {
    /// Look up a category by its stored value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|area| area.as_str() == value)
    }
}

impl fmt::Display for InterestArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values of the investor form; `Default` is the blank form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvestorValues {
    /// Investor or contact name.
    pub name: String,
    /// Firm, may be blank.
    pub associated_firm: String,
    /// Selected investor type, blank until chosen.
    pub investor_type: String,
    /// Selected stage, blank until chosen.
    pub stage: String,
    /// Checked interest areas.
    pub interest_areas: BTreeSet<InterestArea>,
    /// Location, may be blank.
    pub location: String,
    /// LinkedIn profile or website.
    pub contact_url: String,
    /// Opt-in for AI-recommended match alerts.
    pub notify_matches: bool,
}

/// One user edit on the investor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestorEdit {
    /// Replace the name.
    Name(String),
    /// Replace the firm.
    AssociatedFirm(String),
    /// Choose an investor type by stored value.
    InvestorType(String),
    /// Choose a stage by stored value.
    Stage(String),
    /// Check or uncheck one interest area.
    ToggleInterest {
        /// Area whose checkbox changed.
        area: InterestArea,
        /// New checkbox state.
        checked: bool,
    },
    /// Replace the location.
    Location(String),
    /// Replace the contact URL.
    ContactUrl(String),
    /// Set the match notification opt-in.
    NotifyMatches(bool),
}

/// An investor signup that passed every field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestorProfile {
    name: String,
    associated_firm: Option<String>,
    investor_type: InvestorType,
    stage: Stage,
    interest_areas: BTreeSet<InterestArea>,
    location: Option<String>,
    contact_url: String,
    notify_matches: bool,
}

impl InvestorProfile {
    /// Investor or contact name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Firm, absent when left blank.
    pub fn associated_firm(&self) -> Option<&str> {
        self.associated_firm.as_deref()
    }

    /// Investor type.
    pub fn investor_type(&self) -> InvestorType {
        self.investor_type
    }

    /// Investment stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Checked interest areas; never empty.
    pub fn interest_areas(&self) -> &BTreeSet<InterestArea> {
        &self.interest_areas
    }

    /// Location, absent when left blank.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// LinkedIn profile or website.
    pub fn contact_url(&self) -> &str {
        &self.contact_url
    }

    /// Whether match alerts were requested.
    pub fn notify_matches(&self) -> bool {
        self.notify_matches
    }

    /// Whether the contact URL is a LinkedIn profile.
    pub fn has_linkedin_contact(&self) -> bool {
        LINKEDIN_PREFIXES
            .iter()
            .any(|prefix| self.contact_url.starts_with(prefix))
    }
}

fn schema() -> &'static Schema<InvestorValues> {
    static SCHEMA: OnceLock<Schema<InvestorValues>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::<InvestorValues>::new()
            .required(
                NAME,
                |values| FieldValue::Text(&values.name),
                [Rule::min_chars(2, "Name is required")],
            )
            .required(
                INVESTOR_TYPE,
                |values| FieldValue::Text(&values.investor_type),
                [Rule::one_of(INVESTOR_TYPE_NAMES, INVESTOR_TYPE_MESSAGE)],
            )
            .required(
                STAGE,
                |values| FieldValue::Text(&values.stage),
                [Rule::one_of(STAGE_NAMES, STAGE_MESSAGE)],
            )
            .required(
                INTEREST_AREAS,
                |values| FieldValue::Selection(values.interest_areas.len()),
                [Rule::non_empty("Please select at least one area")],
            )
            .required(
                CONTACT_URL,
                |values| FieldValue::Text(&values.contact_url),
                [
                    Rule::absolute_url("Please enter a valid URL"),
                    Rule::prefix(
                        CONTACT_PREFIXES,
                        "Please enter a valid LinkedIn or website URL",
                    ),
                ],
            )
    })
}

fn not_selected(field: FieldPath, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.push(field, FieldError::new(ErrorKind::NotSelected, message));
    errors
}

/// Marker type for the investor form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvestorForm;

impl Form for InvestorForm {
    const ID: FormId = FormId::Investor;
    const COLLECTION: Collection = Collection::Investors;

    type Values = InvestorValues;
    type Edit = InvestorEdit;
    type Record = InvestorProfile;

    fn apply(values: &mut InvestorValues, edit: InvestorEdit) -> FieldPath {
        match edit {
            InvestorEdit::Name(name) => {
                values.name = name;
                NAME
            }
            InvestorEdit::AssociatedFirm(firm) => {
                values.associated_firm = firm;
                ASSOCIATED_FIRM
            }
            InvestorEdit::InvestorType(investor_type) => {
                values.investor_type = investor_type;
                INVESTOR_TYPE
            }
            InvestorEdit::Stage(stage) => {
                values.stage = stage;
                STAGE
            }
            InvestorEdit::ToggleInterest { area, checked } => {
                if checked {
                    values.interest_areas.insert(area);
                } else {
                    values.interest_areas.remove(&area);
                }
                INTEREST_AREAS
            }
            InvestorEdit::Location(location) => {
                values.location = location;
                LOCATION
            }
            InvestorEdit::ContactUrl(url) => {
                values.contact_url = url;
                CONTACT_URL
            }
            InvestorEdit::NotifyMatches(notify) => {
                values.notify_matches = notify;
                NOTIFY_MATCHES
            }
        }
    }

    fn validate(values: &InvestorValues) -> Result<InvestorProfile, ValidationErrors> {
        schema().check(values).into_result(())?;

        let investor_type = InvestorType::parse(values.investor_type.trim())
            .ok_or_else(|| not_selected(INVESTOR_TYPE, INVESTOR_TYPE_MESSAGE))?;
        let stage = Stage::parse(values.stage.trim())
            .ok_or_else(|| not_selected(STAGE, STAGE_MESSAGE))?;

        Ok(InvestorProfile {
            name: values.name.trim().to_owned(),
            associated_firm: optional_text(&values.associated_firm),
            investor_type,
            stage,
            interest_areas: values.interest_areas.clone(),
            location: optional_text(&values.location),
            contact_url: values.contact_url.trim().to_owned(),
            notify_matches: values.notify_matches,
        })
    }

    fn to_row(record: &InvestorProfile) -> Result<Row, serde_json::Error> {
        rows::investor_row(record)
    }
}
