//! Lead-capture forms for the Superfounder site.
//!
//! The crate owns the decision logic behind the two signup forms: schema
//! validation, the per-form state machine, the single-insert submission
//! adapter, and the notices shown after each submission. Rendering, routing
//! and the landing page live elsewhere; they consume [`inbound::FormView`].
//!
//! The layout follows a ports-and-adapters split:
//!
//! - [`domain`] holds the forms, validation and orchestration, and declares
//!   the ports it drives.
//! - [`outbound`] implements the record store port over the hosted REST API.
//! - [`inbound`] projects form state for rendering adapters.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use config::{RecordStoreSettings, SettingsError};
pub use domain::{
    CandidateForm, FormSession, InvestorForm, NoticeBoard, SubmissionAdapter, SubmissionOutcome,
};
