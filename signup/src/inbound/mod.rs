//! Inbound adapters that translate form state for rendering layers.
//!
//! The site's pages are drawn elsewhere; they consume [`form_view::FormView`]
//! and feed edits and submits back into a `FormSession`.

pub mod form_view;

pub use form_view::{FieldErrorView, FormView, project};
