//! Hosted REST record store adapter.
//!
//! This module provides a thin HTTP implementation of the `RecordStore`
//! port against a PostgREST-style `/rest/v1/{collection}` endpoint.

mod http_store;

pub use http_store::{RestRecordStore, RestStoreBuildError};
