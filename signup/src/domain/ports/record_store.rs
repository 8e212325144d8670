//! Driven port for inserting rows into the hosted relational backend.
//!
//! The domain addresses the store by collection name and hands over a
//! row-shaped JSON object. Adapters own transport, authentication headers and
//! response decoding; they never retry.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

/// One row keyed by column name.
pub type Row = Map<String, Value>;

/// Collections the signup forms write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Job-seeker applications.
    Talents,
    /// Investor network signups.
    Investors,
}

impl Collection {
    /// Table name exposed by the REST endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Talents => "talents",
            Self::Investors => "investors",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Errors surfaced while inserting a row.
    pub enum RecordStoreError {
        /// The request never produced a response.
        Transport { message: String } =>
            "record store transport failed: {message}",
        /// The transport gave up waiting for a response.
        Timeout { message: String } =>
            "record store timed out: {message}",
        /// The store answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "record store rejected insert with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "record store response decode failed: {message}",
    }
}

/// Port for creating rows in a named collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one row and return the rows the store reports as created.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use serde_json::json;
    ///
    /// use signup::domain::ports::{Collection, FixtureRecordStore, RecordStore};
    ///
    /// let store = FixtureRecordStore;
    /// let row = json!({ "name": "Jane Doe" }).as_object().cloned().unwrap_or_default();
    /// let created = store.insert(Collection::Talents, row).await?;
    /// assert_eq!(created.len(), 1);
    /// # Ok::<(), signup::domain::ports::RecordStoreError>(())
    /// ```
    async fn insert(&self, collection: Collection, row: Row) -> Result<Vec<Row>, RecordStoreError>;
}

/// Fixture implementation echoing the inserted row back as created.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRecordStore;

#[async_trait]
impl RecordStore for FixtureRecordStore {
    async fn insert(
        &self,
        _collection: Collection,
        row: Row,
    ) -> Result<Vec<Row>, RecordStoreError> {
        Ok(vec![row])
    }
}
