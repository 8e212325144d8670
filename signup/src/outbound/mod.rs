//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **rest_store**: reqwest-backed `RecordStore` for the hosted REST API
//!
//! Adapters translate between domain rows and the wire format. They contain
//! no validation or retry logic.

pub mod rest_store;
