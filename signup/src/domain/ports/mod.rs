//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_relay;
mod record_store;

#[cfg(test)]
pub use notification_relay::MockNotificationRelay;
pub use notification_relay::NotificationRelay;
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{Collection, FixtureRecordStore, RecordStore, RecordStoreError, Row};
