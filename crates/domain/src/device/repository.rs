use super::{Device, NewDeviceRecord};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for Device persistence
///
/// Same idempotency contract as [`crate::gateway::GatewayRepository`],
/// scoped by device `hid`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Return the device for `hid`, creating it from `record` if absent.
    /// The boolean is true when this call created the record.
    async fn get_or_create(
        &self,
        hid: &str,
        record: NewDeviceRecord,
    ) -> Result<(Device, bool), DomainError>;

    /// Lookup by primary key.
    async fn find_by_hid(&self, hid: &str) -> Result<Option<Device>, DomainError>;

    /// Devices owned by a gateway, insertion order.
    async fn find_by_gateway(&self, gateway_hid: &str) -> Result<Vec<Device>, DomainError>;

    /// All devices in insertion order.
    async fn find_all(&self) -> Result<Vec<Device>, DomainError>;

    /// Refresh `last_pinged_at` to the current time.
    async fn record_ping(&self, hid: &str) -> Result<(), DomainError>;
}
