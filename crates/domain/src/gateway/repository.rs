use super::Gateway;
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for Gateway persistence
///
/// Implementations live in the infrastructure layer. `get_or_create` must
/// guarantee at-most-one record per `hid` even under concurrent callers;
/// the expected enforcement is a storage-level unique key, not an
/// application lock.
#[async_trait]
pub trait GatewayRepository: Send + Sync {
    /// Return the gateway for `hid`, creating it first if absent.
    /// The boolean is true when this call created the record.
    async fn get_or_create(
        &self,
        hid: &str,
        uid: Option<&str>,
    ) -> Result<(Gateway, bool), DomainError>;

    /// Lookup by primary key.
    async fn find_by_hid(&self, hid: &str) -> Result<Option<Gateway>, DomainError>;

    /// All gateways in insertion order.
    async fn find_all(&self) -> Result<Vec<Gateway>, DomainError>;
}
