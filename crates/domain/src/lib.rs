//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (Gateway, Device)
//! - The hardware identifier deriver
//! - The paged-listing envelope
//! - Repository and command-relay interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod command;
pub mod device;
pub mod error;
pub mod gateway;
pub mod hid;
pub mod listing;

// Re-export commonly used types
pub use command::{CommandRelay, GatewayCommand};
pub use device::{Device, DeviceRepository, NewDeviceRecord};
pub use error::DomainError;
pub use gateway::{APPLICATION_HID, Gateway, GatewayRepository};
pub use listing::PaginatedListing;
