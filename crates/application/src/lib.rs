//! Application layer - use-case orchestration over the domain ports

pub mod registration;

pub use registration::{RegistrationService, ServiceSettings};
