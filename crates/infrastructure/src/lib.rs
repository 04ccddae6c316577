//! Infrastructure layer - External integrations

pub mod config;
pub mod database;
pub mod messaging;

pub use config::ServerConfig;
pub use database::{SqlxDeviceRepository, SqlxGatewayRepository};
pub use messaging::{MqttClient, MqttCommandRelay};
