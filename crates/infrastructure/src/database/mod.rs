mod device_repository;
mod gateway_repository;

pub use device_repository::SqlxDeviceRepository;
pub use gateway_repository::SqlxGatewayRepository;
