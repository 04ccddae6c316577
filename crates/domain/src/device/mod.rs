mod entity;
mod repository;

pub use entity::{Device, NewDeviceRecord};
pub use repository::DeviceRepository;
