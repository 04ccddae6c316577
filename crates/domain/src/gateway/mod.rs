mod entity;
mod repository;

pub use entity::{APPLICATION_HID, Gateway};
pub use repository::GatewayRepository;
