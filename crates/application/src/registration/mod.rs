mod request;
mod response;
mod service;
mod settings;

pub use request::{
    ButtonRequest, FeedRequest, NewDeviceRequest, NewGatewayRequest, UtcOffsetRequest,
};
pub use response::{
    CredentialKey, DeviceRegistered, GatewayConfiguration, GatewayRegistered, GatewaySummary,
};
pub use service::RegistrationService;
pub use settings::ServiceSettings;
