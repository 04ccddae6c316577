pub mod command_relay;
pub mod mqtt_client;

pub use command_relay::MqttCommandRelay;
pub use mqtt_client::MqttClient;
