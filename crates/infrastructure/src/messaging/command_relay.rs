use crate::messaging::mqtt_client::MqttClient;
use async_trait::async_trait;
use domain::command::{CommandRelay, GatewayCommand};
use serde_json::json;
use tracing::debug;

/// Delivers operator commands to feeder hardware over MQTT.
///
/// One JSON document per command, published to
/// `<prefix>/<gateway_id>`. Delivery beyond the broker handoff is the
/// hardware's concern.
pub struct MqttCommandRelay {
    client: MqttClient,
    topic_prefix: String,
}

impl MqttCommandRelay {
    pub fn new(client: MqttClient, topic_prefix: impl Into<String>) -> Self {
        Self {
            client,
            topic_prefix: topic_prefix.into(),
        }
    }

    fn payload(command: &GatewayCommand) -> serde_json::Value {
        match command {
            GatewayCommand::Button { enabled } => json!({
                "command": "button",
                "enable": enabled,
            }),
            GatewayCommand::Reboot => json!({
                "command": "reboot",
            }),
            GatewayCommand::Feed { portion } => json!({
                "command": "feed",
                "portion": portion,
            }),
            GatewayCommand::UtcOffset { offset } => json!({
                "command": "utc_offset",
                "utc_offset": offset,
            }),
        }
    }
}

#[async_trait]
impl CommandRelay for MqttCommandRelay {
    async fn send(
        &self,
        gateway_id: &str,
        command: GatewayCommand,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let topic = format!("{}/{}", self.topic_prefix, gateway_id);
        let payload = Self::payload(&command);
        debug!("relaying command to {topic}: {payload}");
        self.client
            .publish(&topic, &payload.to_string(), false)
            .await
            .map_err(Into::into)
    }
}
