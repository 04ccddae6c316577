use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MqttConfig {
    #[serde(default = "default_mqtt_host")]
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    #[serde(default = "default_command_topic_prefix")]
    pub command_topic_prefix: String,
}

fn default_mqtt_host() -> String {
    "localhost".to_string()
}
fn default_mqtt_port() -> u16 {
    1883
}
fn default_command_topic_prefix() -> String {
    "feeder/cmd".to_string()
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            command_topic_prefix: default_command_topic_prefix(),
        }
    }
}

/// Cloud identity material handed out to gateways. Defaults match the
/// values the shipped firmware validates against.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CloudConfig {
    #[serde(default = "default_cloud_platform")]
    pub platform: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_session_token")]
    pub session_token: String,
}

fn default_cloud_platform() -> String {
    "IotConnect".to_string()
}
fn default_api_key() -> String {
    "efa2396b6f0bae3cc5fe5ef34829d60d91b96a625e55afabcea0e674f1a7ac43".to_string()
}
fn default_secret_key() -> String {
    "gEhFrm2hRvW2Km47lgt9xRBCtT9uH2Lx77WxYliNGJI=".to_string()
}
fn default_session_token() -> String {
    "pjbKBnNnas6qblrovritCihhHivY2WjFHc--S97u".to_string()
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            platform: default_cloud_platform(),
            api_key: default_api_key(),
            secret_key: default_secret_key(),
            session_token: default_session_token(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub cloud: CloudConfig,
    #[serde(default = "default_relay_timeout_secs")]
    pub relay_timeout_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://gateways.db?mode=rwc".to_string()
}
fn default_relay_timeout_secs() -> u64 {
    10
}

impl ServerConfig {
    /// Environment overrides use a `FEEDER` prefix with `__` separators,
    /// e.g. `FEEDER__MQTT__HOST=10.0.0.1` or `FEEDER__DATABASE_URL=..`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let s = Config::builder()
            .add_source(Environment::with_prefix("FEEDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.database_url, "sqlite://gateways.db?mode=rwc");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.command_topic_prefix, "feeder/cmd");
        assert_eq!(config.cloud.platform, "IotConnect");
        assert_eq!(config.relay_timeout_secs, 10);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"mqtt": {"host": "broker.local", "port": 8883}, "relay_timeout_secs": 3}"#,
        )
        .unwrap();
        assert_eq!(config.mqtt.host, "broker.local");
        assert_eq!(config.mqtt.port, 8883);
        assert_eq!(config.relay_timeout_secs, 3);
        // untouched sections keep their defaults
        assert_eq!(config.cloud.session_token.len(), 40);
    }
}
