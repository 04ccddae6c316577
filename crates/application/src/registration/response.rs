use serde::Serialize;

/// Outcome of a gateway registration. Both first-time and repeat
/// registrations are successes; only the message differs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayRegistered {
    pub hid: String,
    pub message: String,
    #[serde(skip)]
    pub created: bool,
}

/// Outcome of a device registration. The upstream protocol always answers
/// "already registered" for devices, so there is no created flag to carry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeviceRegistered {
    pub hid: String,
    pub links: serde_json::Value,
    pub message: String,
    /// Pseudo resource name, `arw:krn:dev:` + hid.
    pub pri: String,
}

/// Listing shape the firmware expects for a registered gateway.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySummary {
    pub hid: String,
    /// Pseudo resource name, `arw:pgs:gwy:` + hid.
    pub pri: String,
    pub application_hid: String,
    pub software_name: String,
    pub software_release_name: String,
    #[serde(rename = "type")]
    pub gateway_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialKey {
    pub api_key: String,
    pub secret_key: String,
}

/// Credential bundle handed to a gateway at config fetch. Scoped to the
/// application, not per-gateway.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfiguration {
    pub cloud_platform: String,
    pub key: CredentialKey,
}
