use serde::Deserialize;

/// Body of a gateway registration.
///
/// Example: `{"name":"SF Gateway","uid":"smartfeeder-795ae773737d",
/// "osName":"FreeRTOS","type":"Local","softwareName":"SMART FEEDER",
/// "softwareVersion":"2.8.0","sdkVersion":"1.3.12"}`
///
/// Only `uid` is required; everything else is descriptive and optional so
/// firmware variations with sparse payloads still register.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGatewayRequest {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub os_name: Option<String>,
    #[serde(rename = "type")]
    pub gateway_type: Option<String>,
    pub software_name: Option<String>,
    pub software_version: Option<String>,
    pub sdk_version: Option<String>,
}

/// Body of a device registration.
///
/// Example: `{"name":"SF20A","type":"SMART FEEDER",
/// "uid":"smartfeeder-4b09fa082bbd-prod",
/// "gatewayHid":"d48d71fb4478ed189b37699ac1ea665fbed5a577",
/// "softwareName":"SMART FEEDER","softwareVersion":"2.8.0"}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeviceRequest {
    pub uid: Option<String>,
    pub gateway_hid: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub software_name: Option<String>,
    pub software_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ButtonRequest {
    pub enable: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedRequest {
    pub portion: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UtcOffsetRequest {
    pub utc_offset: Option<i32>,
}

impl ButtonRequest {
    pub fn enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }
}

impl FeedRequest {
    /// Default pour is one sixteenth of a cup.
    pub fn portion(&self) -> f64 {
        self.portion.unwrap_or(0.0625)
    }
}

impl UtcOffsetRequest {
    /// Default matches the hardware's factory Pacific-time offset.
    pub fn offset(&self) -> i32 {
        self.utc_offset.unwrap_or(-7)
    }
}
