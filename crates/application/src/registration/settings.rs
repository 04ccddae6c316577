use std::time::Duration;

/// Static identity and credential material the service answers with.
///
/// The defaults reproduce the values the production firmware was shipped
/// against; deployments can override any of them through the server
/// configuration layer.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub cloud_platform: String,
    pub api_key: String,
    pub secret_key: String,
    /// Fixed opaque session token issued as a `JSESSIONID` cookie on every
    /// successful response. Legacy behavior kept for firmware
    /// compatibility; the value carries no session state.
    pub session_token: String,
    /// Upper bound on a single command-relay call.
    pub relay_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cloud_platform: "IotConnect".to_string(),
            api_key: "efa2396b6f0bae3cc5fe5ef34829d60d91b96a625e55afabcea0e674f1a7ac43"
                .to_string(),
            secret_key: "gEhFrm2hRvW2Km47lgt9xRBCtT9uH2Lx77WxYliNGJI=".to_string(),
            session_token: "pjbKBnNnas6qblrovritCihhHivY2WjFHc--S97u".to_string(),
            relay_timeout: Duration::from_secs(10),
        }
    }
}
