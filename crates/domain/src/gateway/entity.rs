use serde::{Deserialize, Serialize};

/// Application/tenant identifier every gateway is registered under.
pub const APPLICATION_HID: &str = "38973487e8241ea4483e88ef8ca7934c8663dc25";

/// A physical feeder gateway known to the cloud.
///
/// `hid` is the stable hardware identifier derived from the uid the
/// hardware presented at registration; it is the primary key and never
/// changes. `uid` is provenance only and is absent when a gateway
/// self-registered through a check-in (check-ins carry the hid directly).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub hid: String,
    pub uid: Option<String>,
    pub nickname: Option<String>,
    pub application_hid: String,
    pub discovered_at: i64,
}

impl Gateway {
    pub fn new(hid: String, uid: Option<String>, discovered_at: i64) -> Self {
        Self {
            hid,
            uid,
            nickname: None,
            application_hid: APPLICATION_HID.to_string(),
            discovered_at,
        }
    }

    /// Display name: the operator-assigned nickname when present, else the hid.
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.hid)
    }
}
