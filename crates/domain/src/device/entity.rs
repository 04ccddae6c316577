use serde::{Deserialize, Serialize};

/// A feeder device attached to a gateway.
///
/// Every device references exactly one existing gateway; the registration
/// service checks the parent before creation, so devices are never
/// orphaned by construction. There is no delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub hid: String,
    pub uid: String,
    pub gateway_hid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub software_name: String,
    pub software_version: String,
    pub discovered_at: i64,
    pub last_pinged_at: i64,
}

/// Descriptive attributes captured when a device first registers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDeviceRecord {
    pub uid: String,
    pub gateway_hid: String,
    pub name: String,
    pub device_type: String,
    pub software_name: String,
    pub software_version: String,
}

impl Device {
    pub fn from_record(hid: String, record: NewDeviceRecord, discovered_at: i64) -> Self {
        Self {
            hid,
            uid: record.uid,
            gateway_hid: record.gateway_hid,
            name: record.name,
            device_type: record.device_type,
            software_name: record.software_name,
            software_version: record.software_version,
            discovered_at,
            last_pinged_at: discovered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_record_captures_attributes_and_timestamps() {
        let record = NewDeviceRecord {
            uid: "smartfeeder-4b09fa082bbd-prod".to_string(),
            gateway_hid: "d48d71fb4478ed189b37699ac1ea665fbed5a577".to_string(),
            name: "SF20A".to_string(),
            device_type: "SMART FEEDER".to_string(),
            software_name: "SMART FEEDER".to_string(),
            software_version: "2.8.0".to_string(),
        };
        let device = Device::from_record("deadbeef".to_string(), record, 1700000000);
        assert_eq!(device.hid, "deadbeef");
        assert_eq!(device.gateway_hid, "d48d71fb4478ed189b37699ac1ea665fbed5a577");
        assert_eq!(device.discovered_at, 1700000000);
        assert_eq!(device.last_pinged_at, 1700000000);
    }

    #[test]
    fn serializes_type_field_without_rust_keyword_clash() {
        let device = Device::from_record(
            "deadbeef".to_string(),
            NewDeviceRecord {
                device_type: "SMART FEEDER".to_string(),
                ..Default::default()
            },
            0,
        );
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "SMART FEEDER");
        assert_eq!(json["gatewayHid"], "");
    }
}
