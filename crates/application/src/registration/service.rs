use std::future::Future;
use std::sync::Arc;

use domain::{
    CommandRelay, Device, DomainError, Gateway, GatewayRepository, PaginatedListing, hid,
};
use domain::device::{DeviceRepository, NewDeviceRecord};
use serde_json::json;
use tracing::{debug, info, warn};

use super::request::{
    ButtonRequest, FeedRequest, NewDeviceRequest, NewGatewayRequest, UtcOffsetRequest,
};
use super::response::{
    CredentialKey, DeviceRegistered, GatewayConfiguration, GatewayRegistered, GatewaySummary,
};
use super::settings::ServiceSettings;

const SOFTWARE_NAME: &str = "SMART FEEDER";

/// Orchestrates gateway/device registration, check-in, config fetch, and
/// command dispatch against the repository and relay ports.
///
/// All shared mutable state lives behind the repositories; the service
/// itself holds only immutable handles and settings, so one instance is
/// shared across concurrent requests.
pub struct RegistrationService {
    gateways: Arc<dyn GatewayRepository>,
    devices: Arc<dyn DeviceRepository>,
    relay: Arc<dyn CommandRelay>,
    settings: ServiceSettings,
}

impl RegistrationService {
    pub fn new(
        gateways: Arc<dyn GatewayRepository>,
        devices: Arc<dyn DeviceRepository>,
        relay: Arc<dyn CommandRelay>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            gateways,
            devices,
            relay,
            settings,
        }
    }

    /// Opaque token the HTTP layer issues as a session cookie.
    pub fn session_token(&self) -> &str {
        &self.settings.session_token
    }

    /// Register a gateway, or recognize one already registered.
    ///
    /// Idempotent per derived hid: the first call creates the record, every
    /// later call with the same uid answers "already registered" with the
    /// identical hid.
    pub async fn register_gateway(
        &self,
        request: NewGatewayRequest,
    ) -> Result<GatewayRegistered, DomainError> {
        let uid = required(request.uid.as_deref(), "uid")?;
        let gateway_hid = hid::derive_gateway_hid(uid);

        let (gateway, created) = self.gateways.get_or_create(&gateway_hid, Some(uid)).await?;
        if created {
            info!("registered new gateway {}", gateway.hid);
            Ok(GatewayRegistered {
                hid: gateway.hid,
                message: "OK".to_string(),
                created: true,
            })
        } else {
            info!("gateway {} attempted re-registration", gateway.hid);
            Ok(GatewayRegistered {
                hid: gateway.hid,
                message: "gateway is already registered".to_string(),
                created: false,
            })
        }
    }

    /// Register a device under an existing gateway.
    ///
    /// The parent gateway must exist; a device is never created without
    /// one. The response always reads "already registered" regardless of
    /// whether this call created the record, which is what the firmware's
    /// SDK expects.
    pub async fn register_device(
        &self,
        request: NewDeviceRequest,
    ) -> Result<DeviceRegistered, DomainError> {
        let gateway_hid = required(request.gateway_hid.as_deref(), "gatewayHid")?.to_string();
        let uid = required(request.uid.as_deref(), "uid")?.to_string();

        if self.gateways.find_by_hid(&gateway_hid).await?.is_none() {
            warn!("device registration names unknown gateway {gateway_hid}");
            return Err(DomainError::NotFound(format!(
                "gateway {gateway_hid} does not exist"
            )));
        }

        let device_hid = hid::derive_device_hid(&uid);
        let record = NewDeviceRecord {
            uid,
            gateway_hid,
            name: request.name.unwrap_or_default(),
            device_type: request.device_type.unwrap_or_default(),
            software_name: request.software_name.unwrap_or_default(),
            software_version: request.software_version.unwrap_or_default(),
        };

        let (device, created) = self.devices.get_or_create(&device_hid, record).await?;
        if created {
            info!("registered new device {} under {}", device.hid, device.gateway_hid);
        } else {
            self.devices.record_ping(&device.hid).await?;
        }

        Ok(DeviceRegistered {
            pri: format!("arw:krn:dev:{}", device.hid),
            hid: device.hid,
            links: json!({}),
            message: "device is already registered".to_string(),
        })
    }

    /// Gateway check-in. An unknown hid silently registers itself; the
    /// firmware checks in with the hid it was handed at registration.
    pub async fn check_in(&self, gateway_hid: &str) -> Result<(), DomainError> {
        let (gateway, created) = self.gateways.get_or_create(gateway_hid, None).await?;
        info!("gateway {} just checked in! created={created}", gateway.name());
        Ok(())
    }

    /// Credential bundle for a registered gateway.
    pub async fn fetch_config(&self, gateway_hid: &str) -> Result<GatewayConfiguration, DomainError> {
        let gateway = self.require_gateway(gateway_hid).await?;
        debug!("serving config to gateway {}", gateway.name());
        Ok(GatewayConfiguration {
            cloud_platform: self.settings.cloud_platform.clone(),
            key: CredentialKey {
                api_key: self.settings.api_key.clone(),
                secret_key: self.settings.secret_key.clone(),
            },
        })
    }

    /// Event upload acknowledgment. The body is opaque; the gateway only
    /// needs to exist and be told its events arrived.
    pub async fn events_received(&self, gateway_hid: &str, body: &str) -> Result<(), DomainError> {
        let gateway = self.require_gateway(gateway_hid).await?;
        info!("gateway {} reported events: {body}", gateway.name());
        Ok(())
    }

    /// All known gateways, insertion order.
    pub async fn gateways(&self) -> Result<Vec<Gateway>, DomainError> {
        self.gateways.find_all().await
    }

    pub async fn list_gateways(&self) -> Result<PaginatedListing<GatewaySummary>, DomainError> {
        let summaries = self
            .gateways
            .find_all()
            .await?
            .into_iter()
            .map(|gateway| GatewaySummary {
                pri: format!("arw:pgs:gwy:{}", gateway.hid),
                application_hid: gateway.application_hid.clone(),
                hid: gateway.hid,
                software_name: SOFTWARE_NAME.to_string(),
                software_release_name: SOFTWARE_NAME.to_string(),
                gateway_type: SOFTWARE_NAME.to_string(),
            })
            .collect();
        Ok(PaginatedListing::single_page(summaries))
    }

    /// Devices, optionally narrowed to one gateway. Filtering on an
    /// unknown gateway is an error rather than an empty page.
    pub async fn list_devices(
        &self,
        gateway_hid: Option<&str>,
    ) -> Result<PaginatedListing<Device>, DomainError> {
        let devices = match gateway_hid {
            Some(hid) => {
                self.require_gateway(hid).await?;
                self.devices.find_by_gateway(hid).await?
            }
            None => self.devices.find_all().await?,
        };
        Ok(PaginatedListing::single_page(devices))
    }

    pub async fn send_button(
        &self,
        gateway_id: &str,
        request: ButtonRequest,
    ) -> Result<(), DomainError> {
        let enabled = request.enabled();
        debug!("got remote_button_enable request for {gateway_id} to value {enabled}");
        self.relay_call(self.relay.send_button_command(gateway_id, enabled))
            .await
    }

    pub async fn send_reboot(&self, gateway_id: &str) -> Result<(), DomainError> {
        debug!("got reboot request for {gateway_id}");
        self.relay_call(self.relay.send_reboot_command(gateway_id))
            .await
    }

    pub async fn send_feed(
        &self,
        gateway_id: &str,
        request: FeedRequest,
    ) -> Result<(), DomainError> {
        let portion = request.portion();
        debug!("got feed request for {gateway_id} of portion {portion}");
        self.relay_call(self.relay.send_feed_command(gateway_id, portion))
            .await
    }

    pub async fn send_utc_offset(
        &self,
        gateway_id: &str,
        request: UtcOffsetRequest,
    ) -> Result<(), DomainError> {
        let offset = request.offset();
        debug!("got utc_offset request for {gateway_id} for utc_offset {offset}");
        self.relay_call(self.relay.send_utc_offset_command(gateway_id, offset))
            .await
    }

    async fn require_gateway(&self, gateway_hid: &str) -> Result<Gateway, DomainError> {
        self.gateways
            .find_by_hid(gateway_hid)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("gateway {gateway_hid} does not exist")))
    }

    /// Bound a relay call by the configured timeout and fold transport
    /// failures into the downstream error class.
    async fn relay_call<F>(&self, call: F) -> Result<(), DomainError>
    where
        F: Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>>,
    {
        match tokio::time::timeout(self.settings.relay_timeout, call).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DomainError::Downstream(e.to_string())),
            Err(_) => Err(DomainError::Downstream(
                "command relay timed out".to_string(),
            )),
        }
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, DomainError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            warn!("payload didn't contain a {field}, rejecting");
            Err(DomainError::Validation(format!("missing field: {field}")))
        }
    }
}
