use async_trait::async_trait;

/// Operator command addressed to one gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCommand {
    /// Enable or disable the physical button on the feeder.
    Button { enabled: bool },
    Reboot,
    /// Dispense a portion, expressed as a fraction of a cup.
    Feed { portion: f64 },
    /// Set the device clock offset from UTC, in hours.
    UtcOffset { offset: i32 },
}

/// Transport that delivers commands to physical hardware.
///
/// Fire-and-forget from the caller's perspective: delivery and retry
/// guarantees belong to the transport. Implementations live in the
/// infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRelay: Send + Sync {
    async fn send(
        &self,
        gateway_id: &str,
        command: GatewayCommand,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn send_button_command(
        &self,
        gateway_id: &str,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(gateway_id, GatewayCommand::Button { enabled }).await
    }

    async fn send_reboot_command(
        &self,
        gateway_id: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(gateway_id, GatewayCommand::Reboot).await
    }

    async fn send_feed_command(
        &self,
        gateway_id: &str,
        portion: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(gateway_id, GatewayCommand::Feed { portion }).await
    }

    async fn send_utc_offset_command(
        &self,
        gateway_id: &str,
        offset: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(gateway_id, GatewayCommand::UtcOffset { offset }).await
    }
}
