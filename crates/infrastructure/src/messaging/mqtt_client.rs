use anyhow::{Result, anyhow};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::task;
use tracing::{debug, error, info};

/// Thin wrapper around the rumqttc async client.
///
/// Owns the event loop in a background task; publishing while the broker
/// is unreachable fails fast instead of queueing commands the hardware
/// will replay at an arbitrary later time.
#[derive(Clone)]
pub struct MqttClient {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
}

impl MqttClient {
    pub async fn new(host: &str, port: u16, client_id: &str) -> Result<Self> {
        let mut mqttoptions = MqttOptions::new(client_id, host, port);
        mqttoptions.set_keep_alive(Duration::from_secs(20));
        mqttoptions.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, 100);
        let connected = Arc::new(AtomicBool::new(false));
        let connected_clone = connected.clone();

        // Drive the connection from a background task
        task::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("MQTT connected");
                        connected_clone.store(true, Ordering::SeqCst);
                    }
                    Ok(notification) => {
                        debug!("MQTT event: {notification:?}");
                    }
                    Err(e) => {
                        if connected_clone.swap(false, Ordering::SeqCst) {
                            error!("MQTT connection lost: {e}");
                        }
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self { client, connected })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        if !self.is_connected() {
            return Err(anyhow!("MQTT broker not connected"));
        }
        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes())
            .await
            .map_err(|e| anyhow!("MQTT publish failed: {e}"))
    }
}
