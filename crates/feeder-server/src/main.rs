use anyhow::Result;
use application::{RegistrationService, ServiceSettings};
use clap::Parser;
use infrastructure::{MqttClient, MqttCommandRelay, ServerConfig, SqlxDeviceRepository, SqlxGatewayRepository};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feeder_server::{api, state::AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API Port
    #[arg(long, default_value = "8080")]
    api_port: u16,

    /// MQTT Client ID
    #[arg(long, default_value = "feeder-cloud")]
    mqtt_client_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            "info,feeder_server=debug,application=debug",
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("🐾 Feeder Cloud API Starting...");

    // 0. Configuration (env-backed, defaults match the shipped firmware)
    let config = ServerConfig::load()?;

    // 1. Connect to the database and apply migrations
    info!("Connecting to {}...", config.database_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("✅ Migrations applied successfully");

    // 2. MQTT command relay
    let mqtt = MqttClient::new(&config.mqtt.host, config.mqtt.port, &args.mqtt_client_id).await?;
    info!(
        "✅ MQTT client started against {}:{}",
        config.mqtt.host, config.mqtt.port
    );
    let relay = Arc::new(MqttCommandRelay::new(
        mqtt,
        config.mqtt.command_topic_prefix.clone(),
    ));

    // 3. Wire the registration service
    let gateways = Arc::new(SqlxGatewayRepository::new(pool.clone()));
    let devices = Arc::new(SqlxDeviceRepository::new(pool));
    let settings = ServiceSettings {
        cloud_platform: config.cloud.platform.clone(),
        api_key: config.cloud.api_key.clone(),
        secret_key: config.cloud.secret_key.clone(),
        session_token: config.cloud.session_token.clone(),
        relay_timeout: Duration::from_secs(config.relay_timeout_secs),
    };
    let service = RegistrationService::new(gateways, devices, relay, settings);
    let state = Arc::new(AppState::new(service));

    // 4. Serve
    let app = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.api_port)).await?;
    info!("✅ API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
