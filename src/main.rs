//! Prometheus, the digital-artifact archivist bot for the Kentiq community
//! server. Dispatches slash commands and button interactions, runs the ticket
//! and invite-reward workflows, and relays CI deployment status through a
//! small HTTP listener.

mod commands;
mod data;
mod deploy;
mod error;
mod events;
mod log;
mod setup;
mod tickets;
mod welcome;

pub use poise::serenity_prelude as serenity;

use std::sync::Arc;

use data::Data;
use error::PrometheusError;
use setup::BotConfig;
use setup::Env;

/// Convenient alias, every command handler runs with this context type.
pub type Context<'a> = poise::Context<'a, Data, PrometheusError>;

#[tokio::main]
async fn main() -> Result<(), PrometheusError> {
    // Load .env before anything reads the environment.
    let _ = dotenvy::dotenv();

    // config.json is non-fatal; remember the load failure so it can be
    // reported once tracing is up.
    let (config, config_fault) = match BotConfig::read() {
        Ok(config) => (config, None),
        Err(err) => (BotConfig::default(), Some(err)),
    };

    let _log_guard = log::install_tracing(config.logging());
    log::install_panic_hook();

    if let Some(err) = config_fault {
        tracing::error!("config.json unusable, continuing with defaults: {err}");
    }

    // Credentials are the only fatal configuration faults.
    let env = match Env::read() {
        Ok(env) => env,
        Err(err) => {
            tracing::error!("{err}");
            return Err(err.into());
        }
    };

    tracing::info!("[PROMETHEUS] Bot starting, ready to transmit digital artifacts.");

    let client = setup::client(env.clone(), config).await;
    let mut client = match client {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(
                "Failed to construct client: {}",
                crate::log::sanitize(&err.to_string())
            );
            return Err(err);
        }
    };

    // The deployment listener shares the gateway client's HTTP handle, so a
    // CI call can post into the monitoring channel.
    let monitor = Arc::new(deploy::DeployMonitor::new(
        client.http.clone(),
        env.monitor_channel,
    ));
    tokio::spawn(deploy::server::serve(monitor));

    if let Err(err) = client.start().await {
        tracing::error!("Client error: {}", crate::log::sanitize(&err.to_string()));
        return Err(err.into());
    }

    Ok(())
}
