//! Bot startup: configuration loading and client construction.

mod config;
mod framework;

use crate::error::PrometheusError;
use crate::serenity;

pub use config::config_path;
pub use config::BotConfig;
pub use config::Env;
pub use config::LoggingConfig;
pub use config::RateLimitConfig;
pub use config::WelcomeWebhook;

pub(crate) use config::write_file as write_config_file;

/// Constructs a [serenity::Client] with the poise framework installed.
pub(super) async fn client(env: Env, config: BotConfig) -> Result<serenity::Client, PrometheusError> {
    // Intents we wish to use. Member-join detection for the invite program
    // needs the privileged members intent.
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_MEMBERS;

    let client = serenity::ClientBuilder::new(&env.token, intents)
        .application_id(env.application_id)
        .framework(framework::framework(env, config))
        .await?;

    Ok(client)
}
