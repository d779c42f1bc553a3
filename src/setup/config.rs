//! Configuration for running this bot.
//!
//! Secrets and deployment bindings come from the process environment (.env);
//! everything else lives in `config/config.json` as an explicit schema with
//! defaulted optional fields, validated once at load time.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::data::invites::Tier;
use crate::error::ConfigError;
use crate::serenity;

/// Directory holding every persisted JSON surface.
pub const CONFIG_DIR: &str = "config";

/// The bot configuration file inside [CONFIG_DIR].
const CONFIG_FILE: &str = "config.json";

/// Resolve a file name inside [CONFIG_DIR].
pub fn config_path(file: &str) -> PathBuf {
    Path::new(CONFIG_DIR).join(file)
}

/// Required process environment.
///
/// The credential trio (token, application id, guild id) is fatal when
/// absent. The deployment bindings only degrade the notifier.
#[derive(Debug, Clone)]
pub struct Env {
    /// Token needed to use a bot account.
    pub token: String,
    pub application_id: serenity::ApplicationId,
    /// The single community this bot serves.
    pub guild_id: serenity::GuildId,
    /// Channel receiving deployment status messages.
    pub monitor_channel: Option<serenity::ChannelId>,
    /// Outbound Discord webhook for `/deploytest` and pipeline reports.
    pub deploy_webhook_url: Option<Url>,
}

impl Env {
    /// Reads and validates the environment. Call after tracing is installed
    /// so degraded (non-fatal) bindings can be reported.
    pub fn read() -> Result<Env, ConfigError> {
        let token = required("DISCORD_TOKEN")?;
        // A real token is much longer than this; catch obvious paste errors.
        if token.len() < 50 {
            return Err(ConfigError::InvalidEnv("DISCORD_TOKEN"));
        }

        let application_id = required("APPLICATION_ID")?
            .parse::<u64>()
            .map(serenity::ApplicationId::new)
            .map_err(|_| ConfigError::InvalidEnv("APPLICATION_ID"))?;

        let guild_id = required("GUILD_ID")?
            .parse::<u64>()
            .map(serenity::GuildId::new)
            .map_err(|_| ConfigError::InvalidEnv("GUILD_ID"))?;

        let monitor_channel = match optional("MONITOR_CHANNEL") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => Some(serenity::ChannelId::new(id)),
                Err(_) => {
                    tracing::error!("MONITOR_CHANNEL is not a channel id; notifier disabled");
                    None
                }
            },
            None => {
                tracing::error!("MONITOR_CHANNEL missing in .env; notifier disabled");
                None
            }
        };

        let deploy_webhook_url = match optional("DEPLOY_WEBHOOK_URL") {
            Some(raw) => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(_) => {
                    tracing::error!("DEPLOY_WEBHOOK_URL is not a valid URL; webhook disabled");
                    None
                }
            },
            None => {
                tracing::error!("DEPLOY_WEBHOOK_URL missing in .env; webhook disabled");
                None
            }
        };

        Ok(Env {
            token,
            application_id,
            guild_id,
            monitor_channel,
            deploy_webhook_url,
        })
    }
}

/// A mandatory environment variable.
fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

/// An environment variable the bot can run without.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Settings read from `config.json` that modify bot behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BotConfig {
    /// See [LoggingConfig]
    logging: LoggingConfig,

    /// Fixed-window interaction limiter parameters.
    pub rate_limit: RateLimitConfig,

    /// Channel bindings referenced by commands.
    pub channels: ChannelBindings,

    /// Webhook credentials owned by the bot.
    pub webhooks: WebhookBindings,

    /// Invite-referral reward program settings. The tier table is read once
    /// at startup and treated as immutable afterwards.
    pub invite_program: InviteProgramConfig,

    /// Access-role panel binding.
    pub access: AccessConfig,
}

impl BotConfig {
    /// Tries to read [CONFIG_FILE] to extract a [BotConfig].
    /// If the file doesn't exist or is empty, writes the default config and
    /// runs with defaults. If it exists but doesn't match the schema, returns
    /// an error naming the offending path; the caller decides the fallback.
    pub fn read() -> Result<BotConfig, ConfigError> {
        let path = config_path(CONFIG_FILE);
        let file = std::fs::read_to_string(&path);

        match file {
            // Config file found
            Ok(content) => {
                if content.trim().is_empty() {
                    // Write default values to file if it's empty.
                    write_file(&BotConfig::default())?;
                    Ok(BotConfig::default())
                } else {
                    // If deserialization fails, return an error describing the mistake.
                    let mut de = serde_json::Deserializer::from_str(&content);
                    let result: Result<BotConfig, _> = serde_path_to_error::deserialize(&mut de);

                    result.map_err(|error| ConfigError::InvalidConfig {
                        reason: error.to_string(),
                    })
                }
            }
            // File not found or other filesystem error
            Err(file_error) => {
                match file_error.kind() {
                    // If the file doesn't exist, create the default config file.
                    std::io::ErrorKind::NotFound => {
                        tracing::warn!("No {CONFIG_FILE} found, creating one with defaults.");
                        write_file(&BotConfig::default())?;
                        Ok(BotConfig::default())
                    }
                    // Indeterminate existence (e.g. missing permissions): report.
                    _ => Err(ConfigError::IoError(file_error)),
                }
            }
        }
    }

    /// Getter for the logging section.
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            rate_limit: RateLimitConfig::default(),
            channels: ChannelBindings::default(),
            webhooks: WebhookBindings::default(),
            invite_program: InviteProgramConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

/// Configs for log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Print debug traces to console?
    pub console_debug: bool,
    /// Enable writing to log file?
    pub logs_enabled: bool,
    /// Directory to store log files
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_debug: false,
            logs_enabled: true,
            log_dir: "logs".to_string(),
        }
    }
}

/// Fixed-window limiter parameters. Administrators bypass the limiter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,
    /// Interactions allowed per user per window.
    pub max_per_window: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_per_window: 10,
        }
    }
}

/// Channels the bot reads or writes by role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChannelBindings {
    /// Channel whose name carries the commissions status.
    pub comms_status: Option<serenity::ChannelId>,
    /// Channel holding the welcome embed.
    pub welcome: Option<serenity::ChannelId>,
    /// Channel `/setup-tickets` must be run in, when pinned.
    pub setup_tickets: Option<serenity::ChannelId>,
    /// Rules channel, linked from welcome material.
    pub rules: Option<serenity::ChannelId>,
    /// Payment information channel.
    pub payment: Option<serenity::ChannelId>,
    /// Skills showcase channel.
    pub skills: Option<serenity::ChannelId>,
}

/// Webhook credentials persisted by setup commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebhookBindings {
    /// The welcome-embed webhook, provisioned by `/setup-welcome`.
    pub welcome: Option<WelcomeWebhook>,
}

/// Credentials and message pointer for the welcome webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeWebhook {
    pub id: serenity::WebhookId,
    pub token: String,
    /// The posted welcome message, once one exists.
    #[serde(default)]
    pub message_id: Option<serenity::MessageId>,
}

/// Invite-referral program settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InviteProgramConfig {
    /// K-Credits granted per invite before the tier multiplier.
    pub base_reward: f64,
    /// Reward tiers, ascending by threshold.
    pub tiers: Vec<Tier>,
    /// Channel where credited invites are announced.
    pub announce_channel: Option<serenity::ChannelId>,
}

impl Default for InviteProgramConfig {
    fn default() -> Self {
        Self {
            base_reward: 1.0,
            tiers: Tier::default_table(),
            announce_channel: None,
        }
    }
}

/// Access-role panel binding, configured by `/setup-access`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessConfig {
    /// Role granted by the access panel button.
    pub role_id: Option<serenity::RoleId>,
}

/// Write the given config to [CONFIG_FILE].
pub(crate) fn write_file(config: &BotConfig) -> Result<(), ConfigError> {
    let content =
        serde_json::to_string_pretty(config).expect("config serialization can't fail");
    if let Some(parent) = config_path(CONFIG_FILE).parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
    }
    std::fs::write(config_path(CONFIG_FILE), content).map_err(ConfigError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_configuration() {
        let config = BotConfig::default();
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_per_window, 10);
        assert_eq!(config.invite_program.base_reward, 1.0);

        let thresholds: Vec<u64> = config
            .invite_program
            .tiers
            .iter()
            .map(|t| t.min_invites)
            .collect();
        assert_eq!(thresholds, vec![2, 5, 10]);
        // Thresholds must be strictly increasing for tier lookup to be unique.
        assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn partial_config_fills_missing_sections_with_defaults() {
        let json = r#"{ "rateLimit": { "maxPerWindow": 3 } }"#;
        let config: BotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rate_limit.max_per_window, 3);
        // Untouched sibling field and sections come from defaults.
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.logging().logs_enabled);
        assert!(config.channels.comms_status.is_none());
    }

    #[test]
    fn shape_mismatch_is_rejected_with_a_path() {
        let json = r#"{ "rateLimit": { "windowSecs": "sixty" } }"#;
        let mut de = serde_json::Deserializer::from_str(json);
        let err = serde_path_to_error::deserialize::<_, BotConfig>(&mut de).unwrap_err();
        assert!(err.to_string().contains("rateLimit.windowSecs"));
    }
}
