//! Error taxonomy. [UserError] covers expected, user-visible refusals that
//! are answered ephemerally and never logged as failures. [ConfigError]
//! covers startup and configuration faults. [PrometheusError] is the
//! top-level command error the framework dispatches on.

use thiserror::Error;

use crate::serenity;

/// Expected failures shown to the user as an ephemeral reply.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("⚠️ Asset `{0}` not found in Prometheus archives.")]
    UnknownAsset(String),
    #[error("⚠️ Collaboration `{0}` not found.")]
    UnknownCollab(String),
    #[error("⚠️ Client `{0}` not found in Prometheus archives.")]
    UnknownClient(String),
    #[error("⚠️ Identity `{0}` not found. End of transmission.")]
    UnknownIdentity(String),
    #[error("Channel entry `{0}` not found.")]
    UnknownChannelEntry(String),
    #[error("❌ No results found for \"{0}\".")]
    NoSearchResults(String),
    #[error("⏱️ You are using commands too quickly. Please wait a moment.")]
    RateLimited,
    #[error("You already have an open ticket.")]
    TicketAlreadyOpen,
    #[error("The ticket system has not been configured yet. Run `/setup-tickets` first.")]
    TicketsNotConfigured,
    #[error("Error: The ticket category is misconfigured. Please contact an admin.")]
    TicketCategoryMisconfigured,
    #[error("You do not have permission to manage this ticket.")]
    NotSupportRole,
    #[error(
        "❌ I could not create the ticket channel. Please check my permissions \
         (`Manage Channels`)."
    )]
    BotCannotManageChannels,
    #[error("This command can only be used inside a ticket channel.")]
    NotATicketChannel,
    #[error("⚠️ The commissions status channel is not configured.")]
    CommsChannelNotConfigured,
    #[error("❌ This command must be run in <#{0}>.")]
    WrongChannel(serenity::ChannelId),
    #[error("❌ The specified channel must be a text or announcement channel.")]
    NotATextChannel,
    #[error("Not in a server.")]
    NotInGuild,
    #[error("Missing subcommand. Try one of: {subcmds}")]
    MissingSubcommand { subcmds: String },
    #[error("Could not parse arguments{}.", input.as_ref().map(|i| format!(" `{i}`")).unwrap_or_default())]
    BadArgs { input: Option<String> },
    #[error("Command is on cooldown. Try again in {} seconds.", remaining_cooldown.as_secs())]
    OnCooldown {
        remaining_cooldown: std::time::Duration,
    },
    #[error("I am missing the following permissions: {missing_permissions}.")]
    MissingBotPermissions {
        missing_permissions: serenity::Permissions,
    },
    #[error("❌ You must be an administrator to use this command.")]
    MissingUserPermissions {
        missing_permissions: Option<serenity::Permissions>,
    },
    #[error("Only the bot owner may use this command.")]
    NotOwner,
    #[error("This command only works in a server.")]
    GuildOnly,
    #[error("This command only works in direct messages.")]
    DmOnly,
    #[error("This command only works in NSFW channels.")]
    NsfwOnly,
}

/// Configuration and startup faults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("[ERROR] {0} missing in environment (.env)")]
    MissingEnv(&'static str),
    #[error("[ERROR] Invalid value for {0} in environment (.env)")]
    InvalidEnv(&'static str),
    #[error("{reason}")]
    InvalidConfig { reason: String },
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Top-level error for command handlers and background operations.
#[derive(Error, Debug)]
pub enum PrometheusError {
    #[error(transparent)]
    UserError(#[from] UserError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Command panicked: {payload:?}")]
    Panic { payload: Option<String> },
    #[error("Check failed: {reason:?}")]
    CheckFailed { reason: Option<String> },
    #[error("Command structure mismatch: {description}")]
    CommandStructureMismatch { description: String },
}

impl PrometheusError {
    /// True when the underlying cause is Discord telling us we lack
    /// permissions (API error 50013), which deserves an actionable hint
    /// rather than a generic apology.
    pub fn is_missing_permissions(&self) -> bool {
        match self {
            PrometheusError::Serenity(serenity::Error::Http(
                serenity::HttpError::UnsuccessfulRequest(resp),
            )) => resp.error.code == 50013,
            PrometheusError::UserError(UserError::MissingBotPermissions { .. }) => true,
            _ => false,
        }
    }
}
