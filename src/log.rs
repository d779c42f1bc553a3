//! Logging functionality and error reporting.
//! The logging library of choice is [tracing].

use poise::BoxFuture;
use poise::CreateReply;
use poise::FrameworkError;
use tracing::debug;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::data::Data;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::setup::LoggingConfig;
use crate::Context;

/// The name of this crate, used to set filter target.
const THIS_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Setup format layers, tracing subscribers, and installs tracing.
pub(super) fn install_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Uses local time.
    let timer = fmt::time::ChronoLocal::rfc_3339();

    // Set which traces are tracked.
    // By default, all INFO traces and above are shown.
    let target = if config.console_debug {
        Targets::new()
            .with_default(LevelFilter::INFO)
            .with_target(THIS_CRATE, LevelFilter::DEBUG)
    } else {
        Targets::new().with_default(LevelFilter::INFO)
    };

    // Compose the layer that prints traces to stdout
    let console_layer = if config.console_debug {
        // Debug layer
        fmt::layer()
            .with_ansi(true)
            .with_file(true)
            .with_level(true)
            .with_line_number(true)
            .with_target(true)
            .with_timer(timer.clone())
            .pretty()
            .with_filter(target.clone())
    } else {
        // Default layer
        fmt::layer()
            .with_ansi(true)
            .with_file(false)
            .with_level(true)
            .with_line_number(false)
            .with_target(true)
            .with_timer(timer.clone())
            .pretty()
            .with_filter(target.clone())
    };

    // Compose the layer that writes logs and get a guard for the writer.
    // Output is similar to console logs with a few changes (see below).
    let (log_layer, guard) = if config.logs_enabled {
        // Put file logs in `log_dir` as "{THIS_CRATE}.log.{TIMESTAMP}" on an hourly basis.
        let prefix_format = format!("{THIS_CRATE}.log");
        let appender = tracing_appender::rolling::hourly(&config.log_dir, prefix_format);

        // Create the writer and writer guard.
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = if config.console_debug {
            // Debug layer
            fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_level(true)
                .with_line_number(true)
                .with_target(true)
                .with_timer(timer)
                .with_writer(writer)
                .compact()
                .with_filter(target)
        } else {
            // Default layer
            fmt::layer()
                .with_ansi(false)
                .with_file(false)
                .with_level(true)
                .with_line_number(false)
                .with_target(true)
                .with_timer(timer)
                .with_writer(writer)
                .compact()
                .with_filter(target)
        };

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Add all the layers and initialize them.
    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_layer)
        .init();

    guard
}

/// Masks Discord-token-shaped substrings so credentials never reach the logs.
/// A token is three dot-separated base64ish segments: an id of 24+ chars, a
/// 6-char timestamp, and a 27-38 char HMAC.
pub fn sanitize(message: &str) -> String {
    let is_token_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while !rest.is_empty() {
        // Find the next maximal run of token-alphabet characters and dots.
        let start = match rest.find(|c: char| is_token_char(c) || c == '.') {
            Some(idx) => idx,
            None => break,
        };
        out.push_str(&rest[..start]);
        let run_len = rest[start..]
            .find(|c: char| !is_token_char(c) && c != '.')
            .unwrap_or(rest.len() - start);
        let run = &rest[start..start + run_len];

        let segments: Vec<&str> = run.split('.').collect();
        let shaped = segments.len() == 3
            && segments[0].len() >= 24
            && segments[0].chars().all(|c| c.is_ascii_alphanumeric())
            && segments[1].len() == 6
            && (27..=38).contains(&segments[2].len());
        if shaped {
            out.push_str("[TOKEN_REDACTED]");
        } else {
            out.push_str(run);
        }
        rest = &rest[start + run_len..];
    }
    out.push_str(rest);
    out
}

/// Log panics (sanitized) before the default unwind handling takes over.
/// Panics inside command handlers are additionally caught by the framework
/// and reported to the user.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!("panic: {}", sanitize(&info.to_string()));
    }));
}

/// Defines various behaviors for how to handle errors.
/// Expected [UserError]s become an [ephemeral_reply]; unexpected errors are
/// logged with the invocation details and answered with a generic apology.
pub fn handle_framework_error(err: FrameworkError<Data, PrometheusError>) -> BoxFuture<()> {
    let handler = async move {
        match err {
            // ---
            // This section includes all errors that should be invisible to users.
            // ---
            FrameworkError::Setup { error, .. } => {
                error!("Error during startup: {}", sanitize(&error.to_string()))
            }
            FrameworkError::EventHandler { error, event, .. } => {
                let event_name = event.snake_case_name();
                error!("Error while handling '{event_name}' event: {error}")
            }

            // ---
            // This section includes errors that users see but are not logged as error!
            // For example, a rate-limited user is shown an 'error', but no
            // unexpected behavior occured.
            // ---
            FrameworkError::SubcommandRequired { ctx } => {
                let subcmds = ctx
                    .command()
                    .subcommands
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let user_error = UserError::MissingSubcommand { subcmds };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            // This branch specifically handles only errors that are UserError.
            // Other types are handled in the next section below.
            FrameworkError::Command {
                error: PrometheusError::UserError(user_error),
                ctx,
                ..
            } => {
                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::ArgumentParse {
                error, input, ctx, ..
            } => {
                let user_error = UserError::BadArgs { input };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .add_info(error.to_string())
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CooldownHit {
                remaining_cooldown,
                ctx,
                ..
            } => {
                let user_error = UserError::OnCooldown { remaining_cooldown };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::MissingBotPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                let user_error = UserError::MissingBotPermissions {
                    missing_permissions,
                };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::MissingUserPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                let user_error = UserError::MissingUserPermissions {
                    missing_permissions,
                };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::NotAnOwner { ctx, .. } => {
                let user_error = UserError::NotOwner;

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::GuildOnly { ctx, .. } => {
                let user_error = UserError::GuildOnly;

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::DmOnly { ctx, .. } => {
                let user_error = UserError::DmOnly;

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::NsfwOnly { ctx, .. } => {
                let user_error = UserError::NsfwOnly;

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CommandCheckFailed { error, ctx, .. } => {
                // The rate limiter rejects through the command check; its
                // refusal is an expected UserError, not a failure.
                match error {
                    Some(PrometheusError::UserError(user_error)) => {
                        Response::builder()
                            .ctx(&ctx)
                            .reply(user_error.to_string())
                            .source(user_error)
                            .build()
                            .send()
                            .await;
                    }
                    other => {
                        let error = PrometheusError::CheckFailed {
                            reason: other.map(|e| e.to_string()),
                        };

                        Response::builder()
                            .ctx(&ctx)
                            .reply(error.to_string())
                            .source(error)
                            .build()
                            .send()
                            .await;
                    }
                }
            }

            // ---
            // This section includes errors that users see and are logged as error!
            // These are unexpected and should be fixed.
            // ---
            FrameworkError::Command { error, ctx, .. } => {
                let reply = if error.is_missing_permissions() {
                    "❌ I am missing permissions for that. Please check my role \
                     (e.g. grant `Manage Channels`)."
                } else {
                    "❌ An error occurred while processing this command."
                };
                Response::builder()
                    .ctx(&ctx)
                    .reply(reply)
                    .source(error)
                    .is_error(true)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CommandPanic { payload, ctx, .. } => {
                let error = PrometheusError::Panic { payload };

                Response::builder()
                    .ctx(&ctx)
                    .reply("Something went horribly wrong... The incident has been logged.")
                    .source(error)
                    .is_error(true)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CommandStructureMismatch {
                description, ctx, ..
            } => {
                let error = PrometheusError::CommandStructureMismatch {
                    description: description.to_string(),
                };

                Response::builder()
                    .ctx(&ctx.into())
                    .reply(
                        "Command structure mismatch. Please wait until discord catches up \
                         to a bot update.",
                    )
                    .source(error)
                    .is_error(true)
                    .build()
                    .send()
                    .await;
            }

            // ---
            // This section includes errors that should be unreachable.
            // No response is necessary but an error! log can be written.
            // ---
            FrameworkError::UnknownCommand { .. } => {
                error!("Prefix commands are not supported.")
            }
            FrameworkError::UnknownInteraction { interaction, .. } => {
                let name = &interaction.data.name;
                error!("Received unknown interaction: {name}")
            }
            FrameworkError::DynamicPrefix { .. } => {
                error!("Dynamic prefixes are not supported.")
            }
            _ => error!("The dev must have forgotten something..."),
        }
    };

    Box::pin(handler)
}

/// Sends an ephemeral reply to the [Context] author.
async fn ephemeral_reply(ctx: &Context<'_>, content: impl Into<String>) {
    let reply = CreateReply::default().ephemeral(true).content(content);
    if let Err(e) = ctx.send(reply).await {
        error!("Failed to send ephemeral reply. {e}")
    };
}

/// Helper function to create debug information from [Context]
fn debug_info(ctx: &Context) -> String {
    let user = &ctx.author().name;
    let cmd = &ctx.command().name;
    let user_input = ctx.invocation_string();
    format!("{user} tried to use {cmd} with {user_input}.")
}

/// Structured response to errors.
/// Always logs as at least [debug level](tracing::debug), but is upgraded to
/// [error level](tracing::error) if `is_error` is set, in which case the
/// invocation details are attached.
#[derive(bon::Builder)]
#[builder(on(String, into))]
struct Response<'a> {
    /// The context of the response
    ctx: &'a Context<'a>,
    /// The reason for this reply, usually the error causing the response.
    #[builder(into)]
    source: PrometheusError,
    /// Optional ephemeral reply to user.
    reply: Option<String>,
    /// Additional information to log
    add_info: Option<String>,
    /// Set to `true` to log as error.
    #[builder(default = false)]
    is_error: bool,
}

impl Response<'_> {
    /// Execute the response
    async fn send(&self) {
        let ctx = self.ctx;

        let log_message = {
            let source = sanitize(&self.source.to_string());
            let add_info = self
                .add_info
                .as_ref()
                // Map `None` to "" otherwise format it to be appended to another string.
                .map_or("".to_string(), |s| format!("| {s}"));
            format!("{source} {add_info}")
        };
        if self.is_error {
            let dbg_info = debug_info(ctx);
            error!("{log_message} | {dbg_info}");
        } else {
            debug!("{log_message}");
        }

        // Send ephemeral reply if there is one.
        if let Some(ref reply) = self.reply {
            ephemeral_reply(ctx, reply).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn masks_token_shaped_substrings() {
        let token = "MTAxNzg2NzEyMzQ1Njc4OTAxMg.GaBcDe.0123456789abcdefghijklmnopq";
        let message = format!("Login error: invalid token {token} given");
        let cleaned = sanitize(&message);
        assert!(!cleaned.contains(token));
        assert!(cleaned.contains("[TOKEN_REDACTED]"));
        assert!(cleaned.starts_with("Login error: invalid token"));
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let message = "edit failed for channel 1358465216806912060 (code 50013).";
        assert_eq!(sanitize(message), message);
    }

    #[test]
    fn ignores_dotted_words_with_wrong_segment_shapes() {
        let message = "loaded config.json and deploy-message.json";
        assert_eq!(sanitize(message), message);
    }
}
