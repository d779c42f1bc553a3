//! Setup for [poise::Framework]

use crate::commands;
use crate::data;
use crate::data::Data;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::setup::BotConfig;
use crate::setup::Env;
use crate::welcome;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, PrometheusError>;

/// Construct a [poise::Framework]
pub(super) fn framework(env: Env, config: BotConfig) -> Framework {
    poise::Framework::builder()
        .options(framework_options())
        .setup(move |ctx, rdy, fw| framework_setup(ctx, rdy, fw, env, config))
        .build()
}

/// Configure options for the [Framework]
fn framework_options() -> poise::FrameworkOptions<Data, PrometheusError> {
    poise::FrameworkOptions {
        // Add commands to the framework
        commands: commands::list(),
        // Handle framework errors
        on_error: |e| crate::log::handle_framework_error(e),
        // Fixed-window rate limiting; administrators bypass entirely.
        command_check: Some(|ctx| {
            Box::pin(async move {
                if data::is_admin(&ctx).await {
                    return Ok(true);
                }
                if ctx.data().rate_limiter.check(ctx.author().id).await {
                    Ok(true)
                } else {
                    Err(UserError::RateLimited.into())
                }
            })
        }),
        // Buttons and gateway events are handled outside the command path.
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::events::event_handler(ctx, event, framework, data))
        },
        // Log when commands start
        pre_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Started '{cmd_name}' command from {user}.")
            })
        },
        // Log when finishing commands
        post_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Finished '{cmd_name}' command from {user}.")
            })
        },
        ..Default::default()
    }
}

/// Construct future that runs on startup
fn framework_setup<'a>(
    ctx: &'a serenity::Context,
    rdy: &'a serenity::Ready,
    fw: &'a Framework,
    env: Env,
    config: BotConfig,
) -> poise::BoxFuture<'a, Result<Data, PrometheusError>> {
    Box::pin(async move {
        // Register the commands on the target community only; guild
        // registration propagates much faster than global.
        let commands = &fw.options().commands;
        let app_commands = poise::builtins::create_application_commands(commands);
        env.guild_id.set_commands(ctx, app_commands).await?;

        let data = Data::new(env, config);
        data.rate_limiter.spawn_sweeper();

        // Prime the invite-use snapshot so the first join can be attributed.
        match data.env.guild_id.invites(ctx).await {
            Ok(invites) => {
                let fresh = invites
                    .into_iter()
                    .map(|inv| (inv.code, inv.inviter.map(|u| u.id), inv.uses));
                data.invite_uses.lock().await.rebuild(fresh);
            }
            Err(err) => {
                tracing::warn!("Could not prime invite cache: {err}");
            }
        }

        // Refresh the welcome embed with the current commissions status.
        let settings = data.settings.get().await;
        let status = welcome::comms_status(ctx, settings.channels.comms_status).await;
        if let Err(err) = welcome::update_welcome(ctx, &data, status).await {
            tracing::warn!("Could not update welcome embed on startup: {err}");
        } else {
            tracing::info!("Welcome embed updated with status: {status}");
        }

        // Simple message that logs when the bot has initialized
        let bot_name = &rdy.user.name;
        tracing::info!("{bot_name} is ready!");

        Ok(data)
    })
}
