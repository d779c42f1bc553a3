//! Implements the `/deploytest` command: fires a test embed through the
//! deployment monitoring webhook so an admin can verify the binding.

use tracing::instrument;

use crate::error::PrometheusError;
use crate::Context;

/// Test the deployment monitoring webhook
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn deploytest(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let result = ctx
        .data()
        .deploy_webhook
        .send(
            "Prometheus Deployment Webhook",
            "The monitoring webhook is working correctly.",
            0x57F287,
            &[],
        )
        .await;

    // The failure modes are expected operator mistakes; translate each into
    // an actionable reply instead of the generic apology.
    let reply = match result {
        Ok(()) => "✅ Webhook sent to the monitoring channel.".to_string(),
        Err(PrometheusError::Http(err)) if err.is_timeout() => {
            "❌ Timeout: the webhook took too long to answer. Check DEPLOY_WEBHOOK_URL."
                .to_string()
        }
        Err(PrometheusError::Http(err)) => match err.status() {
            Some(status) => format!("❌ HTTP error {status} from the webhook."),
            None => "❌ No response from the webhook. Check DEPLOY_WEBHOOK_URL.".to_string(),
        },
        Err(PrometheusError::ConfigError(_)) => {
            "❌ DEPLOY_WEBHOOK_URL is not configured.".to_string()
        }
        Err(err) => {
            tracing::error!("deploytest failed: {err}");
            "❌ An error occurred while sending the webhook.".to_string()
        }
    };

    ctx.say(reply).await?;
    Ok(())
}
