//! Outbound Discord webhook used for deployment monitoring reports, e.g. by
//! `/deploytest`. Posts a formatted embed payload directly to the webhook
//! URL with a short timeout; the pipeline caller never waits on Discord.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::PrometheusError;
use crate::serenity;

const USERNAME: &str = "Prometheus • Deploy Monitor";
const AVATAR_URL: &str = "https://i.imgur.com/Ju8D0NQ.png";
const FOOTER: &str = "Prometheus Bot • Production Deployment";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    username: &'a str,
    avatar_url: &'a str,
    embeds: [WebhookEmbed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct WebhookEmbed<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
    fields: &'a [WebhookField],
    timestamp: String,
    footer: WebhookFooter<'a>,
}

#[derive(Debug, Serialize)]
pub struct WebhookField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
struct WebhookFooter<'a> {
    text: &'a str,
}

/// Client for the monitoring webhook bound by `DEPLOY_WEBHOOK_URL`.
#[derive(Debug, Clone)]
pub struct DeployWebhook {
    url: Option<Url>,
    client: reqwest::Client,
}

impl DeployWebhook {
    pub fn new(url: Option<Url>) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Sends one formatted monitoring embed. Errors are returned to the
    /// caller, who decides whether to surface or merely log them.
    pub async fn send(
        &self,
        title: &str,
        description: &str,
        color: u32,
        fields: &[WebhookField],
    ) -> Result<(), PrometheusError> {
        let Some(url) = &self.url else {
            return Err(crate::error::ConfigError::MissingEnv("DEPLOY_WEBHOOK_URL").into());
        };

        let body = WebhookBody {
            username: USERNAME,
            avatar_url: AVATAR_URL,
            embeds: [WebhookEmbed {
                title,
                description,
                color,
                fields,
                timestamp: serenity::Timestamp::now().to_string(),
                footer: WebhookFooter { text: FOOTER },
            }],
        };

        self.client
            .post(url.clone())
            .timeout(TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!("Deploy webhook sent: {title}");
        Ok(())
    }
}
