//! Ticket system configuration, persisted to `tickets.json` by
//! `/setup-tickets` and read by the ticket button handlers.

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::PrometheusError;
use crate::serenity;

const TICKETS_FILE: &str = "tickets.json";

/// Where tickets live and who handles them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketConfig {
    /// Category new ticket channels are created under.
    pub category_id: serenity::ChannelId,
    /// Role with access to every ticket.
    pub support_role_id: serenity::RoleId,
    /// Channel receiving transcripts on close, when configured.
    #[serde(default)]
    pub log_channel_id: Option<serenity::ChannelId>,
}

/// Owns the current ticket configuration and its file.
#[derive(Debug)]
pub struct TicketStore {
    current: RwLock<Option<TicketConfig>>,
}

impl TicketStore {
    /// Load `tickets.json`; an absent file simply means the ticket system
    /// has not been configured yet.
    pub fn load() -> Self {
        let path = crate::setup::config_path(TICKETS_FILE);
        let current = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => None,
            Ok(content) => {
                let mut de = serde_json::Deserializer::from_str(&content);
                match serde_path_to_error::deserialize(&mut de) {
                    Ok(config) => Some(config),
                    Err(err) => {
                        tracing::error!("{TICKETS_FILE} is malformed ({err}); tickets disabled");
                        None
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::error!("Could not read {TICKETS_FILE}: {err}");
                None
            }
        };

        Self {
            current: RwLock::new(current),
        }
    }

    pub async fn get(&self) -> Option<TicketConfig> {
        self.current.read().await.clone()
    }

    /// Replace the configuration and persist it.
    pub async fn set(&self, config: TicketConfig) -> Result<(), PrometheusError> {
        let path = crate::setup::config_path(TICKETS_FILE);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&config)?;
        tokio::fs::write(&path, content).await?;
        *self.current.write().await = Some(config);
        Ok(())
    }
}
