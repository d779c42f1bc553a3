//! Deployment status relay: a single mutable status message in the
//! monitoring channel, driven by the CI pipeline through the HTTP listener
//! in [server], plus the outbound reporting webhook in [webhook].

pub mod server;
mod webhook;

pub use webhook::DeployWebhook;

use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::serenity;

/// Pointer file for crash recovery of the status message.
const POINTER_FILE: &str = "deploy-message.json";

/// Footer on every status embed.
const FOOTER: &str = "Prometheus Bot • Deployment Monitor";

/// Discord blurple, the neutral status color.
const BLURPLE: u32 = 0x5865F2;
const GREEN: u32 = 0x57F287;
const RED: u32 = 0xED4245;

/// One cosmetic pipeline stage. The sequence is a presentation simulation on
/// fixed delays; it does not track the real deployment.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    /// Pause before this stage is shown (stages land 1s, 2s, 3s after start).
    pub delay: Duration,
    pub title: &'static str,
    pub color: u32,
}

/// The canned sequence fired after `/deploy`.
pub const STAGES: [Stage; 3] = [
    Stage {
        delay: Duration::from_secs(1),
        title: "📥 Pulling repository…",
        color: 0x3498DB,
    },
    Stage {
        delay: Duration::from_secs(1),
        title: "⚙️ Installing dependencies…",
        color: 0xFAA61A,
    },
    Stage {
        delay: Duration::from_secs(1),
        title: "🔄 Reloading service…",
        color: 0x9B59B6,
    },
];

/// Persisted `{messageId, channelId, timestamp}` pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployPointer {
    message_id: serenity::MessageId,
    channel_id: serenity::ChannelId,
    /// Unix milliseconds at save time.
    timestamp: u64,
}

/// Manages the singleton deployment status message.
///
/// All operations degrade gracefully: with no channel configured or no
/// message to update, they log and return. A missed update is simply lost;
/// this is a notifier, not a control path.
#[derive(Debug)]
pub struct DeployMonitor {
    http: Arc<serenity::Http>,
    channel: Option<serenity::ChannelId>,
    pointer_path: PathBuf,
    message: Mutex<Option<(serenity::ChannelId, serenity::MessageId)>>,
    /// Session generation; a new `start` supersedes pending stage timers.
    generation: AtomicU64,
}

impl DeployMonitor {
    pub fn new(http: Arc<serenity::Http>, channel: Option<serenity::ChannelId>) -> Self {
        Self {
            http,
            channel,
            pointer_path: crate::setup::config_path(POINTER_FILE),
            message: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// The generation stage timers must present to still be current.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Starts a new deployment session: posts a fresh status message and
    /// abandons any prior unfinished session. Returns the new generation for
    /// the caller's stage timers.
    pub async fn start(&self, commit: &str) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(channel) = self.channel else {
            tracing::error!("MONITOR_CHANNEL not configured; deployment message skipped");
            return generation;
        };

        let embed = serenity::CreateEmbed::new()
            .title("🔵 Deployment detected")
            .description("Initializing deployment…")
            .field("Commit", format!("`{commit}`"), true)
            .color(BLURPLE)
            .timestamp(serenity::Timestamp::now())
            .footer(serenity::CreateEmbedFooter::new(FOOTER));

        let message = serenity::CreateMessage::new().embed(embed);
        match channel.send_message(&self.http, message).await {
            Ok(posted) => {
                *self.message.lock().await = Some((channel, posted.id));
                self.save_pointer(channel, posted.id);
                tracing::info!("Deployment started for commit: {commit}");
            }
            Err(err) => {
                tracing::error!("Error starting deployment message: {err}");
            }
        }

        generation
    }

    /// Edits the status message in place, preserving already-set fields
    /// (the commit label) and the description unless a new one is given.
    /// A stale `generation` (superseded session) makes this a no-op.
    pub async fn advance_stage(
        &self,
        generation: u64,
        title: &str,
        color: u32,
        description: Option<&str>,
    ) {
        if generation != self.current_generation() {
            tracing::debug!("Skipping stage '{title}' from a superseded deployment session");
            return;
        }

        let Some((channel, message_id, existing)) = self.fetch_message().await else {
            tracing::warn!("No deployment message to update");
            return;
        };

        let embed = rebuild_embed(existing.as_ref(), title, color, description, None);
        self.edit(channel, message_id, embed).await;
        tracing::info!("Stage updated: {title}");
    }

    /// Terminal edit marking the deployment successful.
    pub async fn succeed(&self) {
        let Some((channel, message_id, existing)) = self.fetch_message().await else {
            tracing::warn!("No deployment message to update");
            return;
        };

        let embed = rebuild_embed(
            existing.as_ref(),
            "🟩 Deployment Success",
            GREEN,
            Some("The bot was updated and the service reloaded correctly."),
            None,
        );
        self.edit(channel, message_id, embed).await;
        tracing::info!("Deployment marked as successful");
    }

    /// Terminal edit marking the deployment failed; adds the commit field if
    /// the message never carried one.
    pub async fn fail(&self, commit: &str, error_message: Option<&str>) {
        let Some((channel, message_id, existing)) = self.fetch_message().await else {
            tracing::warn!("No deployment message to update");
            return;
        };

        let description =
            error_message.unwrap_or("An error occurred during the deployment.");
        let embed = rebuild_embed(
            existing.as_ref(),
            "❌ Deployment Failed",
            RED,
            Some(description),
            Some(commit),
        );
        self.edit(channel, message_id, embed).await;
        tracing::info!("Deployment marked as failed for commit: {commit}");
    }

    /// Resolve the current status message: from memory, or by re-resolving
    /// the persisted pointer after a restart. Returns the live embed so
    /// edits can preserve its fields.
    async fn fetch_message(
        &self,
    ) -> Option<(
        serenity::ChannelId,
        serenity::MessageId,
        Option<serenity::Embed>,
    )> {
        let remembered = *self.message.lock().await;
        let (channel, message_id) = match remembered {
            Some(pair) => pair,
            None => {
                let pointer = self.load_pointer()?;
                (pointer.channel_id, pointer.message_id)
            }
        };

        match self.http.get_message(channel, message_id).await {
            Ok(message) => {
                *self.message.lock().await = Some((channel, message_id));
                Some((channel, message_id, message.embeds.into_iter().next()))
            }
            Err(err) => {
                tracing::warn!("Could not fetch saved deployment message: {err}");
                // The message no longer exists; drop the stale pointer.
                *self.message.lock().await = None;
                let _ = std::fs::remove_file(&self.pointer_path);
                None
            }
        }
    }

    async fn edit(
        &self,
        channel: serenity::ChannelId,
        message_id: serenity::MessageId,
        embed: serenity::CreateEmbed,
    ) {
        let builder = serenity::EditMessage::new().embed(embed);
        if let Err(err) = self
            .http
            .edit_message(channel, message_id, &builder, vec![])
            .await
        {
            tracing::error!("Error updating deployment message: {err}");
        }
    }

    fn save_pointer(&self, channel: serenity::ChannelId, message_id: serenity::MessageId) {
        let pointer = DeployPointer {
            message_id,
            channel_id: channel,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as u64),
        };
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.pointer_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&pointer)
                .expect("pointer serialization can't fail");
            std::fs::write(&self.pointer_path, content)
        };
        if let Err(err) = write() {
            tracing::error!("Could not save deployment message pointer: {err}");
        }
    }

    fn load_pointer(&self) -> Option<DeployPointer> {
        let content = std::fs::read_to_string(&self.pointer_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(pointer) => Some(pointer),
            Err(err) => {
                tracing::warn!("Could not load saved deployment pointer: {err}");
                None
            }
        }
    }
}

/// Rebuild the status embed around the live one: new title/color/timestamp,
/// previous description unless replaced, previous fields kept, and the
/// commit field appended when `ensure_commit` is set and missing.
fn rebuild_embed(
    existing: Option<&serenity::Embed>,
    title: &str,
    color: u32,
    description: Option<&str>,
    ensure_commit: Option<&str>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .color(color)
        .timestamp(serenity::Timestamp::now())
        .footer(serenity::CreateEmbedFooter::new(FOOTER));

    match description {
        Some(description) => embed = embed.description(description),
        None => {
            if let Some(previous) = existing.and_then(|e| e.description.clone()) {
                embed = embed.description(previous);
            }
        }
    }

    let mut has_commit = false;
    if let Some(existing) = existing {
        for field in &existing.fields {
            if field.name == "Commit" {
                has_commit = true;
            }
            embed = embed.field(field.name.clone(), field.value.clone(), field.inline);
        }
    }

    if let Some(commit) = ensure_commit {
        if !has_commit {
            embed = embed.field("Commit", format!("`{commit}`"), true);
        }
    }

    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_round_trips_in_camel_case() {
        let pointer = DeployPointer {
            message_id: serenity::MessageId::new(111),
            channel_id: serenity::ChannelId::new(222),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&pointer).unwrap();
        assert!(json.contains("messageId"));
        assert!(json.contains("channelId"));

        let back: DeployPointer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message_id, pointer.message_id);
        assert_eq!(back.channel_id, pointer.channel_id);
        assert_eq!(back.timestamp, pointer.timestamp);
    }

    #[test]
    fn stage_sequence_lands_on_one_second_offsets() {
        let mut offset = Duration::ZERO;
        let offsets: Vec<u64> = STAGES
            .iter()
            .map(|s| {
                offset += s.delay;
                offset.as_secs()
            })
            .collect();
        assert_eq!(offsets, vec![1, 2, 3]);
    }
}
