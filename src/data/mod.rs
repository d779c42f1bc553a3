//! This module contains everything relating to [Data], the process-wide
//! state injected into every handler. No module-level singletons: each piece
//! of shared state is owned here so tests can instantiate their own.

pub mod catalog;
pub mod invites;
pub mod rate_limit;
pub mod tickets;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio::sync::RwLock;

use crate::deploy::DeployWebhook;
use crate::error::PrometheusError;
use crate::setup::BotConfig;
use crate::setup::Env;
use crate::Context;
use catalog::CatalogStore;
use invites::InviteLedger;
use invites::InviteUseCache;
use rate_limit::RateLimiter;
use tickets::TicketStore;

/// The data shared by every command and event handler.
#[derive(Debug)]
pub struct Data {
    /// Validated process environment.
    pub env: Env,
    /// Mutable bot configuration (config.json).
    pub settings: SettingsStore,
    /// Presentation catalogs behind an atomically swapped snapshot.
    pub catalogs: CatalogStore,
    /// Ticket system configuration.
    pub tickets: TicketStore,
    /// Invite-referral reward ledger.
    pub ledger: InviteLedger,
    /// Snapshot of invite-link use counts for join detection.
    pub invite_uses: Mutex<InviteUseCache>,
    /// Fixed-window interaction limiter.
    pub rate_limiter: Arc<RateLimiter>,
    /// Outbound deployment monitoring webhook.
    pub deploy_webhook: DeployWebhook,
    /// Process start, for `/stats` uptime.
    pub started: Instant,
}

impl Data {
    pub fn new(env: Env, config: BotConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));
        let ledger = InviteLedger::load(
            config.invite_program.base_reward,
            config.invite_program.tiers.clone(),
        );
        let deploy_webhook = DeployWebhook::new(env.deploy_webhook_url.clone());

        Self {
            env,
            settings: SettingsStore::new(config),
            catalogs: CatalogStore::load(),
            tickets: TicketStore::load(),
            ledger,
            invite_uses: Mutex::new(InviteUseCache::default()),
            rate_limiter,
            deploy_webhook,
            started: Instant::now(),
        }
    }
}

/// Owns the live [BotConfig]. Mutations go through [SettingsStore::update]
/// which swaps a fresh snapshot in and persists it, so no reader ever sees a
/// half-written configuration.
#[derive(Debug)]
pub struct SettingsStore {
    current: RwLock<Arc<BotConfig>>,
}

impl SettingsStore {
    pub fn new(config: BotConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub async fn get(&self) -> Arc<BotConfig> {
        self.current.read().await.clone()
    }

    /// Apply `mutate` to a copy of the configuration, persist it, then swap
    /// it in. Returns the new snapshot.
    pub async fn update<F>(&self, mutate: F) -> Result<Arc<BotConfig>, PrometheusError>
    where
        F: FnOnce(&mut BotConfig),
    {
        let mut guard = self.current.write().await;
        let mut fresh = (**guard).clone();
        mutate(&mut fresh);
        crate::setup::write_config_file(&fresh)?;
        let fresh = Arc::new(fresh);
        *guard = fresh.clone();
        Ok(fresh)
    }
}

/// Whether the invoking member holds the Administrator permission.
/// Administrators bypass the rate limiter entirely.
pub async fn is_admin(ctx: &Context<'_>) -> bool {
    match ctx.author_member().await {
        Some(member) => member.permissions.is_some_and(|p| p.administrator()),
        None => false,
    }
}
