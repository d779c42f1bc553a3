//! The presentation catalogs: assets, clients, collaborations, channel
//! descriptors and identity profiles, each a flat JSON map on disk.
//!
//! All five load into one immutable [Catalogs] snapshot held behind an
//! atomically swapped `Arc`, so `/reload` can never expose a half-reloaded
//! view to a concurrently running handler.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;

/// Catalog file names inside the configuration directory.
const ASSETS_FILE: &str = "assets.json";
const CLIENTS_FILE: &str = "clients.json";
const COLLABS_FILE: &str = "workwith.json";
const CHANNELS_FILE: &str = "channels.json";
const IDENTITIES_FILE: &str = "identities.json";
/// Ticket configuration and the invite ledger ride along in `/backup`.
const TICKETS_FILE: &str = "tickets.json";
const INVITES_FILE: &str = "invites.json";

/// A showcased digital artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub format: String,
    pub status: String,
    pub version: String,
    pub license: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub color: Option<u32>,
    /// `"attachment"` or an http(s) URL.
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub polycount: Option<String>,
    #[serde(default)]
    pub rig: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub software: Option<String>,
}

impl Asset {
    /// Model-type assets carry the extra technical fields.
    pub fn is_model(&self) -> bool {
        self.kind.contains("Model")
    }
}

/// A past client and the work delivered for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntry {
    pub name: String,
    pub role: String,
    /// Comma-separated list of completed tasks.
    pub tasks: String,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
    /// `"attachment"` or an http(s) URL to proof of work.
    #[serde(default)]
    pub proof: Option<String>,
}

/// A collaboration with an external team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collab {
    pub name: String,
    pub description: String,
    /// Comma-separated list of contributions.
    pub contribution: String,
    /// Invite link to the partner server, posted for its preview.
    pub discord: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// A presentable ecosystem channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// A person's profile card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
    /// Markdown source the profile sections are extracted from.
    #[serde(default)]
    pub presentation_markdown: Option<String>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

/// One immutable snapshot of every catalog.
#[derive(Debug, Default)]
pub struct Catalogs {
    pub assets: BTreeMap<String, Asset>,
    pub clients: BTreeMap<String, ClientEntry>,
    pub collabs: BTreeMap<String, Collab>,
    pub channels: BTreeMap<String, ChannelInfo>,
    pub identities: BTreeMap<String, Identity>,
}

/// What a search hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDomain {
    Assets,
    Clients,
    Collabs,
}

impl SearchDomain {
    pub fn emoji(&self) -> &'static str {
        match self {
            SearchDomain::Assets => "📦",
            SearchDomain::Clients => "💼",
            SearchDomain::Collabs => "🤝",
        }
    }
}

/// One `/search` result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub domain: SearchDomain,
    pub id: String,
    pub name: String,
}

impl Catalogs {
    /// Case-insensitive substring search over ids, names and descriptive
    /// text. `domains` restricts which catalogs participate.
    pub fn search(&self, query: &str, domains: &[SearchDomain]) -> Vec<SearchHit> {
        let query = query.to_lowercase();
        let matches = |fields: &[&str]| {
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        };

        let mut hits = Vec::new();

        if domains.contains(&SearchDomain::Assets) {
            for (id, asset) in &self.assets {
                if matches(&[id, &asset.name, &asset.description]) {
                    hits.push(SearchHit {
                        domain: SearchDomain::Assets,
                        id: id.clone(),
                        name: asset.name.clone(),
                    });
                }
            }
        }

        if domains.contains(&SearchDomain::Clients) {
            for (id, client) in &self.clients {
                if matches(&[id, &client.name, &client.role]) {
                    hits.push(SearchHit {
                        domain: SearchDomain::Clients,
                        id: id.clone(),
                        name: client.name.clone(),
                    });
                }
            }
        }

        if domains.contains(&SearchDomain::Collabs) {
            for (id, collab) in &self.collabs {
                if matches(&[id, &collab.name, &collab.description]) {
                    hits.push(SearchHit {
                        domain: SearchDomain::Collabs,
                        id: id.clone(),
                        name: collab.name.clone(),
                    });
                }
            }
        }

        hits
    }
}

/// Owns the current [Catalogs] snapshot and the reload/backup operations.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalogs>>,
}

impl CatalogStore {
    /// Load every catalog from the configuration directory.
    pub fn load() -> Self {
        Self {
            current: RwLock::new(Arc::new(read_catalogs())),
        }
    }

    /// The current snapshot. Handlers keep using the `Arc` they were handed
    /// even if a reload swaps the store mid-flight.
    pub async fn get(&self) -> Arc<Catalogs> {
        self.current.read().await.clone()
    }

    /// Rebuild the snapshot from disk, then swap it in atomically.
    pub async fn reload(&self) -> Arc<Catalogs> {
        let fresh = Arc::new(read_catalogs());
        *self.current.write().await = fresh.clone();
        fresh
    }

    /// Copies every catalog file (plus the ticket configuration) into the
    /// backups directory, suffixed with a unix timestamp. Returns the file
    /// names that were backed up.
    pub async fn backup(&self) -> std::io::Result<(u64, Vec<String>)> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let backup_dir = PathBuf::from("backups");
        tokio::fs::create_dir_all(&backup_dir).await?;

        let files = [
            ASSETS_FILE,
            CLIENTS_FILE,
            COLLABS_FILE,
            CHANNELS_FILE,
            IDENTITIES_FILE,
            TICKETS_FILE,
            INVITES_FILE,
        ];

        let mut copied = Vec::new();
        for file in files {
            let source = crate::setup::config_path(file);
            if !source.exists() {
                continue;
            }
            let stem = file.trim_end_matches(".json");
            let target = backup_dir.join(format!("{stem}-{stamp}.json"));
            tokio::fs::copy(&source, &target).await?;
            copied.push(file.to_string());
        }

        Ok((stamp, copied))
    }
}

fn read_catalogs() -> Catalogs {
    Catalogs {
        assets: load_map(ASSETS_FILE),
        clients: load_map(CLIENTS_FILE),
        collabs: load_map(COLLABS_FILE),
        channels: load_map(CHANNELS_FILE),
        identities: load_map(IDENTITIES_FILE),
    }
}

/// Loads one flat JSON map. A missing or malformed file is reported and
/// yields an empty dataset; only credentials are allowed to stop the bot.
fn load_map<T: DeserializeOwned>(file: &str) -> BTreeMap<String, T> {
    let path = crate::setup::config_path(file);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("Missing file: {file}");
            return BTreeMap::new();
        }
        Err(err) => {
            tracing::error!("Error loading {file}: {err}");
            return BTreeMap::new();
        }
    };

    if content.trim().is_empty() {
        tracing::warn!("Empty file: {file}");
        return BTreeMap::new();
    }

    let mut de = serde_json::Deserializer::from_str(&content);
    match serde_path_to_error::deserialize(&mut de) {
        Ok(map) => map,
        Err(err) => {
            tracing::error!("Error loading {file}: {err}");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalogs {
        let mut catalogs = Catalogs::default();
        catalogs.assets.insert(
            "orbital-vfx".to_string(),
            serde_json::from_value(serde_json::json!({
                "name": "Orbital VFX",
                "type": "VFX Pack",
                "description": "Particle systems for sci-fi scenes",
                "format": ".rbxm",
                "status": "Released",
                "version": "1.2",
                "license": "Commercial",
                "author": "Kentiq",
                "date": "2024-11-02"
            }))
            .unwrap(),
        );
        catalogs.clients.insert(
            "nova-studio".to_string(),
            serde_json::from_value(serde_json::json!({
                "name": "Nova Studio",
                "role": "Lead Developer",
                "tasks": "Framework, Anti-cheat, DataStores"
            }))
            .unwrap(),
        );
        catalogs.collabs.insert(
            "stellar-team".to_string(),
            serde_json::from_value(serde_json::json!({
                "name": "Stellar Team",
                "description": "Large scale sci-fi game",
                "contribution": "VFX, UI, Optimization",
                "discord": "https://discord.gg/stellar"
            }))
            .unwrap(),
        );
        catalogs
    }

    const ALL: &[SearchDomain] = &[
        SearchDomain::Assets,
        SearchDomain::Clients,
        SearchDomain::Collabs,
    ];

    #[test]
    fn search_is_case_insensitive_and_spans_catalogs() {
        let catalogs = sample();
        let hits = catalogs.search("SCI-FI", ALL);
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["orbital-vfx", "stellar-team"]);
    }

    #[test]
    fn search_respects_the_domain_filter() {
        let catalogs = sample();
        let hits = catalogs.search("nova", &[SearchDomain::Assets]);
        assert!(hits.is_empty());

        let hits = catalogs.search("nova", &[SearchDomain::Clients]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Nova Studio");
    }

    #[test]
    fn search_matches_on_ids_too() {
        let catalogs = sample();
        let hits = catalogs.search("orbital-vfx", ALL);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].domain, SearchDomain::Assets);
    }

    #[tokio::test]
    async fn reload_swaps_the_snapshot_atomically() {
        let store = CatalogStore {
            current: RwLock::new(Arc::new(sample())),
        };
        let before = store.get().await;

        // A reload (from an empty test directory) must not mutate the
        // snapshot a running handler already holds.
        let after = store.reload().await;
        assert_eq!(before.assets.len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
