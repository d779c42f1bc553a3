//! Bot commands.

mod backup;
mod channel;
mod client;
mod com;
mod credits;
mod deploytest;
mod finish;
mod help;
mod identity;
mod invite_program;
mod lists;
mod member;
mod payment;
mod ping;
mod present;
mod pricing;
mod reload;
mod rules;
mod search;
mod setup_access;
mod setup_tickets;
mod setup_welcome;
mod skill;
mod stats;
mod whois;
mod work;

use crate::data::Data;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Convenient type alias for [poise::Command].
pub type Command = poise::Command<Data, PrometheusError>;

/// Embed palette shared across commands.
pub const CYAN: u32 = 0x00BCD4;
pub const GREEN: u32 = 0x2ECC71;
pub const BLUE: u32 = 0x3498DB;
pub const COLLAB_GREEN: u32 = 0x4CAF50;
pub const ACCENT: u32 = 0x5865F2;
pub const ACCENT_ALT: u32 = 0x5B6EE8;
pub const ACCENT_SOFT: u32 = 0x6077DE;

/// Footer used by the archive commands.
pub const ARCHIVIST_FOOTER: &str = "Prometheus • Digital artifact archivist";

/// Lists all the implemented commands
pub fn list() -> Vec<Command> {
    vec![
        present::present(),
        work::work(),
        client::client(),
        identity::identity(),
        whois::whois(),
        channel::channel(),
        pricing::pricing(),
        com::com(),
        ping::ping(),
        help::help(),
        stats::stats(),
        lists::list_assets(),
        lists::list_clients(),
        lists::list_collabs(),
        search::search(),
        reload::reload(),
        backup::backup(),
        rules::rules(),
        payment::payment(),
        member::member(),
        skill::skill(),
        credits::credits(),
        setup_welcome::setup_welcome(),
        setup_tickets::setup_tickets(),
        setup_access::setup_access(),
        invite_program::setup_invite_program(),
        deploytest::deploytest(),
        finish::finish(),
    ]
}

/// Shared autocomplete filter: match the query against ids and display
/// names, propose at most the 25 choices Discord accepts.
fn filter_choices<'a, I>(entries: I, partial: &str) -> Vec<serenity::AutocompleteChoice>
where
    I: Iterator<Item = (&'a String, &'a str)>,
{
    let partial = partial.to_lowercase();
    entries
        .filter(|(id, name)| {
            id.to_lowercase().contains(&partial) || name.to_lowercase().contains(&partial)
        })
        .take(25)
        .map(|(id, name)| serenity::AutocompleteChoice::new(name, id.clone()))
        .collect()
}

pub(crate) async fn autocomplete_asset(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let catalogs = ctx.data().catalogs.get().await;
    filter_choices(
        catalogs.assets.iter().map(|(id, a)| (id, a.name.as_str())),
        partial,
    )
}

pub(crate) async fn autocomplete_client(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let catalogs = ctx.data().catalogs.get().await;
    filter_choices(
        catalogs.clients.iter().map(|(id, c)| (id, c.name.as_str())),
        partial,
    )
}

pub(crate) async fn autocomplete_collab(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let catalogs = ctx.data().catalogs.get().await;
    filter_choices(
        catalogs.collabs.iter().map(|(id, c)| (id, c.name.as_str())),
        partial,
    )
}

pub(crate) async fn autocomplete_channel_entry(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let catalogs = ctx.data().catalogs.get().await;
    filter_choices(
        catalogs
            .channels
            .iter()
            .map(|(id, c)| (id, c.title.as_str())),
        partial,
    )
}

pub(crate) async fn autocomplete_identity(
    ctx: Context<'_>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let catalogs = ctx.data().catalogs.get().await;
    filter_choices(
        catalogs
            .identities
            .iter()
            .map(|(id, i)| (id, i.name.as_str())),
        partial,
    )
}
