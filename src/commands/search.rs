//! Implements the `/search` command.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::data::catalog::SearchDomain;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// At most this many hits are rendered.
const MAX_RESULTS: usize = 20;

/// What to search.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum SearchType {
    #[name = "All"]
    All,
    #[name = "Assets"]
    Assets,
    #[name = "Clients"]
    Clients,
    #[name = "Collaborations"]
    Collabs,
}

impl SearchType {
    fn domains(self) -> &'static [SearchDomain] {
        match self {
            SearchType::All => &[
                SearchDomain::Assets,
                SearchDomain::Clients,
                SearchDomain::Collabs,
            ],
            SearchType::Assets => &[SearchDomain::Assets],
            SearchType::Clients => &[SearchDomain::Clients],
            SearchType::Collabs => &[SearchDomain::Collabs],
        }
    }
}

/// Search through the archives
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "Search term"] query: String,
    #[description = "Search type"]
    #[rename = "type"]
    kind: Option<SearchType>,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let domains = kind.unwrap_or(SearchType::All).domains();
    let results = catalogs.search(&query, domains);

    if results.is_empty() {
        return Err(UserError::NoSearchResults(query).into());
    }

    let listed = results
        .iter()
        .take(MAX_RESULTS)
        .map(|hit| format!("{} **{}** — {}", hit.domain.emoji(), hit.id, hit.name))
        .join("\n");

    let tip_target = &results[0];
    let tip_command = match tip_target.domain {
        SearchDomain::Assets => "present",
        SearchDomain::Clients => "client",
        SearchDomain::Collabs => "work",
    };

    let embed = serenity::CreateEmbed::new()
        .title(format!("🔍 Search results ({})", results.len()))
        .description(listed)
        .field(
            "💡 Tip",
            format!("Use `/{tip_command} {}` to see the details.", tip_target.id),
            false,
        )
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Search: \"{query}\""
        )))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
