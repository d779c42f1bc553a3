//! Implements the `/pricing` command.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::Context;

/// Displays information about services and pricing
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn pricing(
    ctx: Context<'_>,
    #[description = "The channel where users should create tickets"]
    #[channel_types("Text")]
    ticket_channel: Option<serenity::GuildChannel>,
) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    let ticket_mention = ticket_channel
        .map(|c| c.id.mention().to_string())
        .unwrap_or_else(|| "the dedicated ticket channel".to_string());

    let embed = serenity::CreateEmbed::new()
        .color(commands::GREEN)
        .title("✨ Kentiq: Your Partner for Roblox Development ✨")
        .description(
            "Hello everyone. This channel is dedicated to presenting the professional \
             development and design services I have the opportunity to offer. My aim is \
             to provide concrete expertise to help bring your Roblox projects to life.",
        )
        .field(
            "\u{200B}",
            "**How I Can Assist You:**\nThrough various projects, I've had the chance to \
             develop a certain expertise in system architecture and performance-focused \
             development. I hope this experience can be beneficial to you. Here are some \
             areas where I can provide support:",
            false,
        )
        .field(
            "💻 Code & System Architecture",
            "• Development of custom frameworks and modular systems.\n\
             • Implementation of advanced backend logic (DataStores, basic anti-cheat \
             considerations).\n\
             • Performance optimization and scalability solutions.\n\
             • Integration of APIs (Roblox and external).",
            false,
        )
        .field(
            "📐 Models & Asset Creation",
            "• High-quality 3D modeling (props, environments, characters).\n\
             • Optimized asset pipelines for performance.",
            false,
        )
        .field(
            "🎬 Animation & VFX",
            "• Smooth character animations and cinematic sequences.\n\
             • Custom visual effects (VFX).",
            false,
        )
        .field(
            "🎧 SFX & Audio Design",
            "• Creation of immersive soundscapes and custom sound effects.",
            false,
        )
        .field(
            "🎨 UX-UI & Graphics",
            "• Design and implementation of intuitive user interfaces (UI).\n\
             • Branding and visual identity development for your project.",
            false,
        )
        .field(
            "🌐 Web Development",
            "• Development of custom web dashboards and game management tools \
             (front-end & back-end).",
            false,
        )
        .field("\u{200B}", "\u{200B}", false)
        .field(
            "My Approach & Pricing",
            "My goal is to deliver not just functional code, but robust, maintainable, \
             and well-documented solutions that provide **lasting value** to your \
             project. As each project is unique and has specific requirements, **all my \
             services are quoted on a customized basis.**\n\nThe pricing will humbly \
             reflect the complexity of the work, the specialized expertise required, and \
             the long-term value that, I hope, my solutions will bring to your project's \
             success and longevity.",
            false,
        )
        .field("\u{200B}", "\u{200B}", false)
        .field(
            "How to Start (Essential First Step)",
            format!(
                "1.  **Open a Ticket:** To request a quote or discuss a project, please \
                 open a new ticket in {ticket_mention}.\n\
                 2.  **Briefly Describe Your Project:** In the ticket, please provide an \
                 overview of your game, the specific task for which you need \
                 assistance, and your general objectives.\n\
                 3.  **Initial Consultation:** We will then arrange a brief consultation \
                 to discuss your needs in detail and determine the best approach.\n\
                 4.  **Custom Quote:** Following our discussion, you will receive a \
                 personalized quote detailing the scope of work, deliverables, timeline, \
                 and pricing."
            ),
            false,
        )
        .field("\u{200B}", "\u{200B}", false)
        .field(
            "Discover My Work",
            "Feel free to browse my portfolio to see examples of my past projects and \
             technical approach:\n\
             •   **Kentiq Portfolio:** You can explore dedicated channels like \
             #〚💻〛𝖢𝗈𝖽𝖾, #〚🔊〛𝖲𝖥𝖷, etc.\n\
             •   **My Website:** [https://www.kentiq.tech/portal](https://www.kentiq.tech/portal)",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new("Sincerely, Kentiq"));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
