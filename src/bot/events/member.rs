//! Member join and leave handling.
//!
//! A join renames the member into the configured language and posts a welcome
//! embed; a leave posts a goodbye embed. Every failure is logged and swallowed.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::{debug, error, info, warn};

use crate::bot::context::AppContext;
use crate::bot::gateway::{
    Announcement, GatewayError, GuildGateway, MAX_NICKNAME_CHARS, OutgoingMessage,
};
use crate::config::Feature;
use crate::llm::ChatMessage;
use crate::translation::{build_goodbye_prompt, build_welcome_prompt};

const WELCOME_COLOUR: u32 = 0x5C_DB_F0;
const GOODBYE_COLOUR: u32 = 0xED_42_45;

/// The parts of a guild member the handlers need.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub joined_at: Option<DateTime<Utc>>,
    pub is_bot: bool,
}

/// The parts of the guild the handlers need.
#[derive(Debug, Clone)]
pub struct GuildSummary {
    pub name: String,
    pub member_count: u64,
    pub icon_url: Option<String>,
    pub system_channel_id: Option<u64>,
}

/// What happened to the member's nickname during a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicknameOutcome {
    Changed(String),
    Unchanged,
    Skipped,
    Failed(GatewayError),
}

pub async fn handle_member_join(
    app: &AppContext,
    gateway: &dyn GuildGateway,
    member: &MemberProfile,
    guild: &GuildSummary,
) -> NicknameOutcome {
    info!(
        member_id = member.id,
        name = %member.display_name,
        guild = %guild.name,
        "Member joined"
    );

    if member.is_bot {
        debug!(member_id = member.id, "Ignoring bot account");
        return NicknameOutcome::Skipped;
    }

    let translated = match app.translator() {
        Some(translator) => Some(translator.translate_default(&member.display_name).await),
        None => None,
    };

    let outcome = match &translated {
        Some(name) => apply_nickname(gateway, member, name).await,
        None => NicknameOutcome::Skipped,
    };

    let Some(channel_id) = app.settings().welcome_channel_id.or(guild.system_channel_id) else {
        warn!("No welcome channel configured and the guild has no system channel");
        return outcome;
    };

    // Only show a translated name that actually differs from the original
    let shown_name = translated
        .as_deref()
        .filter(|name| *name != member.display_name);

    let language = app.settings().language.name;
    let prompt = build_welcome_prompt(&member.display_name, &guild.name, shown_name, language);
    let description = greeting(app, Feature::Welcome, &prompt, || {
        fallback_welcome(&member.display_name, &guild.name)
    })
    .await;

    let embed = welcome_announcement(member, guild, shown_name, language, description);
    let message = OutgoingMessage::announcement(Some(format!("Welcome <@{}>!", member.id)), embed);

    if let Err(e) = gateway.send_message(channel_id, message).await {
        error!(channel_id, error = %e, "Failed to send welcome message");
    }

    outcome
}

pub async fn handle_member_leave(
    app: &AppContext,
    gateway: &dyn GuildGateway,
    member: &MemberProfile,
    guild: &GuildSummary,
) {
    info!(
        member_id = member.id,
        name = %member.display_name,
        guild = %guild.name,
        "Member left"
    );

    if member.is_bot {
        return;
    }

    let Some(channel_id) = app.settings().goodbye_channel_id.or(guild.system_channel_id) else {
        warn!("No goodbye channel configured and the guild has no system channel");
        return;
    };

    let prompt = build_goodbye_prompt(
        &member.display_name,
        &guild.name,
        app.settings().language.name,
    );
    let description = greeting(app, Feature::Goodbye, &prompt, || {
        fallback_goodbye(&member.display_name)
    })
    .await;

    let message = OutgoingMessage::announcement(None, goodbye_announcement(member, guild, description));
    if let Err(e) = gateway.send_message(channel_id, message).await {
        error!(channel_id, error = %e, "Failed to send goodbye message");
    }
}

async fn apply_nickname(
    gateway: &dyn GuildGateway,
    member: &MemberProfile,
    translated: &str,
) -> NicknameOutcome {
    let nickname: String = translated.chars().take(MAX_NICKNAME_CHARS).collect();
    let nickname = nickname.trim();

    if nickname.is_empty() || nickname == member.display_name {
        debug!(name = %member.display_name, "Nickname unchanged");
        return NicknameOutcome::Unchanged;
    }

    match gateway.set_nickname(member.id, nickname).await {
        Ok(()) => {
            info!(from = %member.display_name, to = %nickname, "Changed nickname");
            NicknameOutcome::Changed(nickname.to_string())
        }
        Err(GatewayError::PermissionDenied) => {
            warn!(
                member_id = member.id,
                "No permission to change nickname (missing Manage Nicknames or higher role)"
            );
            NicknameOutcome::Failed(GatewayError::PermissionDenied)
        }
        Err(e) => {
            error!(member_id = member.id, error = %e, "Failed to change nickname");
            NicknameOutcome::Failed(e)
        }
    }
}

/// Asks the feature's model for a greeting, falling back to a canned one.
async fn greeting(
    app: &AppContext,
    feature: Feature,
    prompt: &[ChatMessage],
    fallback: impl FnOnce() -> String,
) -> String {
    let Some(options) = app.feature(feature) else {
        return fallback();
    };

    match app.generator().generate(prompt, options).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => fallback(),
        Err(e) => {
            warn!(feature = feature.as_str(), error = %e, "Greeting generation failed, using fallback");
            fallback()
        }
    }
}

fn fallback_welcome(name: &str, guild: &str) -> String {
    let messages = [
        format!("Welcome to our community, {name}! Feel free to introduce yourself!"),
        format!("So glad to have you with us, {name}! Make yourself at home!"),
        format!("A new friend has arrived! Welcome to {guild}, {name}!"),
        format!("The community just got better with {name} joining us!"),
        format!("Hello there, {name}! We're excited to have you join our server!"),
    ];
    pick(messages)
}

fn fallback_goodbye(name: &str) -> String {
    let messages = [
        format!("We'll miss you, {name}! Hope to see you again soon!"),
        format!("Sorry to see you go, {name}. The door is always open if you decide to return!"),
        format!("{name} has left the server. Wishing you all the best!"),
        format!("Until we meet again, {name}! Take care!"),
        format!("Farewell, {name}! Thank you for being part of our community!"),
    ];
    pick(messages)
}

fn pick<const N: usize>(messages: [String; N]) -> String {
    messages
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_default()
}

fn welcome_announcement(
    member: &MemberProfile,
    guild: &GuildSummary,
    translated: Option<&str>,
    language: &str,
    description: String,
) -> Announcement {
    let mut embed = Announcement {
        title: format!("Welcome to {}! 🎉", guild.name),
        description,
        colour: WELCOME_COLOUR,
        thumbnail: member.avatar_url.clone().or_else(|| guild.icon_url.clone()),
        footer: Some(format!("ID: {} • {}", member.id, guild.name)),
        ..Announcement::default()
    }
    .field("Member", format!("{} (<@{}>)", member.username, member.id), true);

    if let Some(name) = translated {
        embed = embed.field(format!("{language} Name"), name, true);
    }

    embed
        .field(
            "Account Created",
            format!("<t:{}:R>", member.created_at.timestamp()),
            true,
        )
        .field(
            "Member Count",
            format!("{} members", guild.member_count),
            false,
        )
}

fn goodbye_announcement(
    member: &MemberProfile,
    guild: &GuildSummary,
    description: String,
) -> Announcement {
    let joined = member
        .joined_at
        .map_or_else(|| "Unknown".to_string(), |t| format!("<t:{}:R>", t.timestamp()));

    Announcement {
        title: "Goodbye! 👋".to_string(),
        description,
        colour: GOODBYE_COLOUR,
        thumbnail: member.avatar_url.clone().or_else(|| guild.icon_url.clone()),
        footer: Some(format!("ID: {} • {}", member.id, guild.name)),
        ..Announcement::default()
    }
    .field("Member", &member.username, true)
    .field("Joined Server", joined, true)
    .field(
        "New Member Count",
        format!("{} members", guild.member_count),
        true,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn member() -> MemberProfile {
        MemberProfile {
            id: 42,
            username: "robert".to_string(),
            display_name: "Robert".to_string(),
            avatar_url: None,
            created_at: DateTime::from_timestamp(1_600_000_000, 0).unwrap(),
            joined_at: None,
            is_bot: false,
        }
    }

    fn guild() -> GuildSummary {
        GuildSummary {
            name: "Guild".to_string(),
            member_count: 12,
            icon_url: Some("https://cdn.example/icon.png".to_string()),
            system_channel_id: None,
        }
    }

    #[test]
    fn test_welcome_embed_layout() {
        let embed = welcome_announcement(&member(), &guild(), Some("ロバート"), "Japanese", "Hi".to_string());

        assert_eq!(embed.colour, WELCOME_COLOUR);
        assert_eq!(embed.title, "Welcome to Guild! 🎉");
        let names: Vec<_> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Member", "Japanese Name", "Account Created", "Member Count"]);
        assert_eq!(embed.fields[2].value, "<t:1600000000:R>");
        assert_eq!(embed.thumbnail.as_deref(), Some("https://cdn.example/icon.png"));
    }

    #[test]
    fn test_welcome_embed_without_translation() {
        let embed = welcome_announcement(&member(), &guild(), None, "Japanese", "Hi".to_string());
        assert!(embed.fields.iter().all(|f| f.name != "Japanese Name"));
    }

    #[test]
    fn test_goodbye_embed_layout() {
        let embed = goodbye_announcement(&member(), &guild(), "Bye".to_string());

        assert_eq!(embed.colour, GOODBYE_COLOUR);
        assert_eq!(embed.title, "Goodbye! 👋");
        assert_eq!(embed.fields[1].value, "Unknown");
        assert_eq!(embed.fields[2].value, "12 members");
    }

    #[test]
    fn test_fallbacks_mention_member() {
        for _ in 0..20 {
            assert!(fallback_welcome("Robert", "Guild").contains("Robert"));
            assert!(fallback_goodbye("Robert").contains("Robert"));
        }
    }
}
