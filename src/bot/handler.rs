use serenity::all::{Context, EventHandler, GuildId, Member, Message, Ready, User};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::context::AppContext;
use super::events::{
    GuildSummary, IncomingMessage, MemberProfile, handle_member_join, handle_member_leave,
    handle_message,
};
use super::gateway::SerenityGateway;

/// Discord bot event handler
///
/// Serenity runs each dispatched event in its own task, so handlers only share
/// state through [`AppContext`].
pub struct Handler {
    app: Arc<AppContext>,
}

impl Handler {
    pub const fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    fn is_target_guild(&self, guild_id: GuildId) -> bool {
        self.app
            .settings()
            .guild_id
            .is_none_or(|configured| configured == guild_id.get())
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            guilds = ready.guilds.len(),
            "{} is connected to Discord!",
            ready.user.name
        );
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if !self.is_target_guild(new_member.guild_id) {
            return;
        }

        let member = member_profile(&new_member.user, Some(&new_member));
        let guild = guild_summary(&ctx, new_member.guild_id).await;
        let gateway = SerenityGateway::new(
            Arc::clone(&ctx.cache),
            Arc::clone(&ctx.http),
            new_member.guild_id,
        );

        let outcome = handle_member_join(&self.app, &gateway, &member, &guild).await;
        debug!(member_id = member.id, ?outcome, "Join handled");
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        member_data_if_available: Option<Member>,
    ) {
        if !self.is_target_guild(guild_id) {
            return;
        }

        let member = member_profile(&user, member_data_if_available.as_ref());
        let guild = guild_summary(&ctx, guild_id).await;
        let gateway = SerenityGateway::new(Arc::clone(&ctx.cache), Arc::clone(&ctx.http), guild_id);

        handle_member_leave(&self.app, &gateway, &member, &guild).await;
    }

    async fn message(&self, ctx: Context, message: Message) {
        // Only guild channels, never DMs
        let Some(guild_id) = message.guild_id else {
            return;
        };
        if !self.is_target_guild(guild_id) {
            return;
        }

        let gateway = SerenityGateway::new(Arc::clone(&ctx.cache), Arc::clone(&ctx.http), guild_id);
        let display_name = message
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| message.author.display_name().to_string());

        let incoming = IncomingMessage {
            channel_id: message.channel_id.get(),
            author_id: message.author.id.get(),
            author_name: &display_name,
            author_is_bot: message.author.bot,
            content: &message.content,
        };

        handle_message(&self.app, &gateway, &incoming).await;
    }
}

fn member_profile(user: &User, member: Option<&Member>) -> MemberProfile {
    MemberProfile {
        id: user.id.get(),
        username: user.name.clone(),
        display_name: member.map_or_else(
            || user.display_name().to_string(),
            |m| m.display_name().to_string(),
        ),
        avatar_url: user.avatar_url(),
        created_at: user.created_at().to_utc(),
        joined_at: member.and_then(|m| m.joined_at).map(|t| t.to_utc()),
        is_bot: user.bot,
    }
}

async fn guild_summary(ctx: &Context, guild_id: GuildId) -> GuildSummary {
    // Cache ref must be dropped before the HTTP fallback awaits
    let cached = ctx.cache.guild(guild_id).map(|guild| GuildSummary {
        name: guild.name.clone(),
        member_count: guild.member_count,
        icon_url: guild.icon_url(),
        system_channel_id: guild.system_channel_id.map(|c| c.get()),
    });
    if let Some(summary) = cached {
        return summary;
    }

    match guild_id.to_partial_guild_with_counts(&ctx.http).await {
        Ok(guild) => GuildSummary {
            member_count: guild.approximate_member_count.unwrap_or_default(),
            icon_url: guild.icon_url(),
            system_channel_id: guild.system_channel_id.map(|c| c.get()),
            name: guild.name,
        },
        Err(e) => {
            warn!(%guild_id, error = %e, "Failed to fetch guild");
            GuildSummary {
                name: "the server".to_string(),
                member_count: 0,
                icon_url: None,
                system_channel_id: None,
            }
        }
    }
}
