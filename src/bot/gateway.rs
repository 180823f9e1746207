//! Outbound Discord operations behind a trait, so event handling can run
//! against a fake guild in tests.

use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMember, GuildId, Http,
    Timestamp, UserId,
};
use serenity::http::{HttpError, Typing};
use serenity::model::ModelError;
use std::sync::Arc;
use thiserror::Error;

/// Discord's JSON error code for "Missing Permissions".
const MISSING_PERMISSIONS: isize = 50013;

/// Longest nickname Discord accepts.
pub const MAX_NICKNAME_CHARS: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The platform rejected the action, usually role hierarchy or a missing
    /// Manage Nicknames permission.
    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("discord error: {0}")]
    Discord(String),
}

impl From<serenity::Error> for GatewayError {
    fn from(err: serenity::Error) -> Self {
        match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
                if response.status_code.as_u16() == 403
                    || response.error.code == MISSING_PERMISSIONS =>
            {
                Self::PermissionDenied
            }
            serenity::Error::Model(
                ModelError::InvalidPermissions { .. } | ModelError::Hierarchy,
            ) => Self::PermissionDenied,
            _ => Self::Discord(err.to_string()),
        }
    }
}

/// An inline embed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed payload for welcome/goodbye posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub fields: Vec<EmbedField>,
    pub thumbnail: Option<String>,
    pub footer: Option<String>,
}

impl Announcement {
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .colour(self.colour)
            .timestamp(Timestamp::now());

        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }
        if let Some(url) = &self.thumbnail {
            embed = embed.thumbnail(url);
        }
        if let Some(text) = &self.footer {
            embed = embed.footer(CreateEmbedFooter::new(text));
        }
        embed
    }
}

/// A message to post: plain text, an embed, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embed: Option<Announcement>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    pub fn announcement(content: Option<String>, embed: Announcement) -> Self {
        Self {
            content,
            embed: Some(embed),
        }
    }

    fn to_create_message(&self) -> Result<CreateMessage, GatewayError> {
        if self.content.as_deref().is_none_or(str::is_empty) && self.embed.is_none() {
            return Err(GatewayError::InvalidInput("empty message".to_string()));
        }

        let mut message = CreateMessage::new();
        if let Some(content) = &self.content {
            message = message.content(content);
        }
        if let Some(embed) = &self.embed {
            message = message.embed(embed.to_embed());
        }
        Ok(message)
    }
}

/// Shows "is typing" in a channel until dropped.
pub struct TypingIndicator(Option<Typing>);

impl TypingIndicator {
    /// An indicator that shows nothing.
    pub const fn none() -> Self {
        Self(None)
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        if let Some(typing) = self.0.take() {
            typing.stop();
        }
    }
}

/// The guild-side actions event handlers perform.
#[async_trait]
pub trait GuildGateway: Send + Sync {
    async fn set_nickname(&self, member_id: u64, nickname: &str) -> Result<(), GatewayError>;

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError>;

    async fn is_administrator(&self, member_id: u64) -> Result<bool, GatewayError>;

    fn start_typing(&self, channel_id: u64) -> TypingIndicator;
}

/// [`GuildGateway`] backed by serenity's HTTP client and cache.
pub struct SerenityGateway {
    cache: Arc<Cache>,
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityGateway {
    pub const fn new(cache: Arc<Cache>, http: Arc<Http>, guild_id: GuildId) -> Self {
        Self {
            cache,
            http,
            guild_id,
        }
    }
}

#[async_trait]
impl GuildGateway for SerenityGateway {
    async fn set_nickname(&self, member_id: u64, nickname: &str) -> Result<(), GatewayError> {
        let count = nickname.chars().count();
        if count == 0 || count > MAX_NICKNAME_CHARS {
            return Err(GatewayError::InvalidInput(format!(
                "nickname must be 1-{MAX_NICKNAME_CHARS} characters, got {count}"
            )));
        }

        self.guild_id
            .edit_member(
                &*self.http,
                UserId::new(member_id),
                EditMember::new().nickname(nickname),
            )
            .await?;
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        let builder = message.to_create_message()?;
        ChannelId::new(channel_id)
            .send_message(&*self.http, builder)
            .await?;
        Ok(())
    }

    async fn is_administrator(&self, member_id: u64) -> Result<bool, GatewayError> {
        let member = self
            .guild_id
            .member((&self.cache, &*self.http), UserId::new(member_id))
            .await?;

        // Guild ref is not Send; resolve permissions before any further await
        let permissions = self
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.member_permissions(&member));

        permissions.map_or_else(
            || {
                Err(GatewayError::Discord(format!(
                    "guild {} is not cached",
                    self.guild_id
                )))
            },
            |p| Ok(p.administrator()),
        )
    }

    fn start_typing(&self, channel_id: u64) -> TypingIndicator {
        TypingIndicator(Some(ChannelId::new(channel_id).start_typing(&self.http)))
    }
}
