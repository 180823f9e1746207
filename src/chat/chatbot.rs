use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::history::{ConversationTurn, HistoryStore};
use crate::llm::{ChatMessage, GenerateOptions, TextGenerator};

/// Discord rejects messages over 2000 characters.
const MAX_REPLY_CHARS: usize = 1990;

/// What users see when the model cannot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Reply with the configured generic message.
    #[default]
    Reply,
    /// Say nothing.
    Silent,
}

/// Persona and failure behaviour of the assistant.
#[derive(Debug, Clone)]
pub struct ChatbotProfile {
    pub bot_name: String,
    pub personality: String,
    pub failure_mode: FailureMode,
    pub failure_message: String,
}

/// Identity of the author of an incoming chat message.
#[derive(Debug, Clone, Copy)]
pub struct Author<'a> {
    pub id: u64,
    pub name: &'a str,
}

/// Channel-scoped conversational assistant.
///
/// Each channel is either Disabled (the default) or Enabled. Enabled channels
/// get a reply to every qualifying message, built from the channel's history.
pub struct Chatbot {
    generator: Arc<dyn TextGenerator>,
    options: GenerateOptions,
    profile: ChatbotProfile,
    history: HistoryStore,
    enabled: DashSet<u64>,
}

impl Chatbot {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        options: GenerateOptions,
        profile: ChatbotProfile,
        history: HistoryStore,
        enabled_channels: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            generator,
            options,
            profile,
            history,
            enabled: enabled_channels.into_iter().collect(),
        }
    }

    pub const fn profile(&self) -> &ChatbotProfile {
        &self.profile
    }

    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_enabled(&self, channel_id: u64) -> bool {
        self.enabled.contains(&channel_id)
    }

    /// Returns `false` if the channel was already enabled.
    pub fn enable(&self, channel_id: u64) -> bool {
        let changed = self.enabled.insert(channel_id);
        if changed {
            info!(channel_id, "Chatbot enabled");
        }
        changed
    }

    /// Returns `false` if the channel was already disabled.
    pub fn disable(&self, channel_id: u64) -> bool {
        let changed = self.enabled.remove(&channel_id).is_some();
        if changed {
            info!(channel_id, "Chatbot disabled");
        }
        changed
    }

    pub fn enabled_channels(&self) -> Vec<u64> {
        let mut channels: Vec<u64> = self.enabled.iter().map(|c| *c).collect();
        channels.sort_unstable();
        channels
    }

    pub fn clear(&self, channel_id: u64) -> usize {
        let removed = self.history.clear(channel_id);
        info!(channel_id, removed, "Chatbot history cleared");
        removed
    }

    /// Runs one conversational step and returns the text to send, if any.
    ///
    /// The user turn is recorded before the model is called and stays in the
    /// log even when the call fails. Raw provider errors are only logged.
    pub async fn respond(&self, channel_id: u64, author: Author<'_>, text: &str) -> Option<String> {
        if !self.is_enabled(channel_id) {
            return None;
        }

        self.history.append(
            channel_id,
            ConversationTurn::user(format!("[User {} ({})]: {text}", author.id, author.name)),
        );

        let mut prompt = vec![ChatMessage::system(self.system_prompt(author))];
        prompt.extend(self.history.prompt_messages(channel_id));

        debug!(channel_id, turns = prompt.len() - 1, "Generating chatbot reply");

        match self.generator.generate(&prompt, &self.options).await {
            Ok(reply) => {
                let reply = truncate_reply(&reply);
                self.history
                    .append(channel_id, ConversationTurn::assistant(reply.clone()));
                Some(reply)
            }
            Err(e) => {
                warn!(channel_id, error = %e, "Chatbot reply failed");
                match self.profile.failure_mode {
                    FailureMode::Reply => Some(self.profile.failure_message.clone()),
                    FailureMode::Silent => None,
                }
            }
        }
    }

    fn system_prompt(&self, author: Author<'_>) -> String {
        format!(
            "You are {name}, a Discord bot chatting in a server with multiple users.\n\
             {personality}\n\n\
             The latest message is from user {id} ({user}). Each user message is prefixed \
             with the author's id and display name; track users by id, since display names \
             can change.\n\n\
             Guidelines:\n\
             - Be conversational but brief (1-3 sentences unless more is needed)\n\
             - Use Discord markdown where it helps\n\
             - Keep responses under 1800 characters",
            name = self.profile.bot_name,
            personality = self.profile.personality,
            id = author.id,
            user = author.name,
        )
    }
}

fn truncate_reply(reply: &str) -> String {
    if reply.chars().count() > MAX_REPLY_CHARS {
        warn!(chars = reply.chars().count(), "Truncating long chatbot reply");
        format!("{}...", reply.chars().take(MAX_REPLY_CHARS).collect::<String>())
    } else {
        reply.to_string()
    }
}
