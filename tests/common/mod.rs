//! Fakes shared by the event-handling integration tests.

#![allow(clippy::unwrap_used, dead_code)]

use async_trait::async_trait;
use nickbot::bot::{GatewayError, GuildGateway, OutgoingMessage, TypingIndicator};
use nickbot::config::{ConfigFile, ResolveOptions, Settings, resolve_settings};
use nickbot::llm::{ChatMessage, GenerateOptions, LlmError, TextGenerator};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const WELCOME_CHANNEL: u64 = 5678;
pub const GOODBYE_CHANNEL: u64 = 8765;

pub const TRANSLATE_MODEL: &str = "translate-model";
pub const WELCOME_MODEL: &str = "welcome-model";
pub const GOODBYE_MODEL: &str = "goodbye-model";
pub const CHAT_MODEL: &str = "chat-model";

/// Settings with every feature on a distinct model, so the fake generator
/// can answer per feature.
pub fn settings() -> Settings {
    settings_from(&format!(
        r#"
[bot]
token_env = "NICKBOT_TEST_UNSET_TOKEN"
welcome_channel_id = {WELCOME_CHANNEL}
goodbye_channel_id = {GOODBYE_CHANNEL}

[translation]
language = "Japanese"
cache_capacity = 10

[chatbot]
bot_name = "Leo"
max_history = 6
failure_message = "I'm unavailable right now."

[providers.fake]
endpoint = "http://fake.invalid/v1"

[features.translation]
provider = "fake"
model = "{TRANSLATE_MODEL}"

[features.welcome]
provider = "fake"
model = "{WELCOME_MODEL}"

[features.goodbye]
provider = "fake"
model = "{GOODBYE_MODEL}"

[features.chat]
provider = "fake"
model = "{CHAT_MODEL}"
"#
    ))
}

pub fn settings_from(toml: &str) -> Settings {
    let config: ConfigFile = toml::from_str(toml).unwrap();
    resolve_settings(&ResolveOptions::default(), &config).unwrap()
}

/// Answers by model name and records every call.
#[derive(Default)]
pub struct FakeGenerator {
    replies: HashMap<&'static str, Result<String, LlmError>>,
    delay: Duration,
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reply(mut self, model: &'static str, reply: Result<&str, LlmError>) -> Self {
        self.replies.insert(model, reply.map(str::to_string));
        self
    }

    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls_for(&self, model: &str) -> Vec<Vec<ChatMessage>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == model)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((options.model.clone(), prompt.to_vec()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .get(options.model.as_str())
            .cloned()
            .unwrap_or_else(|| Err(LlmError::ProviderFailure("no scripted reply".to_string())))
    }
}

/// In-memory guild recording every outbound action.
#[derive(Default)]
pub struct FakeGuild {
    pub deny_nicknames: bool,
    pub admins: Vec<u64>,
    pub nicknames: Mutex<Vec<(u64, String)>>,
    pub messages: Mutex<Vec<(u64, OutgoingMessage)>>,
    pub typing: Mutex<Vec<u64>>,
}

impl FakeGuild {
    pub fn sent(&self) -> Vec<(u64, OutgoingMessage)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|(_, m)| m.content)
            .collect()
    }

    pub fn nicknames(&self) -> Vec<(u64, String)> {
        self.nicknames.lock().unwrap().clone()
    }

    pub fn typing_channels(&self) -> Vec<u64> {
        self.typing.lock().unwrap().clone()
    }
}

#[async_trait]
impl GuildGateway for FakeGuild {
    async fn set_nickname(&self, member_id: u64, nickname: &str) -> Result<(), GatewayError> {
        if self.deny_nicknames {
            return Err(GatewayError::PermissionDenied);
        }
        self.nicknames
            .lock()
            .unwrap()
            .push((member_id, nickname.to_string()));
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        self.messages.lock().unwrap().push((channel_id, message));
        Ok(())
    }

    async fn is_administrator(&self, member_id: u64) -> Result<bool, GatewayError> {
        Ok(self.admins.contains(&member_id))
    }

    fn start_typing(&self, channel_id: u64) -> TypingIndicator {
        self.typing.lock().unwrap().push(channel_id);
        TypingIndicator::none()
    }
}
