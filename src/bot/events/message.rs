//! Guild message handling: the `chatbot` admin command and chatbot replies.

use std::fmt::Write as _;
use tracing::{debug, error, warn};

use crate::bot::context::AppContext;
use crate::bot::gateway::{GuildGateway, OutgoingMessage};
use crate::chat::command::{ChatbotCommand, Input, parse_input};
use crate::chat::{Author, Chatbot};

/// A guild text message as seen by the handler.
#[derive(Debug, Clone, Copy)]
pub struct IncomingMessage<'a> {
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: &'a str,
    pub author_is_bot: bool,
    pub content: &'a str,
}

pub async fn handle_message(
    app: &AppContext,
    gateway: &dyn GuildGateway,
    message: &IncomingMessage<'_>,
) {
    if message.author_is_bot {
        return;
    }

    match parse_input(message.content, &app.settings().command_prefix) {
        Input::Empty | Input::Foreign(_) => {}
        Input::Command(command) => handle_command(app, gateway, message, &command).await,
        Input::Text(text) => {
            let Some(chatbot) = app.chatbot() else {
                return;
            };
            let author = Author {
                id: message.author_id,
                name: message.author_name,
            };
            if !chatbot.is_enabled(message.channel_id) {
                return;
            }

            let typing = gateway.start_typing(message.channel_id);
            let reply = chatbot.respond(message.channel_id, author, &text).await;
            drop(typing);

            if let Some(reply) = reply {
                send(gateway, message.channel_id, reply).await;
            }
        }
    }
}

async fn handle_command(
    app: &AppContext,
    gateway: &dyn GuildGateway,
    message: &IncomingMessage<'_>,
    command: &ChatbotCommand,
) {
    let Some(chatbot) = app.chatbot() else {
        send(
            gateway,
            message.channel_id,
            "The chatbot is not configured on this server.",
        )
        .await;
        return;
    };

    if !matches!(command, ChatbotCommand::Help) {
        match gateway.is_administrator(message.author_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(author_id = message.author_id, "Rejected chatbot command from non-admin");
                send(
                    gateway,
                    message.channel_id,
                    "You need the Administrator permission to manage the chatbot.",
                )
                .await;
                return;
            }
            Err(e) => {
                error!(author_id = message.author_id, error = %e, "Failed to check permissions");
                return;
            }
        }
    }

    let reply = command_reply(app, chatbot, message.channel_id, command);
    send(gateway, message.channel_id, reply).await;
}

/// Applies an already-authorised command and returns the confirmation text.
pub fn command_reply(
    app: &AppContext,
    chatbot: &Chatbot,
    channel_id: u64,
    command: &ChatbotCommand,
) -> String {
    let name = &chatbot.profile().bot_name;
    let prefix = &app.settings().command_prefix;

    match command {
        ChatbotCommand::Enable => {
            if chatbot.enable(channel_id) {
                format!("{name} is now chatting in this channel.")
            } else {
                format!("{name} is already enabled in this channel.")
            }
        }
        ChatbotCommand::Disable => {
            if chatbot.disable(channel_id) {
                format!("{name} will stay quiet in this channel.")
            } else {
                format!("{name} is already disabled in this channel.")
            }
        }
        ChatbotCommand::Clear => {
            let removed = chatbot.clear(channel_id);
            format!("Cleared {removed} messages of conversation history.")
        }
        ChatbotCommand::Status => status_report(app, chatbot, channel_id),
        ChatbotCommand::Help => help_text(prefix),
        ChatbotCommand::Unknown(action) => {
            format!("Unknown action `{action}`.\n\n{}", help_text(prefix))
        }
    }
}

fn status_report(app: &AppContext, chatbot: &Chatbot, channel_id: u64) -> String {
    let state = if chatbot.is_enabled(channel_id) {
        "enabled"
    } else {
        "disabled"
    };

    let mut report = format!(
        "**{}** is {state} in this channel.\nHistory: {}/{} messages\nEnabled channels: {}",
        chatbot.profile().bot_name,
        chatbot.history().len(channel_id),
        chatbot.history().max_turns(),
        chatbot.enabled_channels().len(),
    );

    if let Some(stats) = app.llm_stats() {
        let _ = write!(
            report,
            "\nLLM requests: {} total, {} succeeded, {} failed ({:.1}% success)",
            stats.total,
            stats.successful,
            stats.failed,
            stats.success_rate()
        );
    }

    report
}

fn help_text(prefix: &str) -> String {
    format!(
        "**Chatbot commands** (Administrator only)\n\
         `{prefix}chatbot enable`  start replying in this channel\n\
         `{prefix}chatbot disable` stop replying in this channel\n\
         `{prefix}chatbot clear`   forget this channel's conversation\n\
         `{prefix}chatbot status`  show state and usage"
    )
}

async fn send(gateway: &dyn GuildGateway, channel_id: u64, text: impl Into<String>) {
    if let Err(e) = gateway
        .send_message(channel_id, OutgoingMessage::text(text))
        .await
    {
        warn!(channel_id, error = %e, "Failed to send message");
    }
}
