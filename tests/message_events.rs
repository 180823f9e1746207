#![allow(clippy::unwrap_used)]
//! End-to-end chatbot command and reply handling against a fake guild.

mod common;

use common::{CHAT_MODEL, FakeGenerator, FakeGuild, settings, settings_from};
use nickbot::bot::AppContext;
use nickbot::bot::events::{IncomingMessage, handle_message};
use nickbot::llm::{LlmError, Role};
use std::sync::Arc;

const CHANNEL: u64 = 100;
const ADMIN: u64 = 1;
const MEMBER: u64 = 2;

fn app(generator: FakeGenerator) -> (AppContext, Arc<FakeGenerator>) {
    let generator = Arc::new(generator);
    (
        AppContext::with_generator(settings(), Arc::clone(&generator) as _),
        generator,
    )
}

fn guild() -> FakeGuild {
    FakeGuild {
        admins: vec![ADMIN],
        ..FakeGuild::default()
    }
}

fn message(author_id: u64, content: &str) -> IncomingMessage<'_> {
    IncomingMessage {
        channel_id: CHANNEL,
        author_id,
        author_name: if author_id == ADMIN { "Admin" } else { "Alice" },
        author_is_bot: false,
        content,
    }
}

#[tokio::test]
async fn test_disabled_channel_stays_quiet() {
    let (app, generator) = app(FakeGenerator::new().reply(CHAT_MODEL, Ok("hello!")));
    let guild = guild();

    handle_message(&app, &guild, &message(MEMBER, "hi there")).await;

    assert!(guild.sent().is_empty());
    assert!(guild.typing_channels().is_empty());
    assert!(generator.calls_for(CHAT_MODEL).is_empty());
}

#[tokio::test]
async fn test_non_admin_cannot_enable() {
    let (app, _) = app(FakeGenerator::new());
    let guild = guild();

    handle_message(&app, &guild, &message(MEMBER, "!chatbot enable")).await;

    assert!(guild.sent_texts()[0].contains("Administrator permission"));
    assert!(!app.chatbot().unwrap().is_enabled(CHANNEL));
}

#[tokio::test]
async fn test_enable_then_chat() {
    let (app, generator) = app(FakeGenerator::new().reply(CHAT_MODEL, Ok("Hi Alice!")));
    let guild = guild();

    handle_message(&app, &guild, &message(ADMIN, "!chatbot enable")).await;
    handle_message(&app, &guild, &message(MEMBER, "hello Leo")).await;

    let texts = guild.sent_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("Leo is now chatting"));
    assert_eq!(texts[1], "Hi Alice!");
    // Typing is shown only while the reply is generated
    assert_eq!(guild.typing_channels(), vec![CHANNEL]);

    let prompt = &generator.calls_for(CHAT_MODEL)[0];
    assert_eq!(prompt[0].role, Role::System);
    assert_eq!(prompt[1].role, Role::User);
    assert_eq!(prompt[1].content, "[User 2 (Alice)]: hello Leo");

    assert_eq!(app.chatbot().unwrap().history().len(CHANNEL), 2);
}

#[tokio::test]
async fn test_provider_error_never_reaches_users() {
    let (app, _) = app(FakeGenerator::new().reply(
        CHAT_MODEL,
        Err(LlmError::ProviderFailure("status 500: internal trace".to_string())),
    ));
    let guild = guild();

    handle_message(&app, &guild, &message(ADMIN, "!chatbot on")).await;
    handle_message(&app, &guild, &message(MEMBER, "are you there?")).await;

    let texts = guild.sent_texts();
    assert_eq!(texts[1], "I'm unavailable right now.");
    assert!(texts.iter().all(|t| !t.contains("internal trace")));
    // The user turn is kept for the next attempt
    assert_eq!(app.chatbot().unwrap().history().len(CHANNEL), 1);
}

#[tokio::test]
async fn test_bots_and_foreign_commands_ignored() {
    let (app, generator) = app(FakeGenerator::new().reply(CHAT_MODEL, Ok("reply")));
    let guild = guild();
    app.chatbot().unwrap().enable(CHANNEL);

    let mut from_bot = message(MEMBER, "beep");
    from_bot.author_is_bot = true;
    handle_message(&app, &guild, &from_bot).await;
    handle_message(&app, &guild, &message(MEMBER, "!ping")).await;
    handle_message(&app, &guild, &message(MEMBER, "   ")).await;

    assert!(guild.sent().is_empty());
    assert!(generator.calls_for(CHAT_MODEL).is_empty());
}

#[tokio::test]
async fn test_status_clear_and_disable() {
    let (app, _) = app(FakeGenerator::new().reply(CHAT_MODEL, Ok("sure")));
    let guild = guild();

    handle_message(&app, &guild, &message(ADMIN, "!chatbot enable")).await;
    handle_message(&app, &guild, &message(MEMBER, "one")).await;
    handle_message(&app, &guild, &message(ADMIN, "!chatbot status")).await;
    handle_message(&app, &guild, &message(ADMIN, "!chatbot clear")).await;
    handle_message(&app, &guild, &message(ADMIN, "!chatbot disable")).await;

    let texts = guild.sent_texts();
    assert!(texts[2].contains("is enabled"));
    assert!(texts[2].contains("History: 2/6"));
    assert!(texts[3].contains("Cleared 2"));
    assert!(texts[4].contains("stay quiet"));
    assert!(!app.chatbot().unwrap().is_enabled(CHANNEL));
}

#[tokio::test]
async fn test_help_is_open_to_everyone() {
    let (app, _) = app(FakeGenerator::new());
    let guild = guild();

    handle_message(&app, &guild, &message(MEMBER, "!chatbot")).await;

    assert!(guild.sent_texts()[0].contains("!chatbot enable"));
}

#[tokio::test]
async fn test_unconfigured_chatbot_reports_unavailable() {
    let app = AppContext::with_generator(settings_from(""), Arc::new(FakeGenerator::new()));
    let guild = guild();

    handle_message(&app, &guild, &message(ADMIN, "!chatbot enable")).await;
    handle_message(&app, &guild, &message(MEMBER, "hello")).await;

    let texts = guild.sent_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("not configured"));
}
