//! # nickbot - Discord community bot
//!
//! `nickbot` greets members, renames newcomers into a configured language and
//! runs an opt-in per-channel chatbot, all backed by OpenAI-compatible LLM
//! endpoints.
//!
//! ## Features
//!
//! - **Nickname translation**: joining members get their display name
//!   translated (LRU-cached, with a deterministic transliteration fallback)
//! - **Greetings**: LLM-written welcome and goodbye embeds with canned fallbacks
//! - **Chatbot**: per-channel conversations with bounded history, toggled by
//!   administrators with `!chatbot enable|disable|clear|status`
//! - **Rate limiting**: one sliding window shared by every outbound LLM call
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate configuration
//! nickbot check
//!
//! # Try a translation without connecting to Discord
//! nickbot translate Robert --to ja
//!
//! # Run the bot
//! DISCORD_BOT_TOKEN=... nickbot run
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/nickbot/config.toml`:
//!
//! ```toml
//! [bot]
//! guild_id = 123456789012345678
//! welcome_channel_id = 123456789012345679
//!
//! [translation]
//! language = "Japanese"
//!
//! [providers.groq]
//! endpoint = "https://api.groq.com/openai/v1"
//! api_key_env = "GROQ_API_KEY"
//!
//! [features.translation]
//! provider = "groq"
//! model = "llama-3.3-70b-versatile"
//! ```

/// Discord integration: context, gateway, event handlers.
pub mod bot;

/// In-memory LRU translation cache.
pub mod cache;

/// Channel chatbot: history store, command parsing, conversation flow.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and settings resolution.
pub mod config;

/// LLM client, errors and the shared rate limiter.
pub mod llm;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Name translation and transliteration fallback.
pub mod translation;

/// Terminal styling for CLI output.
pub mod ui;
