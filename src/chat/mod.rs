//! Channel-scoped conversational assistant.
//!
//! Holds the per-channel history store, the enable/disable state machine and
//! the parser for the administrative `chatbot` command.

mod chatbot;
/// Administrative command parsing.
pub mod command;
mod history;

pub use chatbot::{Author, Chatbot, ChatbotProfile, FailureMode};
pub use history::{ConversationTurn, HistoryStore, Speaker};
