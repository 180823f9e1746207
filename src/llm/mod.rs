//! Outbound LLM access: the OpenAI-compatible client and the limiter that gates it.

mod client;
mod error;
mod message;
/// Sliding-window limiter shared by every outbound LLM call.
pub mod rate_limit;

pub use client::{GenerateOptions, LlmClient, LlmStats, MAX_RETRIES, TextGenerator};
pub use error::LlmError;
pub use message::{ChatMessage, Role};
pub use rate_limit::{RateLimiter, Reservation};
