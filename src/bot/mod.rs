//! Discord integration: the shared context, serenity wiring and event handlers.

mod context;
pub mod events;
pub mod gateway;
mod handler;
mod start;

pub use context::AppContext;
pub use gateway::{Announcement, EmbedField, GatewayError, GuildGateway, OutgoingMessage, SerenityGateway, TypingIndicator};
pub use handler::Handler;
pub use start::start_bot;
