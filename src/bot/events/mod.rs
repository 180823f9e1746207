//! Platform-independent event handlers, driven through [`GuildGateway`].
//!
//! [`GuildGateway`]: crate::bot::gateway::GuildGateway

mod member;
mod message;

pub use member::{GuildSummary, MemberProfile, NicknameOutcome, handle_member_join, handle_member_leave};
pub use message::{IncomingMessage, command_reply, handle_message};
