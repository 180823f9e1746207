use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::llm::ChatMessage;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry of a channel's conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::now(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::now(Speaker::Assistant, text)
    }

    fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> ChatMessage {
        match self.speaker {
            Speaker::User => ChatMessage::user(self.text.clone()),
            Speaker::Assistant => ChatMessage::assistant(self.text.clone()),
        }
    }
}

/// Per-channel bounded conversation logs.
///
/// Each channel keeps at most `max_turns` turns; appending past the bound
/// drops the oldest first. Logs are created on first append and live until
/// cleared or the process exits. The map is sharded, so channels do not
/// contend with each other.
#[derive(Debug)]
pub struct HistoryStore {
    max_turns: NonZeroUsize,
    channels: DashMap<u64, VecDeque<ConversationTurn>>,
}

impl HistoryStore {
    pub fn new(max_turns: NonZeroUsize) -> Self {
        Self {
            max_turns,
            channels: DashMap::new(),
        }
    }

    pub const fn max_turns(&self) -> usize {
        self.max_turns.get()
    }

    pub fn append(&self, channel_id: u64, turn: ConversationTurn) {
        let mut log = self.channels.entry(channel_id).or_default();
        log.push_back(turn);
        while log.len() > self.max_turns.get() {
            log.pop_front();
        }
    }

    /// Turns in chronological order; empty for unknown channels.
    pub fn history(&self, channel_id: u64) -> Vec<ConversationTurn> {
        self.channels
            .get(&channel_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Role-tagged prompt messages for the channel, oldest first.
    pub fn prompt_messages(&self, channel_id: u64) -> Vec<ChatMessage> {
        self.channels
            .get(&channel_id)
            .map(|log| log.iter().map(ConversationTurn::to_message).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, channel_id: u64) -> usize {
        self.channels.get(&channel_id).map_or(0, |log| log.len())
    }

    /// Drops the channel's log, returning how many turns it held.
    pub fn clear(&self, channel_id: u64) -> usize {
        self.channels
            .remove(&channel_id)
            .map_or(0, |(_, log)| log.len())
    }
}
