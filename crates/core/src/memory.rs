//! Conversation memory — the append-only message log of one session.
//!
//! A `ConversationMemory` is owned by exactly one orchestrator. It only
//! grows: there is no eviction, pruning, or summarization, and nothing is
//! persisted across process restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ConversationId, Message};

/// Ordered messages plus a free-form context mapping for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    /// Unique conversation ID
    pub id: ConversationId,

    messages: Vec<Message>,

    /// Free-form per-request context (string keys, arbitrary values)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    context: serde_json::Map<String, serde_json::Value>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,
}

impl ConversationMemory {
    /// Create a new empty memory.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            context: serde_json::Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append one message at the end of the log.
    pub fn append(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Append a batch of messages, preserving their order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.append(message);
        }
    }

    /// The messages in conversation order.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Merge keys into the context mapping. Existing keys are overwritten.
    pub fn merge_context(&mut self, context: serde_json::Map<String, serde_json::Value>) {
        self.context.extend(context);
    }

    pub fn context(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.context
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn append_preserves_order() {
        let mut memory = ConversationMemory::new();
        memory.append(Message::user("Bonjour"));
        memory.append(Message::assistant("Bonjour ! Comment puis-je aider ?"));
        memory.append(Message::tool("expert_sport", "conseil"));

        let roles: Vec<Role> = memory.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool]);
    }

    #[test]
    fn extend_appends_batch_in_order() {
        let mut memory = ConversationMemory::new();
        memory.append(Message::user("premier"));
        memory.extend(vec![Message::user("deuxième"), Message::assistant("troisième")]);
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.history()[1].content, "deuxième");
        assert_eq!(memory.history()[2].content, "troisième");
    }

    #[test]
    fn tracks_updates() {
        let mut memory = ConversationMemory::new();
        let created = memory.created_at;
        memory.append(Message::user("First message"));
        assert!(memory.updated_at >= created);
        assert!(!memory.is_empty());
    }

    #[test]
    fn context_merge_overwrites_keys() {
        let mut memory = ConversationMemory::new();
        let mut first = serde_json::Map::new();
        first.insert("level".into(), serde_json::json!("débutant"));
        memory.merge_context(first);

        let mut second = serde_json::Map::new();
        second.insert("level".into(), serde_json::json!("intermédiaire"));
        second.insert("injury".into(), serde_json::json!("genou"));
        memory.merge_context(second);

        assert_eq!(memory.context().len(), 2);
        assert_eq!(memory.context()["level"], "intermédiaire");
    }
}
