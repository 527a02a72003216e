//! Message domain types.
//!
//! These are the value objects that flow through the whole system:
//! the user asks → the orchestrator routes → the model answers or requests a
//! capability → capability output comes back as a tool message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returned to the user when a chat turn cannot be completed.
pub const DEFAULT_APOLOGY: &str =
    "Je suis désolé, j'ai rencontré une erreur lors du traitement de votre message.";

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The language model
    Assistant,
    /// Instructions sent to the model; never stored in conversation memory
    System,
    /// Capability output or a corrective note about a capability request
    Tool,
}

/// A single message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// For tool messages, the capability name the message reports on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn with_role(role: Role, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            capability: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content.into())
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content.into())
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content.into())
    }

    /// Create a tool message reporting on the named capability.
    pub fn tool(capability: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Tool, content.into());
        msg.capability = Some(capability.into());
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Salut coach !");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Salut coach !");
        assert!(msg.capability.is_none());
    }

    #[test]
    fn tool_message_carries_capability_name() {
        let msg = Message::tool("expert_sport", "3 séances par semaine");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.capability.as_deref(), Some("expert_sport"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::tool("table_generator", "| a |")).unwrap();
        assert!(json.contains("\"role\":\"tool\""));
        assert!(json.contains("table_generator"));
    }
}
