//! Conversation turn types.
//!
//! This module contains types for representing turns in a conversation,
//! including roles and turn content.

use crate::citation::Citation;
use serde::{Deserialize, Serialize};

/// Represents the author of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Turn authored by the person.
    #[serde(rename = "user")]
    User,
    /// Turn authored by the answering collaborator.
    #[serde(rename = "assistant")]
    Assistant,
}

/// A single turn in a conversation transcript.
///
/// Turns are immutable once appended; the only removal the transcript
/// performs is dropping the transient placeholder that stands in for an
/// answer in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The author of the turn.
    pub role: Role,
    /// The content of the turn.
    pub content: String,
    /// Sources cited by the answer, empty when none were provided.
    #[serde(default)]
    pub sources: Vec<Citation>,
    /// Suggested follow-up questions, empty when none were provided.
    #[serde(default)]
    pub follow_ups: Vec<String>,
    /// Marks a transient "answer in progress" turn.
    #[serde(default, skip_serializing)]
    pub is_placeholder: bool,
}

impl Turn {
    /// Creates a user turn with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            follow_ups: Vec::new(),
            is_placeholder: false,
        }
    }

    /// Creates an assistant turn with the given content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: Vec::new(),
            follow_ups: Vec::new(),
            is_placeholder: false,
        }
    }

    /// Creates the transient placeholder shown while an answer is pending.
    pub fn placeholder() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            sources: Vec::new(),
            follow_ups: Vec::new(),
            is_placeholder: true,
        }
    }

    pub fn with_sources(mut self, sources: Vec<Citation>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_follow_ups(mut self, follow_ups: Vec<String>) -> Self {
        self.follow_ups = follow_ups;
        self
    }

    /// Returns true for user turns.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Turn::user("oi").role, Role::User);
        assert_eq!(Turn::assistant("olá").role, Role::Assistant);
        assert!(!Turn::user("oi").is_placeholder);
    }

    #[test]
    fn placeholder_is_empty_assistant_turn() {
        let turn = Turn::placeholder();
        assert_eq!(turn.role, Role::Assistant);
        assert!(turn.content.is_empty());
        assert!(turn.is_placeholder);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
