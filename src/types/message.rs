//! Message types for both sides of the transport.
//!
//! [`UiMessage`] is what the chat UI hands in; [`ModelMessage`] is the flat
//! shape the generation engine consumes.

use serde::{Deserialize, Serialize};

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message as stored by the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<UiPart>,
}

impl UiMessage {
    /// Create a message holding a single text part.
    pub fn text(id: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            parts: vec![UiPart::Text { text: text.into() }],
        }
    }

    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(id, Role::User, text)
    }

    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(id, Role::Assistant, text)
    }
}

/// One part of a UI message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiPart {
    Text {
        text: String,
    },
    Reasoning {
        text: String,
    },
    File {
        #[serde(rename = "mediaType")]
        media_type: String,
        url: String,
    },
    /// `data-*`, tool and step parts; the engine never sees these.
    #[serde(other)]
    Other,
}

/// A message in the engine's input format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: String,
}

impl ModelMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}
