//! The structured response shape the local model is asked to produce.

use serde::{Deserialize, Serialize};

/// Final, complete response object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatResponse {
    pub response: String,
    /// Follow-up questions from the user's perspective. Only meaningful on
    /// the complete object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ChatResponse {
    /// Suggestions to surface, if any were produced.
    pub fn non_empty_suggestions(&self) -> Option<&[String]> {
        self.suggestions.as_deref().filter(|s| !s.is_empty())
    }
}

/// An incrementally completed [`ChatResponse`]. Every field may be missing.
///
/// Deliberately carries no `suggestions`: a half-formed list must never reach
/// the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PartialChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl PartialChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: Some(response.into()) }
    }
}
