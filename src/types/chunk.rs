//! Protocol chunks pushed to the chat UI.

use serde::{Deserialize, Serialize};

/// A single chat-protocol event.
///
/// Serialized with a `type` discriminator matching the UI's wire names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum UiChunk {
    #[serde(rename = "text-start")]
    TextStart { id: String },

    #[serde(rename = "text-delta")]
    TextDelta { id: String, delta: String },

    #[serde(rename = "text-end")]
    TextEnd { id: String },

    #[serde(rename = "data-suggestions")]
    Suggestions { id: String, data: Vec<String> },

    #[serde(rename = "data-modelDownloadProgress")]
    DownloadProgress {
        id: String,
        data: DownloadProgress,
        #[serde(default)]
        transient: bool,
    },

    #[serde(rename = "data-notification")]
    Notification {
        data: Notification,
        #[serde(default)]
        transient: bool,
    },
}

impl UiChunk {
    /// The span or notification id, when the chunk carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::TextStart { id }
            | Self::TextDelta { id, .. }
            | Self::TextEnd { id }
            | Self::Suggestions { id, .. }
            | Self::DownloadProgress { id, .. } => Some(id),
            Self::Notification { .. } => None,
        }
    }

    /// Whether the UI may drop this chunk after rendering it once.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::DownloadProgress { transient, .. } | Self::Notification { transient, .. } => {
                *transient
            }
            _ => false,
        }
    }

    pub fn download_progress(id: impl Into<String>, data: DownloadProgress) -> Self {
        Self::DownloadProgress { id: id.into(), data, transient: true }
    }

    pub fn error_notification(message: impl Into<String>) -> Self {
        Self::Notification {
            data: Notification { message: message.into(), level: NotificationLevel::Error },
            transient: true,
        }
    }
}

/// Download status carried by progress chunks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Downloading,
    Complete,
}

/// Payload of a `data-modelDownloadProgress` chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadProgress {
    pub status: DownloadStatus,
    /// Whole percent in `0..=100`.
    pub progress: u8,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
}

/// Payload of a `data-notification` chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}
