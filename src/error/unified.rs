//! Error classification used by the transport's failure boundary.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The on-device model could not be made ready.
    Setup,
    /// The generation engine failed mid-stream.
    Generation,
    /// The caller aborted the request.
    Canceled,
    Configuration,
    Serialization,
    Unknown,
}

/// Suggested recovery action shown alongside an error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// The device or browser cannot run the local model.
    UseSupportedDevice,
    /// The model download or session setup failed; the user can try again.
    RetryLater,
    CheckConfiguration,
    None,
}

impl RecoverySuggestion {
    /// Sentence appended to the user-facing error message.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::UseSupportedDevice => Some("This device may not support on-device models."),
            Self::RetryLater => Some("Try again later."),
            Self::CheckConfiguration => Some("Check the transport configuration."),
            Self::None => None,
        }
    }
}
