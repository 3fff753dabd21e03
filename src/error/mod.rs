//! Error types for Hearth.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all transport operations.
#[derive(Error, Debug)]
pub enum HearthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Local model unavailable: {0}")]
    Unavailable(String),

    #[error("Model initialization failed: {0}")]
    Initialization(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request canceled")]
    Canceled,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl HearthError {
    /// Create a generation error from any displayable cause.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an initialization error from any displayable cause.
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unavailable(_) | Self::Initialization(_) => ErrorCategory::Setup,
            Self::Generation(_) | Self::Stream(_) => ErrorCategory::Generation,
            Self::Canceled => ErrorCategory::Canceled,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidState(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error only reflects the caller aborting the request.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Unavailable(_) => RecoverySuggestion::UseSupportedDevice,
            Self::Initialization(_) | Self::Generation(_) | Self::Stream(_) => {
                RecoverySuggestion::RetryLater
            }
            Self::Configuration(_) => RecoverySuggestion::CheckConfiguration,
            _ => RecoverySuggestion::None,
        }
    }

    /// Human-readable text for the error notification shown in the chat UI,
    /// followed by the recovery hint when there is one.
    pub fn user_message(&self) -> String {
        let message = match self.category() {
            ErrorCategory::Setup => format!("The on-device model could not be prepared. {self}"),
            ErrorCategory::Generation | ErrorCategory::Serialization => {
                format!("The on-device model failed to respond. {self}")
            }
            _ => self.to_string(),
        };
        match self.recovery_suggestion().hint() {
            Some(hint) => format!("{message} {hint}"),
            None => message,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HearthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_errors_share_a_category() {
        assert_eq!(
            HearthError::Unavailable("no gpu".into()).category(),
            ErrorCategory::Setup
        );
        assert_eq!(
            HearthError::initialization("disk full").category(),
            ErrorCategory::Setup
        );
    }

    #[test]
    fn user_message_keeps_the_cause() {
        let message = HearthError::generation("engine crashed").user_message();
        assert!(message.starts_with("The on-device model failed to respond."));
        assert!(message.contains("engine crashed"));
        assert!(message.ends_with("Try again later."));
    }

    #[test]
    fn user_message_without_a_hint_is_just_the_error() {
        assert_eq!(HearthError::Canceled.user_message(), "Request canceled");
        assert_eq!(
            HearthError::InvalidState("stream already taken".into()).user_message(),
            "Invalid state: stream already taken"
        );
    }

    #[test]
    fn only_canceled_is_canceled() {
        assert!(HearthError::Canceled.is_canceled());
        assert!(!HearthError::generation("x").is_canceled());
    }
}
