//! UI message history → engine messages.

use crate::types::{ModelMessage, UiMessage, UiPart};

/// Flatten UI messages into the engine's input format.
///
/// Text parts are concatenated in order. Reasoning, file and `data-*` parts
/// never reach the model, and messages left without text are dropped.
pub fn convert_ui_messages(messages: &[UiMessage]) -> Vec<ModelMessage> {
    messages
        .iter()
        .filter_map(|message| {
            let content: String = message
                .parts
                .iter()
                .filter_map(|part| match part {
                    UiPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            if content.is_empty() {
                return None;
            }
            Some(ModelMessage {
                role: message.role,
                content,
            })
        })
        .collect()
}
