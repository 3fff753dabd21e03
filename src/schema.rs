//! Response schema and default instructions handed to the generation engine.

use serde_json::json;

/// Default system instruction: short answers plus follow-up suggestions.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant running entirely on the \
user's device. Keep answers concise and brief. Put your answer in `response`. In `suggestions`, \
offer 3 to 4 short follow-up questions the user might ask next, written from the user's \
perspective.";

/// Name the schema is registered under with the engine.
pub const RESPONSE_SCHEMA_NAME: &str = "chat_response";

/// JSON Schema for [`ChatResponse`](crate::types::ChatResponse).
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "response": {
                "type": "string",
                "description": "The answer to the user's message."
            },
            "suggestions": {
                "type": "array",
                "description": "3-4 short follow-up questions from the user's perspective.",
                "items": { "type": "string" },
                "minItems": 3,
                "maxItems": 4
            }
        },
        "required": ["response"],
        "additionalProperties": false
    })
}
