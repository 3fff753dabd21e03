//! Structured generation: partial-object streaming and delta extraction.

pub mod partial_json;
pub mod stream;
pub mod text_object;

pub use partial_json::parse_partial_json;
pub use stream::{stream_response, ResponseDeltaState};
pub use text_object::{TextGenerator, TextObjectGenerator, TextRequest};
