//! Convenience re-exports for common use.

pub use crate::config::{GenerationSettings, TransportConfig};
pub use crate::error::{HearthError, Result};
pub use crate::provider::{LocalModel, ObjectGenerator, ObjectRequest, ObjectStream};
pub use crate::sink::EventSink;
pub use crate::transport::{ChatTransport, LocalChatTransport, SendMessagesRequest, Trigger};
pub use crate::types::{
    Availability, ChatResponse, DownloadStatus, PartialChatResponse, Role, UiChunk, UiMessage,
};
