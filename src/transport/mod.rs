//! Chat transport for the on-device model.

pub mod envelope;

pub use envelope::{collect_chunks, create_ui_message_stream, UiMessageStream};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::convert::convert_ui_messages;
use crate::error::Result;
use crate::generation::stream_response;
use crate::provider::{LocalModel, ModelFactory, ObjectGenerator};
use crate::readiness::ensure_ready;
use crate::sink::{ChunkWriter, EventSink};
use crate::types::{ModelMessage, UiChunk, UiMessage};

/// Why the UI is sending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    #[default]
    SubmitMessage,
    RegenerateMessage,
}

/// Input to [`ChatTransport::send_messages`].
///
/// `chat_id`, `message_id` and `trigger` are routing metadata; the
/// transport accepts them but does not act on them.
#[derive(Debug, Clone)]
pub struct SendMessagesRequest {
    pub chat_id: String,
    pub message_id: Option<String>,
    pub trigger: Trigger,
    pub messages: Vec<UiMessage>,
    pub abort: CancellationToken,
}

impl SendMessagesRequest {
    pub fn new(chat_id: impl Into<String>, messages: Vec<UiMessage>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_id: None,
            trigger: Trigger::SubmitMessage,
            messages,
            abort: CancellationToken::new(),
        }
    }

    pub fn with_abort(mut self, abort: CancellationToken) -> Self {
        self.abort = abort;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }
}

/// Transport interface consumed by the chat UI.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_messages(&self, request: SendMessagesRequest) -> Result<UiMessageStream>;

    /// Resume an in-flight response after a dropped connection.
    async fn reconnect_to_stream(&self, chat_id: &str) -> Option<UiMessageStream>;
}

/// [`ChatTransport`] that runs generation on a device-local model.
#[derive(Clone)]
pub struct LocalChatTransport {
    model_factory: ModelFactory,
    generator: Arc<dyn ObjectGenerator>,
    config: Arc<TransportConfig>,
}

impl LocalChatTransport {
    pub fn new(model_factory: ModelFactory, generator: Arc<dyn ObjectGenerator>) -> Self {
        Self {
            model_factory,
            generator,
            config: Arc::new(TransportConfig::default()),
        }
    }

    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl ChatTransport for LocalChatTransport {
    async fn send_messages(&self, request: SendMessagesRequest) -> Result<UiMessageStream> {
        let messages = convert_ui_messages(&request.messages);
        let model = (self.model_factory)();
        let availability = model.availability().await?;
        debug!(
            chat_id = %request.chat_id,
            model = model.model_id(),
            trigger = ?request.trigger,
            %availability,
            messages = messages.len(),
            "hearth send messages"
        );

        let run = Run {
            model,
            generator: self.generator.clone(),
            config: self.config.clone(),
            messages,
            cancel: request.abort,
            needs_setup: !availability.is_available(),
        };
        Ok(create_ui_message_stream(move |writer| run.execute(writer)))
    }

    async fn reconnect_to_stream(&self, chat_id: &str) -> Option<UiMessageStream> {
        debug!(chat_id, "no resumable stream for on-device generation");
        None
    }
}

/// Everything one `send_messages` call owns.
struct Run {
    model: Arc<dyn LocalModel>,
    generator: Arc<dyn ObjectGenerator>,
    config: Arc<TransportConfig>,
    messages: Vec<ModelMessage>,
    cancel: CancellationToken,
    needs_setup: bool,
}

impl Run {
    async fn execute(self, writer: ChunkWriter) -> Result<()> {
        let sink: Arc<dyn EventSink> = Arc::new(writer);
        let result = self.generate(sink.clone()).await;
        match result {
            Err(err) if err.is_canceled() => {
                debug!(model = self.model.model_id(), "hearth run canceled");
                Ok(())
            }
            Err(err) => {
                warn!(model = self.model.model_id(), error = %err, "hearth run failed");
                sink.emit(UiChunk::error_notification(err.user_message()));
                Err(err)
            }
            Ok(()) => Ok(()),
        }
    }

    async fn generate(&self, sink: Arc<dyn EventSink>) -> Result<()> {
        if self.needs_setup {
            ensure_ready(self.model.as_ref(), sink.clone(), &self.config).await?;
        }
        stream_response(
            self.model.clone(),
            self.generator.as_ref(),
            self.messages.clone(),
            sink.as_ref(),
            self.cancel.clone(),
            &self.config,
        )
        .await
    }
}
