//! Stream adapter: partial structured objects → ordered text chunks.

use std::sync::Arc;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{debug_enabled, TransportConfig};
use crate::error::{HearthError, Result};
use crate::provider::{LocalModel, ObjectGenerator, ObjectRequest, ObjectStream};
use crate::schema::{response_schema, RESPONSE_SCHEMA_NAME};
use crate::sink::EventSink;
use crate::types::{ChatResponse, ModelMessage, PartialChatResponse, UiChunk};

/// Per-generation delta state: the last observed `response` and the open
/// text span.
#[derive(Debug, Default)]
pub struct ResponseDeltaState {
    previous: String,
    text_id: Option<String>,
}

impl ResponseDeltaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the open text span, if any text was seen.
    pub fn text_id(&self) -> Option<&str> {
        self.text_id.as_deref()
    }

    /// Fold one partial object into the state, emitting `text-start` and
    /// `text-delta` as needed.
    pub fn apply(&mut self, partial: &PartialChatResponse, sink: &dyn EventSink) {
        let Some(response) = partial.response.as_deref() else {
            return;
        };
        if response == self.previous {
            return;
        }

        let id = match &self.text_id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                sink.emit(UiChunk::TextStart { id: id.clone() });
                self.text_id = Some(id.clone());
                id
            }
        };

        if !response.starts_with(self.previous.as_str()) {
            warn!(
                previous_len = self.previous.len(),
                next_len = response.len(),
                "partial response rewrote earlier text; only the suffix is streamed"
            );
        }
        let delta = response.get(self.previous.len()..).unwrap_or_default();
        if !delta.is_empty() {
            if debug_enabled() {
                debug!(id = %id, delta_len = delta.len(), "text delta");
            }
            sink.emit(UiChunk::TextDelta {
                id,
                delta: delta.to_string(),
            });
        }
        self.previous = response.to_string();
    }

    /// Close the text span, if one was opened.
    pub fn finish(&mut self, sink: &dyn EventSink) {
        if let Some(id) = self.text_id.take() {
            sink.emit(UiChunk::TextEnd { id });
        }
    }
}

/// Emit the terminal suggestions chunk for a complete object.
pub fn emit_suggestions(object: &ChatResponse, sink: &dyn EventSink) {
    if let Some(suggestions) = object.non_empty_suggestions() {
        sink.emit(UiChunk::Suggestions {
            id: Uuid::new_v4().to_string(),
            data: suggestions.to_vec(),
        });
    }
}

/// Run structured generation and stream its `response` text to `sink`.
///
/// Returns once the partial stream is drained and the final object has been
/// inspected for suggestions. A mid-stream failure returns early without a
/// `text-end`; a failure caused by `cancel` is reported as
/// [`HearthError::Canceled`].
pub async fn stream_response(
    model: Arc<dyn LocalModel>,
    generator: &dyn ObjectGenerator,
    messages: Vec<ModelMessage>,
    sink: &dyn EventSink,
    cancel: CancellationToken,
    config: &TransportConfig,
) -> Result<()> {
    let model_id = model.model_id().to_string();
    let request = ObjectRequest::builder()
        .system(config.system_instruction.clone())
        .messages(messages)
        .schema(response_schema())
        .schema_name(RESPONSE_SCHEMA_NAME)
        .settings(config.generation.clone())
        .cancel(cancel.clone())
        .build();

    let ObjectStream { mut partials, object } = generator
        .stream_object(model, request)
        .await
        .map_err(|err| canceled_or(err, &cancel))?;
    debug!(model = %model_id, "structured generation started");

    let mut state = ResponseDeltaState::new();
    while let Some(partial) = partials.next().await {
        let partial = partial.map_err(|err| canceled_or(err, &cancel))?;
        state.apply(&partial, sink);
    }
    state.finish(sink);

    let object = object.await.map_err(|err| canceled_or(err, &cancel))?;
    emit_suggestions(&object, sink);
    debug!(
        model = %model_id,
        response_len = object.response.len(),
        suggestions = object.suggestions.as_ref().map_or(0, Vec::len),
        "structured generation finished"
    );
    Ok(())
}

fn canceled_or(err: HearthError, cancel: &CancellationToken) -> HearthError {
    if cancel.is_cancelled() {
        debug!(error = %err, "generation stopped after cancellation");
        HearthError::Canceled
    } else {
        err
    }
}
