//! Structured generation on top of a plain text stream.
//!
//! Some on-device runtimes can only stream raw text. [`TextObjectGenerator`]
//! asks them for JSON matching the response schema, repairs every prefix
//! with [`parse_partial_json`] and yields a new partial object whenever the
//! parsed value changes.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{FutureExt, StreamExt};
use tokio::sync::oneshot;
use tracing::debug;

use crate::config::GenerationSettings;
use crate::error::{HearthError, Result};
use crate::provider::{LocalModel, ObjectGenerator, ObjectRequest, ObjectStream};
use crate::types::{ChatResponse, ModelMessage, PartialChatResponse};

use super::partial_json::{parse_partial_json, strip_code_fences};

/// A plain text-generation request.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub system: String,
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
}

/// Runtime that streams raw text deltas.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn stream_text(
        &self,
        model: Arc<dyn LocalModel>,
        request: TextRequest,
    ) -> Result<BoxStream<'static, Result<String>>>;
}

/// [`ObjectGenerator`] backed by a [`TextGenerator`].
#[derive(Clone)]
pub struct TextObjectGenerator {
    text: Arc<dyn TextGenerator>,
}

impl TextObjectGenerator {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }
}

/// System text with the JSON schema appended, for runtimes without native
/// structured output.
pub fn schema_instruction(request: &ObjectRequest) -> String {
    format!(
        "{}\n\nYou must respond with ONLY valid JSON (no markdown, no explanation) matching this schema:\n```json\n{}\n```",
        request.system,
        serde_json::to_string_pretty(&request.schema).unwrap_or_default()
    )
}

/// Parse the complete text into the final object.
pub fn parse_final_object(text: &str) -> Result<ChatResponse> {
    Ok(serde_json::from_str(strip_code_fences(text))?)
}

fn partial_from_text(text: &str) -> Option<PartialChatResponse> {
    parse_partial_json(text).and_then(|value| serde_json::from_value(value).ok())
}

#[async_trait]
impl ObjectGenerator for TextObjectGenerator {
    async fn stream_object(
        &self,
        model: Arc<dyn LocalModel>,
        request: ObjectRequest,
    ) -> Result<ObjectStream> {
        let cancel = request.cancel.clone();
        let text_request = TextRequest {
            system: schema_instruction(&request),
            messages: request.messages,
            settings: request.settings,
        };
        let mut deltas = self.text.stream_text(model, text_request).await?;
        let (object_tx, object_rx) = oneshot::channel::<Result<ChatResponse>>();

        let partials = async_stream::stream! {
            let mut text = String::new();
            let mut last: Option<PartialChatResponse> = None;
            let mut outcome: Result<()> = Ok(());

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        outcome = Err(HearthError::Canceled);
                        None
                    }
                    next = deltas.next() => next,
                };
                let Some(delta) = next else {
                    break;
                };
                match delta {
                    Ok(delta) => {
                        text.push_str(&delta);
                        if let Some(partial) = partial_from_text(&text) {
                            if last.as_ref() != Some(&partial) {
                                last = Some(partial.clone());
                                yield Ok(partial);
                            }
                        }
                    }
                    Err(err) => {
                        outcome = Err(HearthError::Stream(err.to_string()));
                        yield Err(err);
                        break;
                    }
                }
            }

            let object = outcome.and_then(|()| parse_final_object(&text));
            if let Err(err) = &object {
                debug!(error = %err, text_len = text.len(), "text stream produced no final object");
            }
            let _ = object_tx.send(object);
        };

        let object = async move {
            object_rx.await.unwrap_or_else(|_| {
                Err(HearthError::Stream(
                    "partial stream dropped before the final object resolved".into(),
                ))
            })
        };

        Ok(ObjectStream {
            partials: partials.boxed(),
            object: object.boxed(),
        })
    }
}
