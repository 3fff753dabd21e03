//! Shared test helpers: mock model, scripted generator, chunk inspectors.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::{FutureExt, StreamExt};

use hearth::error::HearthError;
use hearth::provider::{
    LocalModel, ModelFactory, ObjectGenerator, ObjectRequest, ObjectStream, ProgressCallback,
};
use hearth::types::*;

/// A local model with a fixed availability and a scripted download.
pub struct MockModel {
    availability: Availability,
    availability_error: Option<String>,
    progress: Vec<f64>,
    init_error: Option<String>,
    pub availability_calls: AtomicUsize,
    pub session_calls: AtomicUsize,
}

impl MockModel {
    pub fn new(availability: Availability) -> Self {
        Self {
            availability,
            availability_error: None,
            progress: Vec::new(),
            init_error: None,
            availability_calls: AtomicUsize::new(0),
            session_calls: AtomicUsize::new(0),
        }
    }

    pub fn available() -> Self {
        Self::new(Availability::Available)
    }

    /// Downloadable model whose initialization reports `progress` in order.
    pub fn downloadable(progress: &[f64]) -> Self {
        Self::new(Availability::Downloadable).with_progress(progress)
    }

    pub fn with_progress(mut self, progress: &[f64]) -> Self {
        self.progress = progress.to_vec();
        self
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.init_error = Some(message.to_string());
        self
    }

    pub fn failing_availability(mut self, message: &str) -> Self {
        self.availability_error = Some(message.to_string());
        self
    }
}

#[async_trait]
impl LocalModel for MockModel {
    fn model_id(&self) -> &str {
        "mock-on-device"
    }

    async fn availability(&self) -> Result<Availability, HearthError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        match &self.availability_error {
            Some(message) => Err(HearthError::Unavailable(message.clone())),
            None => Ok(self.availability),
        }
    }

    async fn create_session(&self, on_progress: ProgressCallback) -> Result<(), HearthError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        for progress in &self.progress {
            on_progress(*progress);
            tokio::task::yield_now().await;
        }
        match &self.init_error {
            Some(message) => Err(HearthError::initialization(message.clone())),
            None => Ok(()),
        }
    }
}

/// Factory handing out the same shared mock on every call.
pub fn factory_for(model: Arc<MockModel>) -> ModelFactory {
    Arc::new(move || model.clone() as Arc<dyn LocalModel>)
}

/// Generator that replays a fixed list of partial responses.
pub struct ScriptedGenerator {
    partials: Vec<PartialChatResponse>,
    object: ChatResponse,
    fail_after: Option<usize>,
    cancel_after: Option<usize>,
    object_error: Option<String>,
    requests: Mutex<Vec<ObjectRequest>>,
}

impl ScriptedGenerator {
    /// Replays `responses` as partials and resolves to `object`.
    pub fn new(responses: &[&str], object: ChatResponse) -> Self {
        Self {
            partials: responses.iter().map(|r| PartialChatResponse::new(*r)).collect(),
            object,
            fail_after: None,
            cancel_after: None,
            object_error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_partials(mut self, partials: Vec<PartialChatResponse>) -> Self {
        self.partials = partials;
        self
    }

    /// Yield `count` partials, then fail the stream.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Yield `count` partials, then trip the request's cancellation token.
    pub fn canceling_after(mut self, count: usize) -> Self {
        self.cancel_after = Some(count);
        self
    }

    /// Replay every partial, then fail the final object with `message`.
    pub fn failing_object(mut self, message: &str) -> Self {
        self.object_error = Some(message.to_string());
        self
    }

    pub fn requests(&self) -> Vec<ObjectRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectGenerator for ScriptedGenerator {
    async fn stream_object(
        &self,
        _model: Arc<dyn LocalModel>,
        request: ObjectRequest,
    ) -> Result<ObjectStream, HearthError> {
        self.requests.lock().unwrap().push(request.clone());
        let cancel = request.cancel.clone();
        let partials = self.partials.clone();
        let fail_after = self.fail_after;
        let cancel_after = self.cancel_after;

        let stream_cancel = cancel.clone();
        let stream = async_stream::stream! {
            for (index, partial) in partials.into_iter().enumerate() {
                if fail_after == Some(index) {
                    yield Err(HearthError::generation("engine crashed"));
                    return;
                }
                if cancel_after == Some(index) {
                    stream_cancel.cancel();
                }
                if stream_cancel.is_cancelled() {
                    return;
                }
                tokio::task::yield_now().await;
                yield Ok(partial);
            }
        };

        let object = self.object.clone();
        let object_error = self.object_error.clone();
        let object = async move {
            if cancel.is_cancelled() {
                return Err(HearthError::generation("aborted"));
            }
            match object_error {
                Some(message) => Err(HearthError::generation(message)),
                None => Ok(object),
            }
        };

        Ok(ObjectStream {
            partials: stream.boxed(),
            object: object.boxed(),
        })
    }
}

pub fn response(text: &str, suggestions: &[&str]) -> ChatResponse {
    ChatResponse {
        response: text.to_string(),
        suggestions: Some(suggestions.iter().map(|s| s.to_string()).collect()),
    }
}

/// Short label per chunk, for order assertions.
pub fn kinds(chunks: &[UiChunk]) -> Vec<&'static str> {
    chunks
        .iter()
        .map(|chunk| match chunk {
            UiChunk::TextStart { .. } => "text-start",
            UiChunk::TextDelta { .. } => "text-delta",
            UiChunk::TextEnd { .. } => "text-end",
            UiChunk::Suggestions { .. } => "data-suggestions",
            UiChunk::DownloadProgress { .. } => "data-modelDownloadProgress",
            UiChunk::Notification { .. } => "data-notification",
        })
        .collect()
}

pub fn text_deltas(chunks: &[UiChunk]) -> Vec<String> {
    chunks
        .iter()
        .filter_map(|chunk| match chunk {
            UiChunk::TextDelta { delta, .. } => Some(delta.clone()),
            _ => None,
        })
        .collect()
}

pub fn progress_events(chunks: &[UiChunk]) -> Vec<(String, DownloadStatus, u8)> {
    chunks
        .iter()
        .filter_map(|chunk| match chunk {
            UiChunk::DownloadProgress { id, data, .. } => Some((id.clone(), data.status, data.progress)),
            _ => None,
        })
        .collect()
}
