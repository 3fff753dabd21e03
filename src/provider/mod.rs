//! Collaborator traits for the on-device model and its generation engine.

use std::sync::Arc;

use async_trait::async_trait;
use bon::Builder;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::config::GenerationSettings;
use crate::error::HearthError;
use crate::types::{Availability, ChatResponse, ModelMessage, PartialChatResponse};

/// Progress callback handed to session initialization. Receives a fraction
/// in `[0, 1]`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Builds a fresh model binding for every request.
pub type ModelFactory = Arc<dyn Fn() -> Arc<dyn LocalModel> + Send + Sync>;

/// Binding to a device-local model session provider.
#[async_trait]
pub trait LocalModel: Send + Sync {
    /// Model identifier, for logs.
    fn model_id(&self) -> &str;

    /// Whether the model can serve requests right now.
    async fn availability(&self) -> Result<Availability, HearthError>;

    /// Download and initialize a session, reporting progress zero or more
    /// times. Resolves once the model is ready.
    async fn create_session(&self, on_progress: ProgressCallback) -> Result<(), HearthError>;
}

/// A structured-generation request.
#[derive(Debug, Clone, Builder)]
pub struct ObjectRequest {
    #[builder(into)]
    pub system: String,
    pub messages: Vec<ModelMessage>,
    pub schema: serde_json::Value,
    #[builder(into)]
    pub schema_name: String,
    #[builder(default)]
    pub settings: GenerationSettings,
    #[builder(default)]
    pub cancel: CancellationToken,
}

/// Output of a structured-generation call.
///
/// `partials` is forward-only; it ends early when the request's token is
/// canceled. `object` resolves to the complete object once `partials` is
/// drained.
pub struct ObjectStream {
    pub partials: BoxStream<'static, Result<PartialChatResponse, HearthError>>,
    pub object: BoxFuture<'static, Result<ChatResponse, HearthError>>,
}

impl std::fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStream").finish_non_exhaustive()
    }
}

/// Structured-generation engine.
#[async_trait]
pub trait ObjectGenerator: Send + Sync {
    async fn stream_object(
        &self,
        model: Arc<dyn LocalModel>,
        request: ObjectRequest,
    ) -> Result<ObjectStream, HearthError>;
}
