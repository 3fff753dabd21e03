//! Readiness gate: make sure the local model is loaded before generating.
//!
//! When the model is not immediately available, session initialization is
//! driven here and its progress callback is translated into
//! `data-modelDownloadProgress` chunks sharing one id, finished by exactly
//! one `complete` chunk.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TransportConfig;
use crate::error::{HearthError, Result};
use crate::provider::{LocalModel, ProgressCallback};
use crate::sink::EventSink;
use crate::types::{Availability, DownloadProgress, DownloadStatus, UiChunk};

/// Per-initialization state for the progress notification.
#[derive(Debug)]
pub struct DownloadProgressTracker {
    id: Option<String>,
    last_percent: u8,
    completed: bool,
    download_message: String,
    complete_message: String,
}

impl DownloadProgressTracker {
    pub fn new(download_message: impl Into<String>, complete_message: impl Into<String>) -> Self {
        Self {
            id: None,
            last_percent: 0,
            completed: false,
            download_message: download_message.into(),
            complete_message: complete_message.into(),
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(&config.download_message, &config.download_complete_message)
    }

    /// Id of the open progress notification, once one was minted.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Translate one progress callback into the chunk to emit, if any.
    pub fn on_progress(&mut self, progress: f64) -> Option<UiChunk> {
        if self.completed {
            return None;
        }
        let fraction = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };

        if fraction >= 1.0 {
            // Finished without ever reporting progress: nothing was opened.
            let id = self.id.clone()?;
            self.completed = true;
            self.last_percent = 100;
            return Some(Self::chunk(id, DownloadStatus::Complete, 100, &self.complete_message));
        }

        let percent = ((fraction * 100.0).round() as u8).max(self.last_percent);
        self.last_percent = percent;
        let id = self
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        Some(Self::chunk(id, DownloadStatus::Downloading, percent, &self.download_message))
    }

    /// Close the notification after initialization returned.
    ///
    /// Emits `complete` only when a notification was opened and the callback
    /// has not already completed it.
    pub fn finish(&mut self) -> Option<UiChunk> {
        if self.completed {
            return None;
        }
        let id = self.id.clone()?;
        self.completed = true;
        self.last_percent = 100;
        Some(Self::chunk(id, DownloadStatus::Complete, 100, ""))
    }

    fn chunk(id: String, status: DownloadStatus, progress: u8, message: &str) -> UiChunk {
        UiChunk::download_progress(
            id,
            DownloadProgress {
                status,
                progress,
                message: message.to_string(),
            },
        )
    }
}

/// Make sure `model` is ready, reporting download progress through `sink`.
///
/// `unavailable` is not treated as fatal: initialization is attempted anyway
/// and any failure it raises is returned to the caller.
pub async fn ensure_ready(
    model: &dyn LocalModel,
    sink: Arc<dyn EventSink>,
    config: &TransportConfig,
) -> Result<()> {
    let availability = model.availability().await?;
    debug!(model = model.model_id(), %availability, "local model availability");

    if availability.is_available() {
        return Ok(());
    }
    if availability == Availability::Unavailable {
        warn!(
            model = model.model_id(),
            "local model reports unavailable; attempting initialization anyway"
        );
    }

    let tracker = Arc::new(Mutex::new(DownloadProgressTracker::from_config(config)));
    let on_progress: ProgressCallback = {
        let tracker = tracker.clone();
        let sink = sink.clone();
        Arc::new(move |progress: f64| {
            let Ok(mut tracker) = tracker.lock() else {
                return;
            };
            if let Some(chunk) = tracker.on_progress(progress) {
                sink.emit(chunk);
            }
        })
    };

    model.create_session(on_progress).await?;
    debug!(model = model.model_id(), "local model session ready");

    let mut tracker = tracker
        .lock()
        .map_err(|_| HearthError::InvalidState("download progress state poisoned".into()))?;
    if let Some(chunk) = tracker.finish() {
        sink.emit(chunk);
    }
    Ok(())
}
