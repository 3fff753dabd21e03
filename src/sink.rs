//! Outbound event sinks.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::types::UiChunk;

/// Write-only channel onto which protocol chunks are pushed.
///
/// Implementations must deliver chunks in call order.
pub trait EventSink: Send + Sync {
    fn emit(&self, chunk: UiChunk);
}

impl<F> EventSink for F
where
    F: Fn(UiChunk) + Send + Sync,
{
    fn emit(&self, chunk: UiChunk) {
        (self)(chunk)
    }
}

/// Sink backed by an unbounded channel; the receiving half is drained by
/// the UI message stream.
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    tx: mpsc::UnboundedSender<UiChunk>,
}

impl ChunkWriter {
    pub fn new(tx: mpsc::UnboundedSender<UiChunk>) -> Self {
        Self { tx }
    }

    /// Create a writer together with the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiChunk>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChunkWriter {
    fn emit(&self, chunk: UiChunk) {
        if self.tx.send(chunk).is_err() {
            tracing::debug!("ui message stream dropped; chunk discarded");
        }
    }
}

/// Sink that keeps every chunk in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    chunks: Arc<Mutex<Vec<UiChunk>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn chunks(&self) -> Vec<UiChunk> {
        self.chunks.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, chunk: UiChunk) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push(chunk);
        }
    }
}
