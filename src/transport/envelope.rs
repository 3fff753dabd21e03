//! UI message stream envelope.

use std::future::Future;

use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::{HearthError, Result};
use crate::sink::ChunkWriter;
use crate::types::UiChunk;

/// Stream of protocol chunks handed to the chat UI. An `Err` item is always
/// last and marks abnormal termination.
pub type UiMessageStream = BoxStream<'static, Result<UiChunk>>;

enum Step {
    Chunk(Option<UiChunk>),
    Done(Result<()>),
}

/// Run `execute` against a fresh [`ChunkWriter`] and expose what it writes
/// as a [`UiMessageStream`].
///
/// Chunks are yielded in write order. If the body fails, its error is
/// yielded after every chunk it wrote. Nothing runs until the stream is
/// polled, and dropping the stream drops the body.
pub fn create_ui_message_stream<F, Fut>(execute: F) -> UiMessageStream
where
    F: FnOnce(ChunkWriter) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let (writer, mut rx) = ChunkWriter::channel();
    let body = execute(writer);

    let stream = async_stream::stream! {
        let mut body = Box::pin(body);
        let mut writers_closed = false;

        loop {
            let step = tokio::select! {
                biased;
                chunk = rx.recv(), if !writers_closed => Step::Chunk(chunk),
                result = &mut body => Step::Done(result),
            };
            match step {
                Step::Chunk(Some(chunk)) => yield Ok(chunk),
                Step::Chunk(None) => writers_closed = true,
                Step::Done(result) => {
                    while let Ok(chunk) = rx.try_recv() {
                        yield Ok(chunk);
                    }
                    if let Err(err) = result {
                        yield Err(err);
                    }
                    break;
                }
            }
        }
    };
    stream.boxed()
}

/// Drain a UI message stream, returning its chunks and the terminal error,
/// if any.
pub async fn collect_chunks(mut stream: UiMessageStream) -> (Vec<UiChunk>, Option<HearthError>) {
    let mut chunks = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => chunks.push(chunk),
            Err(err) => return (chunks, Some(err)),
        }
    }
    (chunks, None)
}
