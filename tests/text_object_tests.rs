//! Tests for structured generation over a raw text stream.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use common::MockModel;
use hearth::error::{HearthError, Result};
use hearth::generation::{TextGenerator, TextObjectGenerator, TextRequest};
use hearth::provider::{LocalModel, ObjectGenerator, ObjectRequest};
use hearth::schema::{response_schema, RESPONSE_SCHEMA_NAME};
use hearth::types::*;
use pretty_assertions::assert_eq;

/// Streams canned text in fixed-size pieces.
struct ChunkedText {
    text: String,
    piece: usize,
    fail: bool,
    requests: Mutex<Vec<TextRequest>>,
}

impl ChunkedText {
    fn new(text: &str, piece: usize) -> Self {
        Self {
            text: text.to_string(),
            piece,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for ChunkedText {
    async fn stream_text(
        &self,
        _model: Arc<dyn LocalModel>,
        request: TextRequest,
    ) -> Result<BoxStream<'static, Result<String>>> {
        self.requests.lock().unwrap().push(request);
        let pieces: Vec<String> = self
            .text
            .chars()
            .collect::<Vec<_>>()
            .chunks(self.piece)
            .map(|c| c.iter().collect())
            .collect();
        let fail = self.fail;
        let stream = async_stream::stream! {
            for piece in pieces {
                tokio::task::yield_now().await;
                yield Ok(piece);
            }
            if fail {
                yield Err(HearthError::generation("runtime lost"));
            }
        };
        Ok(stream.boxed())
    }
}

fn object_request(cancel: CancellationToken) -> ObjectRequest {
    ObjectRequest::builder()
        .system("Be brief.")
        .messages(vec![ModelMessage::user("Hi")])
        .schema(response_schema())
        .schema_name(RESPONSE_SCHEMA_NAME)
        .cancel(cancel)
        .build()
}

fn model() -> Arc<dyn LocalModel> {
    Arc::new(MockModel::available())
}

const FULL: &str = r#"{"response": "Hello there", "suggestions": ["Why?", "How?", "When?"]}"#;

#[tokio::test]
async fn partial_responses_grow_and_final_object_parses() {
    let text = Arc::new(ChunkedText::new(FULL, 4));
    let generator = TextObjectGenerator::new(text.clone());

    let stream = generator
        .stream_object(model(), object_request(CancellationToken::new()))
        .await
        .unwrap();
    let partials: Vec<PartialChatResponse> =
        stream.partials.map(|p| p.unwrap()).collect().await;
    let object = stream.object.await.unwrap();

    let responses: Vec<String> = partials.iter().filter_map(|p| p.response.clone()).collect();
    assert!(!responses.is_empty());
    assert!(responses.windows(2).all(|w| w[1].starts_with(w[0].as_str())));
    assert_eq!(responses.last().map(String::as_str), Some("Hello there"));
    assert_eq!(object.response, "Hello there");
    assert_eq!(object.non_empty_suggestions().map(<[String]>::len), Some(3));

    let requests = text.requests.lock().unwrap();
    assert!(requests[0].system.starts_with("Be brief."));
    assert!(requests[0].system.contains("\"suggestions\""));
}

#[tokio::test]
async fn duplicate_parses_are_not_repeated() {
    let generator = TextObjectGenerator::new(Arc::new(ChunkedText::new(FULL, 1)));

    let stream = generator
        .stream_object(model(), object_request(CancellationToken::new()))
        .await
        .unwrap();
    let partials: Vec<PartialChatResponse> =
        stream.partials.map(|p| p.unwrap()).collect().await;

    assert!(partials.windows(2).all(|w| w[0] != w[1]));
}

#[tokio::test]
async fn text_errors_fail_both_halves() {
    let mut text = ChunkedText::new(r#"{"response": "Hel"#, 5);
    text.fail = true;
    let generator = TextObjectGenerator::new(Arc::new(text));

    let mut stream = generator
        .stream_object(model(), object_request(CancellationToken::new()))
        .await
        .unwrap();
    let mut saw_error = false;
    while let Some(item) = stream.partials.next().await {
        if item.is_err() {
            saw_error = true;
        }
    }

    assert!(saw_error);
    assert!(matches!(stream.object.await, Err(HearthError::Stream(_))));
}

#[tokio::test]
async fn cancellation_stops_partials_and_cancels_final_object() {
    let cancel = CancellationToken::new();
    let generator = TextObjectGenerator::new(Arc::new(ChunkedText::new(FULL, 2)));

    let mut stream = generator
        .stream_object(model(), object_request(cancel.clone()))
        .await
        .unwrap();
    let mut seen = 0;
    while let Some(item) = stream.partials.next().await {
        item.unwrap();
        seen += 1;
        if seen == 2 {
            cancel.cancel();
        }
    }

    assert_eq!(seen, 2);
    assert!(matches!(stream.object.await, Err(HearthError::Canceled)));
}
