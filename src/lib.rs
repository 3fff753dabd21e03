//! Hearth — chat UI transport for on-device models
//!
//! Bridges a device-local structured-generation model to a chunk-based chat
//! protocol. The model only exposes an availability/download lifecycle and
//! a stream of partial `{ response, suggestions }` objects; Hearth turns
//! those into ordered `text-*` and `data-*` chunks.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use hearth::prelude::*;
//!
//! # async fn example(
//! #     factory: hearth::provider::ModelFactory,
//! #     generator: Arc<dyn ObjectGenerator>,
//! # ) -> hearth::error::Result<()> {
//! let transport = LocalChatTransport::new(factory, generator)
//!     .with_config(TransportConfig::from_env());
//! let request = SendMessagesRequest::new("chat-1", vec![UiMessage::user("m1", "Hello!")]);
//! let stream = transport.send_messages(request).await?;
//! let (chunks, error) = hearth::transport::collect_chunks(stream).await;
//! # let _ = (chunks, error);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod generation;
pub mod prelude;
pub mod provider;
pub mod readiness;
pub mod schema;
pub mod sink;
pub mod transport;
pub mod types;
