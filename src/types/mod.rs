//! Core types for Hearth.

pub mod availability;
pub mod chunk;
pub mod message;
pub mod response;

pub use availability::*;
pub use chunk::*;
pub use message::*;
pub use response::*;
