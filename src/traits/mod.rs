//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, streaming POST)
//! - [`ChatEvents`] - Conversation updates consumed by the renderer

pub mod events;
pub mod http;

pub use events::ChatEvents;
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
