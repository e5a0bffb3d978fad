//! streamchat - streaming chat client.
//!
//! Turns the SSE body of a chat response into typed events and drives the
//! session and turn lifecycle around it. The binary is a thin terminal
//! front end; everything else is exposed here for embedding and tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod sse;
pub mod traits;
