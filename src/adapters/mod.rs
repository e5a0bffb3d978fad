//! Concrete implementations of the trait seams.
//!
//! - [`ReqwestHttpClient`] - production HTTP client
//! - [`mock`] - scripted doubles for tests

pub mod mock;
mod reqwest_client;

pub use reqwest_client::{classify_reqwest_error, ReqwestHttpClient};
