//! HTTP dispatch.
//!
//! [`HttpDispatcher`] picks the body encoding per call; multipart bodies are
//! assembled in the `multipart` module.

mod client;
mod multipart;

pub use client::{DEFAULT_TIMEOUT, HttpDispatcher};
