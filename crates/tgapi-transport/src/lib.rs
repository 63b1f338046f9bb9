//! # tgapi Transport
//!
//! reqwest-backed implementation of the [`Dispatcher`](tgapi_core::Dispatcher)
//! seam defined in `tgapi-core`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  tgapi (Bot)        │  (endpoint callers)
//! ├─────────────────────┤
//! │  tgapi-core         │  (encoding, decoding, Dispatcher trait)
//! ├─────────────────────┤
//! │  tgapi-transport    │  <- This crate (HTTP POST)
//! ├─────────────────────┤
//! │  Network (HTTP/TLS) │
//! └─────────────────────┘
//! ```
//!
//! Every call is a single `POST {api_base_url}{token}/{method}`. The body is
//! `multipart/form-data` when the parameter set holds an attachment and
//! `application/x-www-form-urlencoded` otherwise.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tgapi_core::{ApiContext, Dispatcher, ParameterSet};
//! use tgapi_transport::HttpDispatcher;
//!
//! let ctx = ApiContext::new("123:ABC");
//! let http = HttpDispatcher::new(Duration::from_secs(30))?;
//! let body = http.dispatch(&ctx, "getMe", ParameterSet::new()).await?;
//! ```

pub mod http;

pub use http::{DEFAULT_TIMEOUT, HttpDispatcher};
