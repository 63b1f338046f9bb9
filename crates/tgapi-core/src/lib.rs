//! # tgapi Core
//!
//! The engine of the tgapi bot API client: everything that happens before
//! bytes hit the network and after they come back.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌────────────┐   ┌──────────┐
//! │ ParameterSet │──▶│ Selector │──▶│ Dispatcher │──▶│ Decoder  │
//! │   (Value)    │   │ encoding │   │  (HTTP)    │   │ Envelope │
//! └──────────────┘   └──────────┘   └────────────┘   └──────────┘
//! ```
//!
//! - **Values**: tagged parameter values and per-call sets ([`Value`], [`ParameterSet`])
//! - **Encoding**: form text and transport selection ([`encode_param`], [`select_encoding`])
//! - **Dispatch**: the HTTP seam ([`Dispatcher`])
//! - **Decoding**: response envelopes, including the record-or-bool shape
//!   ([`decode`], [`decode_dual`])
//! - **Redaction**: scrubbing the bot token from diagnostics ([`redact()`])
//! - **Sniffing**: MIME detection for anonymous attachments ([`sniff()`])
//! - **Webhook**: turning received bodies into updates ([`deliver`])
//!
//! ## Example
//!
//! ```rust
//! use tgapi_core::{Encoding, ParameterSet, select_encoding, encode_urlencoded};
//!
//! let params = ParameterSet::new().with("chat_id", 42_i64).with("text", "hi");
//! assert_eq!(select_encoding(&params), Encoding::UrlEncoded);
//! assert_eq!(encode_urlencoded(&params), "chat_id=42&text=hi");
//! ```

pub mod context;
pub mod dispatch;
pub mod encode;
pub mod envelope;
pub mod error;
pub mod redact;
pub mod sniff;
pub mod value;
pub mod webhook;

pub use context::{ApiContext, DEFAULT_API_BASE_URL, DEFAULT_FILE_BASE_URL};
pub use dispatch::Dispatcher;
pub use encode::{Encoding, encode_fields, encode_param, encode_urlencoded, select_encoding};
pub use envelope::{
    DualEnvelope, DualResult, Envelope, ResponseParameters, SNIPPET_LEN, decode, decode_dual,
    snippet,
};
pub use error::{
    ApiError, ApiResult, DecodeError, DecodeResult, EncodingError, EncodingResult, TransportError,
    TransportResult,
};
pub use redact::{REDACTED, redact};
pub use sniff::{SNIFF_LEN, extension, sniff};
pub use value::{FileHandle, InputFile, ParameterSet, Value};
pub use webhook::{UpdateHandler, decode_update, deliver};

// Re-export async_trait for implementors of Dispatcher
pub use async_trait::async_trait;
