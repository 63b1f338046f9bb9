//! # tgapi
//!
//! An async client for the Telegram Bot API.
//!
//! ## Overview
//!
//! Each API call is a method name plus a [`ParameterSet`]. The client picks
//! the body encoding (multipart as soon as one attachment is present,
//! urlencoded otherwise), performs one HTTP POST, and decodes the
//! `{ok, result, description}` envelope into a typed result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │     Bot     │────▶│    tgapi-core    │────▶│ tgapi-transport │──▶ HTTPS
//! │ (endpoints) │◀────│ encode / decode  │◀────│    (reqwest)    │
//! └─────────────┘     └──────────────────┘     └─────────────────┘
//!        ▲
//!        │  tgapi-runtime: config + logging
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tgapi::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     validate_config(&config)?;
//!     logging::init_from_config(&config.logging);
//!
//!     let bot = Bot::from_config(&config.bot)?;
//!     let photo = InputFile::path("./cat.jpg");
//!     let sent = bot.send_photo(ChatId::from(42), photo, None).await;
//!     println!("{:?}", sent.into_result());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub mod bot;
pub mod model;

pub use tgapi_core as core;
pub use tgapi_runtime as runtime;
pub use tgapi_transport as transport;

pub use bot::Bot;
pub use model::{
    Chat, ChatAction, ChatId, File, Message, MessageId, ParseMode, Poll, PollOption, Update, User,
    WebhookInfo,
};
pub use tgapi_core::{
    ApiContext, ApiError, ApiResult, Dispatcher, DualEnvelope, DualResult, Envelope, FileHandle,
    InputFile, ParameterSet, Value,
};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tgapi::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bot::Bot;
    pub use crate::model::{ChatAction, ChatId, ParseMode};

    pub use tgapi_core::{
        DualEnvelope, DualResult, Envelope, FileHandle, InputFile, ParameterSet, Value,
    };

    pub use tgapi_runtime::{ConfigLoader, TgapiConfig, logging, validate_config};
}
