//! The `Bot` handle and its endpoint methods.
//!
//! Every method returns an envelope and never an `Err`: transport and decode
//! failures are folded into `{ok: false, description}` with the token
//! redacted, the same shape the platform uses for its own failures.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tgapi::{Bot, ChatId, ParameterSet, ParseMode};
//!
//! let bot = Bot::new("123456:ABC-DEF")?;
//! let me = bot.get_me().await;
//!
//! let options = ParameterSet::new().with("parse_mode", ParseMode::Html);
//! let sent = bot
//!     .send_message(ChatId::from(42), "<b>hello</b>", Some(options))
//!     .await;
//! if let Some(message) = sent.result {
//!     bot.edit_message_text("bye", Some(ParameterSet::new()
//!         .with("chat_id", 42_i64)
//!         .with("message_id", message.message_id)))
//!         .await;
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use tgapi_core::{
    ApiContext, Dispatcher, DualEnvelope, Envelope, FileHandle, InputFile, ParameterSet,
    TransportResult, decode, decode_dual,
};
use tgapi_runtime::BotSettings;
use tgapi_transport::{DEFAULT_TIMEOUT, HttpDispatcher};

use crate::model::{
    ChatAction, ChatId, File, Message, MessageId, Poll, Update, User, WebhookInfo,
};

// =============================================================================
// Bot
// =============================================================================

/// A handle to one bot account.
///
/// Cloning is cheap; clones share the context and the transport.
#[derive(Clone)]
pub struct Bot {
    ctx: Arc<ApiContext>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot").field("ctx", &self.ctx).finish_non_exhaustive()
    }
}

impl Bot {
    /// Creates a bot for `token` against the public endpoints.
    pub fn new(token: impl Into<String>) -> TransportResult<Self> {
        let dispatcher = HttpDispatcher::new(DEFAULT_TIMEOUT)?;
        Ok(Self::with_dispatcher(
            ApiContext::new(token),
            Arc::new(dispatcher),
        ))
    }

    /// Creates a bot from loaded settings.
    pub fn from_config(settings: &BotSettings) -> TransportResult<Self> {
        let dispatcher = HttpDispatcher::new(settings.timeout())?;
        Ok(Self::with_dispatcher(
            settings.to_context(),
            Arc::new(dispatcher),
        ))
    }

    /// Creates a bot over a custom transport.
    pub fn with_dispatcher(ctx: ApiContext, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            dispatcher,
        }
    }

    /// The call context.
    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// Download URL of `file`, or `None` when the platform sent no path.
    pub fn file_url(&self, file: &File) -> Option<String> {
        file.file_path.as_deref().map(|path| self.ctx.file_url(path))
    }

    /// Calls `method` and decodes a result of type `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: ParameterSet,
    ) -> Envelope<T> {
        let body = match self.send(method, params).await {
            Ok(body) => body,
            Err(description) => return Envelope::failure(description),
        };
        decode(&body).unwrap_or_else(|e| Envelope::failure(self.report(method, &e.to_string())))
    }

    /// Calls an edit-style `method` whose result is either an `R` or `true`.
    pub async fn request_dual<R: DeserializeOwned>(
        &self,
        method: &str,
        params: ParameterSet,
    ) -> DualEnvelope<R> {
        let body = match self.send(method, params).await {
            Ok(body) => body,
            Err(description) => return DualEnvelope::failure(description),
        };
        decode_dual(&body)
            .unwrap_or_else(|e| DualEnvelope::failure(self.report(method, &e.to_string())))
    }

    async fn send(&self, method: &str, params: ParameterSet) -> Result<Vec<u8>, String> {
        debug!(method = %method, "Calling Bot API");
        self.dispatcher
            .dispatch(&self.ctx, method, params)
            .await
            .map_err(|e| self.report(method, &format!("{method} failed with error: {e}")))
    }

    fn report(&self, method: &str, message: &str) -> String {
        let description = self.ctx.redact(message);
        error!(method = %method, error = %description, "Bot API call failed");
        description
    }
}

// =============================================================================
// Endpoint APIs
// =============================================================================

macro_rules! impl_api {
    // Required parameters only
    ($(#[$meta:meta])* $name:ident => $method:literal, ($($arg:ident: $typ:ty),*) -> $ret:ty $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ),*) -> Envelope<$ret> {
            #[allow(unused_mut)]
            let mut params = ParameterSet::new();
            $(params.insert(stringify!($arg), $arg);)*
            self.request($method, params).await
        }
    };
    // Edit-style methods answering with the record or `true`
    ($(#[$meta:meta])* $name:ident => $method:literal, ($($arg:ident: $typ:ty),*) + options -> dual $ret:ty $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* options: Option<ParameterSet>) -> DualEnvelope<$ret> {
            #[allow(unused_mut)]
            let mut params = options.unwrap_or_default();
            $(params.insert(stringify!($arg), $arg);)*
            self.request_dual($method, params).await
        }
    };
    // Required parameters plus an option set; required ones win on conflict
    ($(#[$meta:meta])* $name:ident => $method:literal, ($($arg:ident: $typ:ty),*) + options -> $ret:ty $(,)?) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* options: Option<ParameterSet>) -> Envelope<$ret> {
            #[allow(unused_mut)]
            let mut params = options.unwrap_or_default();
            $(params.insert(stringify!($arg), $arg);)*
            self.request($method, params).await
        }
    };
}

impl Bot {
    impl_api!(
        /// Receives incoming updates by long polling.
        get_updates => "getUpdates",
        () + options -> Vec<Update>
    );

    /// Sets the webhook URL, optionally uploading a self-signed certificate.
    ///
    /// A certificate that cannot be opened fails the call before any request
    /// is made.
    pub async fn set_webhook(
        &self,
        url: &str,
        certificate: Option<&Path>,
        options: Option<ParameterSet>,
    ) -> Envelope<bool> {
        let mut params = options.unwrap_or_default();
        params.insert("url", url);
        if let Some(path) = certificate {
            match FileHandle::open(path) {
                Ok(handle) => {
                    params.insert("certificate", handle);
                }
                Err(e) => {
                    let description = format!("failed to open certificate: {e}");
                    return Envelope::failure(self.report("setWebhook", &description));
                }
            }
        }
        debug!(url = %self.ctx.redact(url), "Setting webhook");
        self.request("setWebhook", params).await
    }

    impl_api!(
        /// Removes the webhook.
        delete_webhook => "deleteWebhook",
        (drop_pending_updates: bool) -> bool
    );

    impl_api!(
        /// Gets the current webhook status.
        get_webhook_info => "getWebhookInfo",
        () -> WebhookInfo
    );

    impl_api!(
        /// Gets the bot's own user record.
        get_me => "getMe",
        () -> User
    );

    impl_api!(
        /// Logs the bot out of the cloud Bot API server.
        log_out => "logOut",
        () -> bool
    );

    impl_api!(
        /// Closes the bot instance on a local Bot API server.
        close => "close",
        () -> bool
    );

    impl_api!(
        /// Sends a text message.
        send_message => "sendMessage",
        (chat_id: ChatId, text: &str) + options -> Message
    );

    impl_api!(
        /// Forwards a message.
        forward_message => "forwardMessage",
        (chat_id: ChatId, from_chat_id: ChatId, message_id: i64) + options -> Message
    );

    impl_api!(
        /// Copies a message without a link to the original; only the new id comes back.
        copy_message => "copyMessage",
        (chat_id: ChatId, from_chat_id: ChatId, message_id: i64) + options -> MessageId
    );

    impl_api!(
        /// Sends a photo. Local paths and bytes are uploaded.
        send_photo => "sendPhoto",
        (chat_id: ChatId, photo: InputFile) + options -> Message
    );

    impl_api!(
        /// Sends a general file. Local paths and bytes are uploaded.
        send_document => "sendDocument",
        (chat_id: ChatId, document: InputFile) + options -> Message
    );

    impl_api!(
        /// Shows a chat action such as "typing..." for a few seconds.
        send_chat_action => "sendChatAction",
        (chat_id: ChatId, action: ChatAction) + options -> bool
    );

    impl_api!(
        /// Deletes a message.
        delete_message => "deleteMessage",
        (chat_id: ChatId, message_id: i64) -> bool
    );

    impl_api!(
        /// Gets file info for download via [`Bot::file_url`].
        get_file => "getFile",
        (file_id: &str) -> File
    );

    impl_api!(
        /// Edits the text of a message.
        ///
        /// Target it with `chat_id` + `message_id` or `inline_message_id`
        /// in `options`; inline messages answer `true` instead of the record.
        edit_message_text => "editMessageText",
        (text: &str) + options -> dual Message
    );

    impl_api!(
        /// Edits the caption of a message.
        edit_message_caption => "editMessageCaption",
        () + options -> dual Message
    );

    impl_api!(
        /// Edits the inline keyboard of a message.
        edit_message_reply_markup => "editMessageReplyMarkup",
        () + options -> dual Message
    );

    impl_api!(
        /// Stops a poll sent by the bot.
        stop_poll => "stopPoll",
        (chat_id: ChatId, message_id: i64) + options -> Poll
    );
}
