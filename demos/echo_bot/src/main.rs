//! Echo Bot Example
//!
//! Long-polls `getUpdates` and answers every text message with the same
//! text. Photos are answered with their largest size, re-sent by file id.
//!
//! # Usage
//!
//! ```bash
//! TGAPI_BOT__TOKEN=123456:ABC-DEF cargo run --package echo-bot
//! cargo run --package echo-bot -- --config ./tgapi.toml --timeout 30
//! ```

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use tgapi::prelude::*;
use tgapi::{Message, Update};
use tracing::{debug, error, info, warn};

#[derive(Debug, Parser)]
#[command(version, about = "Echoes every message sent to the bot")]
struct Args {
    /// Configuration file; the default search locations are used when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Long-polling timeout in seconds.
    #[arg(short, long, default_value_t = 25)]
    timeout: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().file(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    validate_config(&config)?;
    logging::init_from_config(&config.logging);

    // Long polling must outlast the server-side wait.
    let mut bot_settings = config.bot.clone();
    let poll_ms = u64::try_from(args.timeout)?.saturating_mul(1000);
    bot_settings.timeout_ms = bot_settings.timeout_ms.max(poll_ms + 10_000);
    let bot = Bot::from_config(&bot_settings)?;

    let me = bot.get_me().await;
    let Some(me) = me.result else {
        bail!(
            "getMe failed: {}",
            me.description.unwrap_or_else(|| "unknown error".into())
        );
    };
    info!(username = ?me.username, id = me.id, "Bot started");

    tokio::select! {
        _ = poll(&bot, args.timeout) => {}
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}

async fn poll(bot: &Bot, timeout: i64) {
    let mut offset = 0_i64;
    loop {
        let options = ParameterSet::new()
            .with("offset", offset)
            .with("timeout", timeout)
            .with("allowed_updates", serde_json::json!(["message"]));

        let updates = bot.get_updates(Some(options)).await;
        let Some(updates) = updates.result else {
            warn!(error = ?updates.description, "getUpdates failed, retrying");
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            continue;
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            handle(bot, update).await;
        }
    }
}

async fn handle(bot: &Bot, update: Update) {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "Skipping non-message update");
        return;
    };
    let chat = ChatId::from(message.chat.id);

    if let Some(text) = &message.text {
        info!(chat = %chat, text = %text, "Echoing text");
        let reply = ParameterSet::new().with(
            "reply_parameters",
            serde_json::json!({ "message_id": message.message_id }),
        );
        report(bot.send_message(chat, text, Some(reply)).await);
    } else if let Some(file_id) = largest_photo(&message) {
        bot.send_chat_action(chat.clone(), ChatAction::UploadPhoto, None)
            .await;
        report(
            bot.send_photo(chat, InputFile::file_id(file_id), None)
                .await,
        );
    }
}

fn largest_photo(message: &Message) -> Option<String> {
    message
        .extra
        .get("photo")?
        .as_array()?
        .last()?
        .get("file_id")?
        .as_str()
        .map(str::to_string)
}

fn report(sent: Envelope<Message>) {
    if let Err(e) = sent.into_result() {
        error!(error = %e, "Failed to send reply");
    }
}
