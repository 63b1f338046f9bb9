//! Bot API records used by the endpoint methods.
//!
//! Only the fields the client itself relies on are typed; everything else the
//! platform sends is kept in each record's `extra` map.

mod kinds;
mod types;

pub use kinds::{ChatAction, ChatId, ParseMode};
pub use types::{Chat, File, Message, MessageId, Poll, PollOption, Update, User, WebhookInfo};
