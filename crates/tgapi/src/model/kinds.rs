//! Parameter kinds with a closed set of wire values.

use std::fmt;

use tgapi_core::Value;

/// Target chat: a numeric id or a `@username` of a public chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(username: &str) -> Self {
        Self::Username(username.to_string())
    }
}

impl From<String> for ChatId {
    fn from(username: String) -> Self {
        Self::Username(username)
    }
}

impl From<ChatId> for Value {
    fn from(chat_id: ChatId) -> Self {
        match chat_id {
            ChatId::Id(id) => Value::Int64(id),
            ChatId::Username(name) => Value::String(name),
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// Activity shown to the other party by `sendChatAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
}

impl ChatAction {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordVoice => "record_voice",
            Self::UploadVoice => "upload_voice",
            Self::UploadDocument => "upload_document",
            Self::ChooseSticker => "choose_sticker",
            Self::FindLocation => "find_location",
            Self::RecordVideoNote => "record_video_note",
            Self::UploadVideoNote => "upload_video_note",
        }
    }
}

impl From<ChatAction> for Value {
    fn from(action: ChatAction) -> Self {
        Value::Enum(action.as_str())
    }
}

/// Text formatting mode for `parse_mode` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseMode {
    MarkdownV2,
    Html,
    /// Legacy Markdown.
    Markdown,
}

impl ParseMode {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkdownV2 => "MarkdownV2",
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
        }
    }
}

impl From<ParseMode> for Value {
    fn from(mode: ParseMode) -> Self {
        Value::Enum(mode.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgapi_core::encode_param;

    #[test]
    fn test_enum_kinds_encode_to_wire_strings() {
        assert_eq!(
            encode_param("action", &ChatAction::UploadDocument.into()).unwrap(),
            "upload_document"
        );
        assert_eq!(encode_param("parse_mode", &ParseMode::Html.into()).unwrap(), "HTML");
    }

    #[test]
    fn test_chat_id_forms() {
        assert_eq!(encode_param("chat_id", &ChatId::from(-1001_i64).into()).unwrap(), "-1001");
        assert_eq!(
            encode_param("chat_id", &ChatId::from("@channel").into()).unwrap(),
            "@channel"
        );
    }
}
