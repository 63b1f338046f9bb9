//! Response envelopes and their decoding.
//!
//! Every Bot API response is a JSON object of the form
//! `{"ok": bool, "result": ..., "description": ..., "error_code": ...}`.
//! [`decode`] parses it for one expected result type. [`decode_dual`] covers
//! the edit-style methods whose `result` is either the edited record or `true`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult, DecodeError, DecodeResult};

/// Maximum number of body bytes kept in a decode diagnostic.
pub const SNIPPET_LEN: usize = 512;

/// Extra information attached to some failed responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// The group was migrated to a supergroup with this id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds to wait before repeating a flood-limited request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<i64>,
}

// =============================================================================
// Envelope
// =============================================================================

/// A generic API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The result, present on success for methods that return one.
    // Plain `Option`: `default` would make the derive require `T: Default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Platform error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    /// Extra failure parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl<T> Envelope<T> {
    /// Builds a failed envelope carrying `description`.
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            description: Some(description.into()),
            error_code: None,
            parameters: None,
        }
    }

    /// Builds a successful envelope around `result`.
    pub fn success(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            description: None,
            error_code: None,
            parameters: None,
        }
    }

    /// Checks if the API call was successful.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Maps the result, keeping the other fields.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            ok: self.ok,
            result: self.result.map(f),
            description: self.description,
            error_code: self.error_code,
            parameters: self.parameters,
        }
    }

    /// Converts the envelope into a `Result`.
    pub fn into_result(self) -> ApiResult<T> {
        if self.ok {
            self.result.ok_or(ApiError::MissingResult)
        } else {
            Err(ApiError::Api {
                code: self.error_code,
                description: self
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

// =============================================================================
// DualEnvelope
// =============================================================================

/// Result of an edit-style call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DualResult<R> {
    /// The edited record (the message was sent by the bot).
    Record(R),
    /// A bare boolean (e.g. an inline message was edited).
    Bool(bool),
}

/// Envelope whose result is either a record or a boolean.
///
/// On success exactly one shape is present in [`result`](Self::result).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualEnvelope<R> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The result in whichever shape the platform sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DualResult<R>>,
    /// Human-readable failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Platform error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    /// Extra failure parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl<R> DualEnvelope<R> {
    /// Builds a failed envelope carrying `description`.
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            description: Some(description.into()),
            error_code: None,
            parameters: None,
        }
    }

    /// Checks if the API call was successful.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// The record, when the platform returned one.
    pub fn record(&self) -> Option<&R> {
        match &self.result {
            Some(DualResult::Record(r)) => Some(r),
            _ => None,
        }
    }

    /// The boolean, when the platform returned one.
    pub fn boolean(&self) -> Option<bool> {
        match self.result {
            Some(DualResult::Bool(b)) => Some(b),
            _ => None,
        }
    }

    /// Converts the envelope into a `Result`.
    pub fn into_result(self) -> ApiResult<DualResult<R>> {
        Envelope {
            ok: self.ok,
            result: self.result,
            description: self.description,
            error_code: self.error_code,
            parameters: self.parameters,
        }
        .into_result()
    }

    fn from_envelope(envelope: Envelope<DualResult<R>>) -> Self {
        Self {
            ok: envelope.ok,
            result: envelope.result,
            description: envelope.description,
            error_code: envelope.error_code,
            parameters: envelope.parameters,
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Lossy, bounded rendering of a response body for diagnostics.
pub fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= SNIPPET_LEN {
        return text.into_owned();
    }
    let mut end = SNIPPET_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Decodes `body` as an envelope with result type `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> DecodeResult<Envelope<T>> {
    serde_json::from_slice(body).map_err(|e| DecodeError::Shape {
        reason: e.to_string(),
        body: snippet(body),
    })
}

/// Decodes `body` as either an envelope of `R` or an envelope of `bool`.
///
/// The record shape is tried first; the boolean shape only when it fails.
pub fn decode_dual<R: DeserializeOwned>(body: &[u8]) -> DecodeResult<DualEnvelope<R>> {
    let record_err = match serde_json::from_slice::<Envelope<R>>(body) {
        Ok(envelope) => return Ok(DualEnvelope::from_envelope(envelope.map(DualResult::Record))),
        Err(e) => e,
    };
    match serde_json::from_slice::<Envelope<bool>>(body) {
        Ok(envelope) => Ok(DualEnvelope::from_envelope(envelope.map(DualResult::Bool))),
        Err(bool_err) => Err(DecodeError::DualShape {
            record: record_err.to_string(),
            boolean: bool_err.to_string(),
            body: snippet(body),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Edited {
        message_id: i64,
        #[serde(default)]
        text: Option<String>,
    }

    #[test]
    fn test_decode_success() {
        let env: Envelope<Edited> =
            decode(br#"{"ok":true,"result":{"message_id":5,"text":"hi"}}"#).unwrap();
        assert!(env.is_ok());
        assert_eq!(
            env.result,
            Some(Edited {
                message_id: 5,
                text: Some("hi".into())
            })
        );
    }

    #[test]
    fn test_decode_platform_failure() {
        let body = br#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 3","parameters":{"retry_after":3}}"#;
        let env: Envelope<bool> = decode(body).unwrap();
        assert!(!env.ok);
        assert_eq!(env.error_code, Some(429));
        assert_eq!(env.parameters.as_ref().unwrap().retry_after, Some(3));

        let err = env.into_result().unwrap_err();
        assert!(matches!(err, ApiError::Api { code: Some(429), .. }));
    }

    /// A record without `Default`, nested the way platform records are.
    #[derive(Debug, PartialEq, Deserialize)]
    struct Sent {
        message_id: i64,
        chat: SentChat,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct SentChat {
        id: i64,
    }

    #[test]
    fn test_decode_record_without_default() {
        let env: Envelope<Sent> =
            decode(br#"{"ok":true,"result":{"message_id":9,"chat":{"id":-100}}}"#).unwrap();
        let sent = env.into_result().unwrap();
        assert_eq!(sent.message_id, 9);
        assert_eq!(sent.chat, SentChat { id: -100 });

        let env: Envelope<Sent> = decode(br#"{"ok":false,"description":"Forbidden"}"#).unwrap();
        assert!(env.result.is_none());
    }

    #[test]
    fn test_decode_shape_mismatch_keeps_body() {
        let err = decode::<Edited>(br#"{"ok":true,"result":"oops"}"#).unwrap_err();
        match err {
            DecodeError::Shape { reason, body } => {
                assert!(reason.contains("expected struct Edited"));
                assert_eq!(body, r#"{"ok":true,"result":"oops"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_array_result_is_positional() {
        let err = decode::<Edited>(br#"{"ok":true,"result":[1,2]}"#).unwrap_err();
        let reason = err.to_string();
        assert!(reason.contains("integer"));
        assert!(reason.contains("expected a string"));

        let env: Envelope<Edited> = decode(br#"{"ok":true,"result":[1,"x"]}"#).unwrap();
        assert_eq!(
            env.result,
            Some(Edited {
                message_id: 1,
                text: Some("x".into())
            })
        );
    }

    #[test]
    fn test_dual_array_result_takes_record_shape() {
        let env: DualEnvelope<Edited> =
            decode_dual(br#"{"ok":true,"result":[5,"x"]}"#).unwrap();
        assert_eq!(env.record().map(|m| m.message_id), Some(5));
        assert_eq!(env.boolean(), None);
    }

    #[test]
    fn test_decode_not_json() {
        let err = decode::<bool>(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().starts_with("json parse error"));
        assert!(err.to_string().contains("502 Bad Gateway"));
    }

    #[test]
    fn test_dual_record() {
        let env: DualEnvelope<Edited> =
            decode_dual(br#"{"ok":true,"result":{"message_id":5,"text":"x"}}"#).unwrap();
        assert!(env.ok);
        assert_eq!(env.record().map(|m| m.message_id), Some(5));
        assert_eq!(env.boolean(), None);
    }

    #[test]
    fn test_dual_bool() {
        let env: DualEnvelope<Edited> = decode_dual(br#"{"ok":true,"result":true}"#).unwrap();
        assert!(env.ok);
        assert!(env.record().is_none());
        assert_eq!(env.boolean(), Some(true));
    }

    #[test]
    fn test_dual_neither_shape() {
        let err =
            decode_dual::<Edited>(br#"{"ok":true,"result":"not an object or bool"}"#).unwrap_err();
        match &err {
            DecodeError::DualShape {
                record,
                boolean,
                body,
            } => {
                assert!(record.contains("expected struct Edited"));
                assert!(boolean.contains("expected a boolean"));
                assert!(body.contains("not an object or bool"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("not in record nor bool shape"));
    }

    #[test]
    fn test_dual_failure_response_keeps_ok_false() {
        let env: DualEnvelope<Edited> = decode_dual(
            br#"{"ok":false,"error_code":400,"description":"Bad Request: message is not modified"}"#,
        )
        .unwrap();
        assert!(!env.ok);
        assert!(env.result.is_none());
        assert_eq!(env.error_code, Some(400));
    }

    #[test]
    fn test_snippet_is_bounded() {
        let body = "é".repeat(SNIPPET_LEN);
        let s = snippet(body.as_bytes());
        assert!(s.len() <= SNIPPET_LEN + 3);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn test_into_result_missing_result() {
        let env: Envelope<bool> = decode(br#"{"ok":true}"#).unwrap();
        assert_eq!(env.into_result(), Err(ApiError::MissingResult));
    }
}
