//! Unified error types for the tgapi engine.
//!
//! Three failure kinds flow through a call:
//!
//! - [`EncodingError`]: a single field could not be represented. Non-fatal,
//!   the field is logged and dropped.
//! - [`TransportError`]: building, sending or reading the HTTP exchange failed.
//!   Fatal to the call.
//! - [`DecodeError`]: the response body did not match the expected shape.
//!   Fatal to the call.
//!
//! [`ApiError`] wraps the fatal kinds plus platform-reported failures for
//! callers that prefer `Result` over envelopes.

use thiserror::Error;

// =============================================================================
// Encoding Errors
// =============================================================================

/// A parameter value that could not be turned into a form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The value is binary content and must be streamed as an attachment.
    #[error("parameter '{field}' is an attachment and has no text form")]
    Attachment {
        /// Field name.
        field: String,
    },

    /// A file value with neither a remote reference nor local content.
    #[error("parameter '{field}' is an empty file reference")]
    EmptyFile {
        /// Field name.
        field: String,
    },

    /// A structured value could not be serialized to JSON.
    #[error("parameter '{field}' could not be encoded as json: {reason}")]
    Json {
        /// Field name.
        field: String,
        /// Serializer message.
        reason: String,
    },
}

impl EncodingError {
    /// Returns the name of the field that failed to encode.
    pub fn field(&self) -> &str {
        match self {
            Self::Attachment { field } | Self::EmptyFile { field } | Self::Json { field, .. } => {
                field
            }
        }
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that end a call before a response body was obtained.
///
/// Messages are redacted by the dispatcher before these are constructed, so
/// they never carry the bot token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The HTTP client or request could not be built.
    #[error("building request error: {0}")]
    Build(String),

    /// The exchange itself failed (connect, timeout, TLS, ...).
    #[error("request error: {0}")]
    Request(String),

    /// The response arrived but its body could not be read.
    #[error("response read error: {0}")]
    Read(String),

    /// A multipart body could not be assembled.
    #[error("multipart error: {0}")]
    Multipart(String),

    /// Local I/O failed outside of a single attachment.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// Response bytes that matched none of the expected JSON shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The body did not match the single expected shape.
    #[error("json parse error: {reason} ({body})")]
    Shape {
        /// Parser message.
        reason: String,
        /// Bounded snippet of the raw body.
        body: String,
    },

    /// The body matched neither the record nor the boolean shape.
    #[error(
        "json parse error: not in record nor bool shape (as record: {record}; as bool: {boolean}) ({body})"
    )]
    DualShape {
        /// Parser message for the record attempt.
        record: String,
        /// Parser message for the boolean attempt.
        boolean: String,
        /// Bounded snippet of the raw body.
        body: String,
    },
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for callers that convert envelopes into `Result`s.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The platform answered with `ok: false`.
    #[error("API error ({}): {description}", display_code(.code))]
    Api {
        /// `error_code` from the envelope, if present.
        code: Option<i64>,
        /// `description` from the envelope.
        description: String,
    },

    /// The platform answered `ok: true` without a result.
    #[error("no result in successful response")]
    MissingResult,

    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Decode error.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

fn display_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "-".to_string(), |c| c.to_string())
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parameter encoding.
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for response decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_without_code() {
        let err = ApiError::Api {
            code: None,
            description: "boom".into(),
        };
        assert_eq!(err.to_string(), "API error (-): boom");
    }

    #[test]
    fn test_transport_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TransportError = io.into();
        assert!(matches!(err, TransportError::Io(ref m) if m == "missing"));
    }

    #[test]
    fn test_encoding_error_field() {
        let err = EncodingError::EmptyFile {
            field: "photo".into(),
        };
        assert_eq!(err.field(), "photo");
    }
}
