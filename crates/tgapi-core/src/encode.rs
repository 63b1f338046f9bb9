//! Parameter encoding and transport selection.
//!
//! [`select_encoding`] decides once per call whether the body is multipart or
//! urlencoded; [`encode_param`] turns each non-attachment value into its form
//! text.

use tracing::warn;
use url::form_urlencoded;

use crate::error::{EncodingError, EncodingResult};
use crate::value::{InputFile, ParameterSet, Value};

/// Request body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `multipart/form-data`, required as soon as one attachment is present.
    Multipart,
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
}

impl Encoding {
    /// MIME type of the body. Multipart bodies also carry a boundary parameter.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Multipart => "multipart/form-data",
            Self::UrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// Chooses the body encoding for a whole parameter set.
///
/// The API does not accept mixed bodies: one attachment forces multipart for
/// every field.
pub fn select_encoding(params: &ParameterSet) -> Encoding {
    if params.iter().any(|(_, value)| value.is_attachment()) {
        Encoding::Multipart
    } else {
        Encoding::UrlEncoded
    }
}

/// Encodes one value as form text.
///
/// Attachments and empty file references are rejected; the caller decides
/// whether to stream the value instead or drop the field.
pub fn encode_param(field: &str, value: &Value) -> EncodingResult<String> {
    match value {
        Value::Int(v) => Ok(v.to_string()),
        Value::Int64(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(format!("{v:.8}")),
        Value::Bool(v) => Ok(v.to_string()),
        Value::String(v) => Ok(v.clone()),
        Value::Enum(v) => Ok((*v).to_string()),
        Value::File(InputFile::Url(url)) => Ok(url.clone()),
        Value::File(InputFile::FileId(id)) => Ok(id.clone()),
        Value::File(file) if file.is_attachment() => Err(EncodingError::Attachment {
            field: field.to_string(),
        }),
        Value::File(_) => Err(EncodingError::EmptyFile {
            field: field.to_string(),
        }),
        Value::Bytes(_) | Value::Handle(_) => Err(EncodingError::Attachment {
            field: field.to_string(),
        }),
        Value::Json(v) => serde_json::to_string(v).map_err(|e| EncodingError::Json {
            field: field.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Encodes every field of `params`, logging and skipping the ones that fail.
pub fn encode_fields(params: &ParameterSet) -> Vec<(&str, String)> {
    params
        .iter()
        .filter_map(|(field, value)| match encode_param(field, value) {
            Ok(text) => Some((field, text)),
            Err(e) => {
                warn!(field = %field, kind = value.kind(), error = %e, "Omitting parameter from request");
                None
            }
        })
        .collect()
}

/// Builds an `application/x-www-form-urlencoded` body.
///
/// Fields appear in key order, so the same set always yields the same body.
pub fn encode_urlencoded(params: &ParameterSet) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, text) in encode_fields(params) {
        serializer.append_pair(field, &text);
    }
    serializer.finish()
}
