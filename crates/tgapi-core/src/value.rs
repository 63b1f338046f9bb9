//! Parameter values and parameter sets.
//!
//! Every API call is a method name plus a [`ParameterSet`]: field names mapped
//! to a tagged [`Value`]. The set is built fresh for each call and owned by it,
//! which is what lets attachment handles be closed when the call returns.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

// =============================================================================
// InputFile
// =============================================================================

/// A file parameter.
///
/// Remote references ([`Url`](Self::Url), [`FileId`](Self::FileId)) travel as
/// plain text. Local content ([`Path`](Self::Path), [`Bytes`](Self::Bytes))
/// must be uploaded as a multipart attachment.
#[derive(Clone, PartialEq, Eq)]
pub enum InputFile {
    /// A URL the platform fetches by itself.
    Url(String),
    /// The id of a file already stored on the platform.
    FileId(String),
    /// A local file, opened lazily when the request is sent.
    Path(PathBuf),
    /// In-memory content with an optional declared filename.
    Bytes {
        /// File content. Empty content is treated as "not provided".
        data: Vec<u8>,
        /// Filename to declare; synthesized from the content when absent.
        filename: Option<String>,
    },
}

impl InputFile {
    /// Creates a file referenced by URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Creates a file referenced by platform file id.
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::FileId(id.into())
    }

    /// Creates a file backed by a local path.
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Creates a file from in-memory bytes.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            data: data.into(),
            filename: None,
        }
    }

    /// Creates a file from in-memory bytes with an explicit filename.
    pub fn bytes_named(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::Bytes {
            data: data.into(),
            filename: Some(filename.into()),
        }
    }

    /// Returns `true` when this file carries local content to upload.
    pub fn is_attachment(&self) -> bool {
        match self {
            Self::Path(_) => true,
            Self::Bytes { data, .. } => !data.is_empty(),
            Self::Url(_) | Self::FileId(_) => false,
        }
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::FileId(id) => f.debug_tuple("FileId").field(id).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes { data, filename } => f
                .debug_struct("Bytes")
                .field("len", &data.len())
                .field("filename", filename)
                .finish(),
        }
    }
}

// =============================================================================
// FileHandle
// =============================================================================

/// An already-open file plus the name to upload it under.
///
/// The handle is moved into the outgoing request and dropped (closed) when the
/// call returns.
#[derive(Debug)]
pub struct FileHandle {
    /// The open file.
    pub file: File,
    /// Filename declared in the multipart part.
    pub name: String,
}

impl FileHandle {
    /// Wraps an open file.
    pub fn new(file: File, name: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
        }
    }

    /// Opens `path` and names the handle after its final component.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(file, file_name_of(path)))
    }
}

/// Returns the final path component, or the whole path when there is none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// =============================================================================
// Value
// =============================================================================

/// A single parameter value.
#[derive(Debug)]
pub enum Value {
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer (chat ids, user ids).
    Int64(i64),
    /// Floating point number, sent with 8 decimal places.
    Float(f64),
    /// Boolean, sent as `true` / `false`.
    Bool(bool),
    /// Plain string.
    String(String),
    /// A closed set of platform strings (chat actions, parse modes, ...).
    Enum(&'static str),
    /// A file parameter.
    File(InputFile),
    /// A raw byte buffer, always uploaded as an attachment.
    Bytes(Vec<u8>),
    /// An already-open file, always uploaded as an attachment.
    Handle(FileHandle),
    /// Any structured value, sent as compact JSON.
    Json(serde_json::Value),
}

impl Value {
    /// Serializes `value` into a [`Value::Json`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Returns `true` when the value must be streamed as a multipart part.
    pub fn is_attachment(&self) -> bool {
        match self {
            Self::Bytes(_) | Self::Handle(_) => true,
            Self::File(file) => file.is_attachment(),
            _ => false,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Int64(_) => "int64",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::File(_) => "file",
            Self::Bytes(_) => "bytes",
            Self::Handle(_) => "handle",
            Self::Json(_) => "json",
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<InputFile> for Value {
    fn from(v: InputFile) -> Self {
        Self::File(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<FileHandle> for Value {
    fn from(v: FileHandle) -> Self {
        Self::Handle(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

// =============================================================================
// ParameterSet
// =============================================================================

/// Field name → value mapping for one call.
///
/// Keys are kept sorted so the same set always produces the same body.
#[derive(Debug, Default)]
pub struct ParameterSet {
    values: BTreeMap<String, Value>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a structured value as JSON.
    ///
    /// A value that cannot be serialized is logged and left out, the same way
    /// an unencodable field is dropped at send time.
    pub fn insert_json<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> &mut Self {
        let key = key.into();
        match Value::json(value) {
            Ok(v) => {
                self.values.insert(key, v);
            }
            Err(e) => warn!(field = %key, error = %e, "Dropping parameter that could not be encoded as json"),
        }
        self
    }

    /// Inserts `value` only when it is `Some`.
    pub fn insert_opt<V: Into<Value>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    /// Moves every entry of `other` into `self`; entries in `self` win.
    pub fn merge_missing(&mut self, other: ParameterSet) -> &mut Self {
        for (key, value) in other.values {
            self.values.entry(key).or_insert(value);
        }
        self
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Removes and returns the value for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when there are no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_file_attachment_kinds() {
        assert!(InputFile::path("/tmp/a.png").is_attachment());
        assert!(InputFile::bytes(vec![1, 2, 3]).is_attachment());
        assert!(!InputFile::bytes(Vec::new()).is_attachment());
        assert!(!InputFile::url("https://example.com/a.png").is_attachment());
        assert!(!InputFile::file_id("AgAD").is_attachment());
    }

    #[test]
    fn test_value_attachment_kinds() {
        assert!(Value::Bytes(vec![]).is_attachment());
        assert!(!Value::from("text").is_attachment());
        assert!(!Value::from(json!({"a": 1})).is_attachment());
    }

    #[test]
    fn test_parameter_set_insert_and_order() {
        let params = ParameterSet::new()
            .with("text", "hi")
            .with("chat_id", 1_i64)
            .with("disable_notification", true);

        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["chat_id", "disable_notification", "text"]);
    }

    #[test]
    fn test_insert_opt_skips_none() {
        let mut params = ParameterSet::new();
        params.insert_opt("offset", None::<i64>);
        params.insert_opt("limit", Some(10));
        assert!(!params.contains("offset"));
        assert!(matches!(params.get("limit"), Some(Value::Int(10))));
    }

    #[test]
    fn test_merge_missing_keeps_existing() {
        let mut params = ParameterSet::new().with("text", "essential");
        params.merge_missing(
            ParameterSet::new()
                .with("text", "option")
                .with("parse_mode", "HTML"),
        );
        assert!(matches!(params.get("text"), Some(Value::String(s)) if s == "essential"));
        assert!(params.contains("parse_mode"));
    }

    #[test]
    fn test_insert_json() {
        let mut params = ParameterSet::new();
        params.insert_json("allowed_updates", &["message", "edited_message"]);
        assert!(matches!(
            params.get("allowed_updates"),
            Some(Value::Json(v)) if v == &json!(["message", "edited_message"])
        ));
    }

    #[test]
    fn test_bytes_debug_hides_content() {
        let file = InputFile::bytes_named(vec![0u8; 4096], "big.bin");
        let dbg = format!("{file:?}");
        assert!(dbg.contains("len: 4096"));
        assert!(dbg.len() < 100);
    }
}
