//! Immutable per-bot context shared by every call.

use std::fmt;

use crate::redact::redact;

/// Default Bot API endpoint prefix; the token and method name are appended.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org/bot";

/// Default file download prefix; the token and file path are appended.
pub const DEFAULT_FILE_BASE_URL: &str = "https://api.telegram.org/file/bot";

/// Base URLs and credentials for one bot.
///
/// Constructed once and never mutated; share it behind an `Arc` across
/// concurrent callers.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiContext {
    token: String,
    api_base_url: String,
    file_base_url: String,
}

impl ApiContext {
    /// Creates a context for `token` against the public endpoints.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            file_base_url: DEFAULT_FILE_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (e.g. a local Bot API server).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Overrides the file download base URL.
    pub fn with_file_base_url(mut self, url: impl Into<String>) -> Self {
        self.file_base_url = url.into();
        self
    }

    /// The bot token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The API base URL.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// The file download base URL.
    pub fn file_base_url(&self) -> &str {
        &self.file_base_url
    }

    /// `{api_base_url}{token}/{method}`.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}{}/{}", self.api_base_url, self.token, method)
    }

    /// `{file_base_url}{token}/{file_path}`. Pure composition, no request.
    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}{}/{}", self.file_base_url, self.token, file_path)
    }

    /// Removes this context's token from `text`.
    pub fn redact(&self, text: &str) -> String {
        redact(&self.token, text)
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("token", &crate::redact::REDACTED)
            .field("api_base_url", &self.api_base_url)
            .field("file_base_url", &self.file_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let ctx = ApiContext::new("42:secret");
        assert_eq!(
            ctx.method_url("getMe"),
            "https://api.telegram.org/bot42:secret/getMe"
        );
    }

    #[test]
    fn test_file_url() {
        let ctx = ApiContext::new("42:secret").with_file_base_url("http://localhost:8081/file/bot");
        assert_eq!(
            ctx.file_url("photos/file_1.jpg"),
            "http://localhost:8081/file/bot42:secret/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let ctx = ApiContext::new("42:secret");
        let dbg = format!("{ctx:?}");
        assert!(!dbg.contains("secret"));
    }
}
