//! Token redaction for error text.

/// Placeholder that replaces the bot token in surfaced text.
pub const REDACTED: &str = "<redacted>";

/// Replaces every occurrence of `token` in `text` with [`REDACTED`].
///
/// An empty token leaves the text untouched.
pub fn redact(token: &str, text: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, REDACTED)
}
