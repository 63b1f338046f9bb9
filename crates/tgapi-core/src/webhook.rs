//! Decoding of webhook request bodies.
//!
//! Serving the webhook is left to the embedding application; this module only
//! turns a received body into an update and hands it to a handler. Malformed
//! bodies reach the handler as errors instead of being dropped.

use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::envelope::snippet;
use crate::error::{DecodeError, DecodeResult};

/// Receives decoded webhook updates.
pub trait UpdateHandler<U>: Send + Sync {
    /// Called once per received body.
    fn on_update(&self, update: DecodeResult<U>);
}

impl<U, F> UpdateHandler<U> for F
where
    F: Fn(DecodeResult<U>) + Send + Sync,
{
    fn on_update(&self, update: DecodeResult<U>) {
        self(update)
    }
}

/// Decodes one webhook body into an update.
pub fn decode_update<U: DeserializeOwned>(body: &[u8]) -> DecodeResult<U> {
    serde_json::from_slice(body).map_err(|e| DecodeError::Shape {
        reason: e.to_string(),
        body: snippet(body),
    })
}

/// Decodes `body` and delivers the outcome to `handler`.
pub fn deliver<U: DeserializeOwned>(body: &[u8], handler: &dyn UpdateHandler<U>) {
    let update = decode_update(body);
    match &update {
        Ok(_) => trace!(len = body.len(), "Received webhook update"),
        Err(e) => warn!(error = %e, "Failed to decode webhook body"),
    }
    handler.on_update(update);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct Update {
        update_id: i64,
    }

    #[test]
    fn test_deliver_valid_update() {
        let seen = Mutex::new(Vec::new());
        let handler = |u: DecodeResult<Update>| seen.lock().unwrap().push(u.map(|u| u.update_id));
        deliver(br#"{"update_id":7}"#, &handler);
        assert!(matches!(seen.lock().unwrap().as_slice(), [Ok(7)]));
    }

    #[test]
    fn test_deliver_malformed_body_reports_error() {
        let seen = Mutex::new(Vec::new());
        let handler = |u: DecodeResult<Update>| seen.lock().unwrap().push(u.is_err());
        deliver(b"{not json", &handler);
        assert_eq!(seen.lock().unwrap().as_slice(), &[true]);
    }
}
