//! The transport seam between callers and the HTTP layer.

use async_trait::async_trait;

use crate::context::ApiContext;
use crate::error::TransportResult;
use crate::value::ParameterSet;

/// Sends one API call and returns the raw response body.
///
/// Implementations perform exactly one exchange per call, with no retries.
/// The parameter set is consumed so attachment handles live only as long as
/// the call. Error text must already be redacted with [`ApiContext::redact`].
///
/// | Implementation | Strategy |
/// |----------------|----------|
/// | `tgapi_transport::HttpDispatcher` | reqwest POST, multipart or urlencoded |
/// | test doubles | canned bodies, recorded parameters |
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Sends `method` with `params` and returns the response body.
    ///
    /// # Errors
    /// Returns a [`TransportError`](crate::TransportError) if the request
    /// could not be built, sent, or its body read.
    async fn dispatch(
        &self,
        ctx: &ApiContext,
        method: &str,
        params: ParameterSet,
    ) -> TransportResult<Vec<u8>>;
}
