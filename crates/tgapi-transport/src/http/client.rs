//! HTTP dispatcher implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use tracing::debug;

use tgapi_core::{
    ApiContext, Dispatcher, Encoding, ParameterSet, TransportError, TransportResult,
    encode_urlencoded, select_encoding,
};

use super::multipart;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends API calls as HTTP POST requests.
///
/// The inner [`Client`] is cheap to clone and safe to share; one dispatcher
/// serves any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
}

impl HttpDispatcher {
    /// Creates a dispatcher whose exchanges give up after `timeout`.
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn request(
        &self,
        ctx: &ApiContext,
        url: &str,
        encoding: Encoding,
        params: ParameterSet,
    ) -> RequestBuilder {
        match encoding {
            Encoding::Multipart => {
                let form = multipart::build_form(ctx, params).await;
                self.client.post(url).multipart(form)
            }
            Encoding::UrlEncoded => {
                let body = encode_urlencoded(&params);
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, encoding.content_type())
                    .header(CONTENT_LENGTH, body.len())
                    .body(body)
            }
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        ctx: &ApiContext,
        method: &str,
        params: ParameterSet,
    ) -> TransportResult<Vec<u8>> {
        let encoding = select_encoding(&params);
        debug!(method = %method, encoding = ?encoding, fields = params.len(), "Dispatching API call");

        let url = ctx.method_url(method);
        // The form, and every attachment handle in it, is dropped with the
        // request on all exit paths below.
        let request = self
            .request(ctx, &url, encoding, params)
            .await
            .build()
            .map_err(|e| TransportError::Build(ctx.redact(&e.to_string())))?;

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::Request(ctx.redact(&e.to_string())))?;

        // Failed calls still carry a JSON envelope, so the status is not an error here.
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Read(ctx.redact(&e.to_string())))?;

        debug!(method = %method, status = status.as_u16(), len = body.len(), "Received API response");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Uri};
    use serde_json::{Value as Json, json};
    use tgapi_core::{InputFile, decode};

    const PNG: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00\x00\x0DIHDR";

    async fn echo(uri: Uri, headers: HeaderMap, body: Bytes) -> axum::Json<Json> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        axum::Json(json!({
            "ok": true,
            "result": {
                "path": uri.path(),
                "content_type": content_type,
                "body": String::from_utf8_lossy(&body),
            }
        }))
    }

    async fn serve() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().fallback(echo))
                .await
                .unwrap();
        });
        format!("http://{addr}/bot")
    }

    async fn call(ctx: &ApiContext, method: &str, params: ParameterSet) -> Json {
        let http = HttpDispatcher::new(Duration::from_secs(5)).unwrap();
        let body = http.dispatch(ctx, method, params).await.unwrap();
        decode::<Json>(&body).unwrap().result.unwrap()
    }

    #[tokio::test]
    async fn test_urlencoded_request() {
        let ctx = ApiContext::new("123:ABC").with_api_base_url(serve().await);
        let params = ParameterSet::new().with("chat_id", 42_i64).with("text", "hi there");

        let echoed = call(&ctx, "sendMessage", params).await;
        assert_eq!(echoed["path"], "/bot123:ABC/sendMessage");
        assert_eq!(echoed["content_type"], "application/x-www-form-urlencoded");
        assert_eq!(echoed["body"], "chat_id=42&text=hi+there");
    }

    #[tokio::test]
    async fn test_multipart_request_with_sniffed_name() {
        let ctx = ApiContext::new("123:ABC").with_api_base_url(serve().await);
        let params = ParameterSet::new()
            .with("chat_id", 42_i64)
            .with("photo", PNG.to_vec());

        let echoed = call(&ctx, "sendPhoto", params).await;
        let content_type = echoed["content_type"].as_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = echoed["body"].as_str().unwrap();
        assert!(body.contains("name=\"chat_id\"\r\n\r\n42\r\n"));
        assert!(body.contains("name=\"photo\"; filename=\"photo.png\""));
        assert!(body.contains("Content-Type: image/png"));
    }

    #[tokio::test]
    async fn test_multipart_streams_path_and_drops_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4 test document").unwrap();

        let ctx = ApiContext::new("123:ABC").with_api_base_url(serve().await);
        let params = ParameterSet::new()
            .with("document", InputFile::path(&path))
            .with("thumbnail", InputFile::path(dir.path().join("missing.jpg")));

        let echoed = call(&ctx, "sendDocument", params).await;
        let body = echoed["body"].as_str().unwrap();
        assert!(body.contains("name=\"document\"; filename=\"report.pdf\""));
        assert!(body.contains("Content-Type: application/pdf"));
        assert!(body.contains("%PDF-1.4 test document"));
        assert!(!body.contains("name=\"thumbnail\""));
    }

    #[tokio::test]
    async fn test_transport_error_is_redacted() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let ctx = ApiContext::new("123:SECRET")
            .with_api_base_url(format!("http://127.0.0.1:{port}/bot"));
        let http = HttpDispatcher::new(Duration::from_secs(5)).unwrap();

        let err = http
            .dispatch(&ctx, "getMe", ParameterSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[tokio::test]
    async fn test_build_error_is_redacted() {
        let ctx = ApiContext::new("123:SECRET").with_api_base_url("http://[bad/bot");
        let http = HttpDispatcher::new(Duration::from_secs(5)).unwrap();

        let err = http
            .dispatch(&ctx, "getMe", ParameterSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Build(_)));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[tokio::test]
    async fn test_truncated_body_read_error_is_redacted() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                head.extend_from_slice(&buf[..n]);
            }
            // Promise more body than is sent, then hang up.
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"ok\":")
                .await
                .unwrap();
            stream.shutdown().await.unwrap();
        });

        let ctx = ApiContext::new("123:SECRET").with_api_base_url(format!("http://{addr}/bot"));
        let http = HttpDispatcher::new(Duration::from_secs(5)).unwrap();

        let err = http
            .dispatch(&ctx, "getMe", ParameterSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Read(_)));
        assert!(!err.to_string().contains("SECRET"));
    }
}
