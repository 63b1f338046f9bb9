//! Multipart body assembly.
//!
//! Attachments become file parts named after their field; everything else is
//! a plain text part. A field that fails to build is logged and left out, the
//! rest of the form is still sent.

use std::path::Path;

use reqwest::Body;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{trace, warn};

use tgapi_core::{ApiContext, EncodingError, FileHandle, InputFile, ParameterSet, Value};

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Error)]
enum PartError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot read metadata of '{name}': {source}")]
    Metadata {
        name: String,
        source: std::io::Error,
    },

    #[error("invalid content type '{mime}': {source}")]
    Mime {
        mime: String,
        source: reqwest::Error,
    },
}

/// Builds the form for one call, consuming `params`.
///
/// Opened files are owned by the returned form and closed when it is dropped.
pub(super) async fn build_form(ctx: &ApiContext, params: ParameterSet) -> Form {
    let mut form = Form::new();
    for (field, value) in params {
        let kind = value.kind();
        match build_part(&field, value).await {
            Ok(part) => form = form.part(field, part),
            Err(e) => warn!(
                field = %field,
                kind,
                error = %ctx.redact(&e.to_string()),
                "Omitting parameter from multipart request"
            ),
        }
    }
    form
}

async fn build_part(field: &str, value: Value) -> Result<Part, PartError> {
    match value {
        Value::Bytes(data) => bytes_part(field, data, None),
        Value::Handle(handle) => handle_part(handle).await,
        Value::File(InputFile::Path(path)) => path_part(&path).await,
        Value::File(InputFile::Bytes { data, filename }) if !data.is_empty() => {
            bytes_part(field, data, filename)
        }
        other => Ok(Part::text(tgapi_core::encode_param(field, &other)?)),
    }
}

fn bytes_part(field: &str, data: Vec<u8>, filename: Option<String>) -> Result<Part, PartError> {
    let (name, mime) = match filename {
        Some(name) => {
            let mime = mime_guess::from_path(&name)
                .first_raw()
                .or_else(|| tgapi_core::sniff(&data))
                .unwrap_or(OCTET_STREAM);
            (name, mime)
        }
        None => (
            synthesized_name(field, &data),
            tgapi_core::sniff(&data).unwrap_or(OCTET_STREAM),
        ),
    };
    trace!(field = %field, filename = %name, mime, len = data.len(), "Attaching bytes");
    with_mime(Part::bytes(data).file_name(name), mime)
}

async fn path_part(path: &Path) -> Result<Part, PartError> {
    let file = File::open(path).await.map_err(|source| PartError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path).first_raw().unwrap_or(OCTET_STREAM);
    stream_part(file, name, mime).await
}

async fn handle_part(handle: FileHandle) -> Result<Part, PartError> {
    let FileHandle { file, name } = handle;
    let mime = mime_guess::from_path(&name).first_raw().unwrap_or(OCTET_STREAM);
    stream_part(File::from_std(file), name, mime).await
}

async fn stream_part(file: File, name: String, mime: &str) -> Result<Part, PartError> {
    let len = file
        .metadata()
        .await
        .map_err(|source| PartError::Metadata {
            name: name.clone(),
            source,
        })?
        .len();
    trace!(filename = %name, mime, len, "Streaming file");
    let body = Body::wrap_stream(ReaderStream::new(file));
    with_mime(Part::stream_with_length(body, len).file_name(name), mime)
}

fn with_mime(part: Part, mime: &str) -> Result<Part, PartError> {
    part.mime_str(mime).map_err(|source| PartError::Mime {
        mime: mime.to_string(),
        source,
    })
}

/// `"{field}.{ext}"` from the sniffed content, or just `field` when sniffing
/// is inconclusive.
fn synthesized_name(field: &str, data: &[u8]) -> String {
    match tgapi_core::extension(data) {
        "" => field.to_string(),
        ext => format!("{field}.{ext}"),
    }
}
