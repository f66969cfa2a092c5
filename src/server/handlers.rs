use super::response::workbook_response;
use super::AppState;
use crate::constants::{FILE_FIELD, URL_FIELD};
use crate::converter;
use crate::errors::{AppError, AppResult};
use crate::models::{Conversion, InputSource};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{debug, info};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Deserialize)]
pub struct UrlForm {
    url: String,
}

/// Serves the page with the URL and upload forms.
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Fetches the feed named by the `url` form field and converts it.
pub async fn convert_url(
    State(state): State<AppState>,
    form: Result<Form<UrlForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(form) = form.map_err(|e| {
        AppError::InvalidInput(format!("Missing or invalid '{URL_FIELD}' field: {e}"))
    })?;

    debug!(url = %form.url, "Fetching feed");
    let gz_data = state.fetcher.fetch(&form.url).await?;
    let conversion = convert_blocking(gz_data, InputSource::Url).await?;
    Ok(workbook_response(conversion))
}

/// Converts the bytes of the `file` multipart field.
pub async fn convert_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let mut multipart = multipart
        .map_err(|e| AppError::InvalidInput(format!("Expected a multipart upload: {e}")))?;
    let limit = state.config.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        if field.name() == Some(FILE_FIELD) {
            debug!(filename = ?field.file_name(), "Reading upload");
            upload = Some(field.bytes().await.map_err(|e| upload_error(e, limit))?);
            break;
        }
    }

    let gz_data = upload
        .ok_or_else(|| AppError::InvalidInput(format!("Missing '{FILE_FIELD}' field")))?;
    let conversion = convert_blocking(gz_data, InputSource::Upload).await?;
    Ok(workbook_response(conversion))
}

fn upload_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InputTooLarge { limit }
    } else {
        AppError::InvalidInput(format!("Failed to read upload: {err}"))
    }
}

/// Runs the CPU-bound conversion on the blocking pool.
async fn convert_blocking<B>(gz_data: B, source: InputSource) -> AppResult<Conversion>
where
    B: AsRef<[u8]> + Send + 'static,
{
    let conversion = tokio::task::spawn_blocking(move || converter::convert(gz_data.as_ref()))
        .await
        .map_err(|e| AppError::IoError(format!("Task join error: {e}")))??;

    info!(
        source = source.display_name(),
        records = conversion.record_count,
        "Converted jobs"
    );
    Ok(conversion)
}
