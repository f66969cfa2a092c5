use crate::constants::{DOWNLOAD_DISPOSITION, RECORD_COUNT_HEADER, XLSX_CONTENT_TYPE};
use crate::errors::AppError;
use crate::models::Conversion;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
    /// Upstream HTTP status of a failed fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

/// Maps an error to the HTTP status returned to the caller.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::FetchError { .. } => StatusCode::BAD_GATEWAY,
        AppError::DecompressionError(_)
        | AppError::EncodingError { .. }
        | AppError::MalformedDocumentError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::EmptyInput | AppError::InvalidInput(_) | AppError::UrlError(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::SerializationError(_) | AppError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!(kind = self.kind(), status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(kind = self.kind(), status = status.as_u16(), error = %self, "Request rejected");
        }

        let (line, column) = match &self {
            AppError::MalformedDocumentError { line, column, .. } => (Some(*line), Some(*column)),
            _ => (None, None),
        };
        let upstream_status = match &self {
            AppError::FetchError { status, .. } => *status,
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind(),
                message: self.to_string(),
                line,
                column,
                status: upstream_status,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Wraps a finished conversion as a `jobs.xlsx` download.
pub fn workbook_response(conversion: Conversion) -> Response {
    let record_count = conversion.record_count;
    let mut response = conversion.workbook.into_response();

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static(DOWNLOAD_DISPOSITION),
    );
    headers.insert(
        HeaderName::from_static(RECORD_COUNT_HEADER),
        HeaderValue::from(record_count),
    );
    response
}
