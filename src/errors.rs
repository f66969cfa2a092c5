use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Remote retrieval failed: transport error, timeout, non-2xx status or an oversized body
    #[error("Failed to fetch {url}: {message}")]
    FetchError {
        url: String,
        status: Option<u16>,
        message: String,
    },
    /// Input is not a valid gzip stream
    #[error("Decompression error: {0}")]
    DecompressionError(String),
    /// Decompressed bytes are not valid UTF-8
    #[error("Encoding error: invalid UTF-8 at byte {valid_up_to}: {message}")]
    EncodingError { valid_up_to: usize, message: String },
    /// Decompressed text is not well-formed XML
    #[error("Malformed XML at line {line}, column {column}: {message}")]
    MalformedDocumentError {
        line: usize,
        column: usize,
        message: String,
    },
    /// Building the spreadsheet failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// No bytes were supplied
    #[error("Input is empty")]
    EmptyInput,
    /// Input exceeds a configured size limit
    #[error("Input exceeds the limit of {limit} bytes")]
    InputTooLarge { limit: usize },
    /// Invalid request or configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::FetchError { .. } => "fetch_error",
            AppError::DecompressionError(_) => "decompression_error",
            AppError::EncodingError { .. } => "encoding_error",
            AppError::MalformedDocumentError { .. } => "malformed_document",
            AppError::SerializationError(_) => "serialization_error",
            AppError::EmptyInput => "empty_input",
            AppError::InputTooLarge { .. } => "input_too_large",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::UrlError(_) => "invalid_url",
            AppError::IoError(_) => "io_error",
        }
    }
}

// Conversion implementations for common errors
impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<polars::error::PolarsError> for AppError {
    fn from(err: polars::error::PolarsError) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::SerializationError(format!("XML write error: {err}"))
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
