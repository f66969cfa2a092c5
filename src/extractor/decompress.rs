use crate::errors::{AppError, AppResult};
use flate2::read::MultiGzDecoder;
use std::io::Read;

/// Decompresses a gzip buffer and decodes the result as UTF-8.
///
/// Concatenated gzip members are decoded back to back. A leading byte order
/// mark is dropped.
///
/// # Errors
///
/// - `EmptyInput` if `gz_data` has no bytes
/// - `DecompressionError` if the buffer is not a complete gzip stream
/// - `EncodingError` if the decompressed bytes are not valid UTF-8
pub fn decompress_to_string(gz_data: &[u8]) -> AppResult<String> {
    if gz_data.is_empty() {
        return Err(AppError::EmptyInput);
    }

    // Heuristic: text feeds usually compress around 8:1
    let mut decompressed = Vec::with_capacity(gz_data.len().saturating_mul(8));
    MultiGzDecoder::new(gz_data)
        .read_to_end(&mut decompressed)
        .map_err(|e| AppError::DecompressionError(e.to_string()))?;

    let mut text = String::from_utf8(decompressed).map_err(|e| {
        let utf8_error = e.utf8_error();
        AppError::EncodingError {
            valid_up_to: utf8_error.valid_up_to(),
            message: utf8_error.to_string(),
        }
    })?;

    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }

    Ok(text)
}
