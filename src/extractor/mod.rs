//! Record extraction: gzip bytes to flat `<job>` records to a column-union table.
//!
//! The main entry point is [`extract_records`]; [`records_to_dataframe`] builds
//! the table that the spreadsheet writer consumes.

mod decompress;
mod dtd;
mod table;
mod xml_parser;

use crate::errors::AppResult;
use crate::models::Record;

// Re-export public API
pub use decompress::decompress_to_string;
pub use table::records_to_dataframe;
pub use xml_parser::parse_records;

/// Decompresses `gz_data`, parses it as XML and flattens every `<job>` element.
///
/// Records come back in document order. A document without `<job>` elements
/// yields an empty vector.
///
/// # Errors
///
/// Returns `EmptyInput`, `DecompressionError`, `EncodingError` or
/// `MalformedDocumentError` depending on which stage rejects the input.
pub fn extract_records(gz_data: &[u8]) -> AppResult<Vec<Record>> {
    let xml = decompress_to_string(gz_data)?;
    parse_records(&xml)
}
