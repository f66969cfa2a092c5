use crate::errors::AppResult;
use crate::extractor::{extract_records, records_to_dataframe};
use crate::models::Conversion;
use crate::spreadsheet::write_workbook;
use crate::utils::{elapsed_ms, kb_from_bytes, round_two_decimals};
use std::time::Instant;
use tracing::info;

/// Converts a gzip-compressed job feed into an XLSX workbook held in memory.
///
/// # Workflow
///
/// 1. Decompresses and decodes the input as UTF-8
/// 2. Parses the XML and flattens every `<job>` element into a record
/// 3. Builds a table whose columns are the union of all record fields
/// 4. Writes the table as a single-sheet workbook
///
/// Each call owns its output buffer, so concurrent conversions cannot observe
/// each other's results.
///
/// # Errors
///
/// Propagates the first failure from any stage; no partial output is returned.
///
/// # Example
///
/// ```no_run
/// use job_xml_converter::converter;
///
/// # fn main() -> Result<(), job_xml_converter::errors::AppError> {
/// let gz_data = std::fs::read("jobs.xml.gz")?;
/// let conversion = converter::convert(&gz_data)?;
/// std::fs::write("jobs.xlsx", &conversion.workbook)?;
/// println!("{} jobs", conversion.record_count);
/// # Ok(())
/// # }
/// ```
pub fn convert(gz_data: &[u8]) -> AppResult<Conversion> {
    let start = Instant::now();

    let records = extract_records(gz_data)?;
    let record_count = records.len();

    let df = records_to_dataframe(records)?;
    let column_count = df.width();
    let workbook = write_workbook(&df)?;

    info!(
        records = record_count,
        columns = column_count,
        input_kb = round_two_decimals(kb_from_bytes(gz_data.len())),
        output_kb = round_two_decimals(kb_from_bytes(workbook.len())),
        elapsed_ms = elapsed_ms(start.elapsed()),
        "Conversion completed"
    );

    Ok(Conversion {
        workbook,
        record_count,
        column_count,
    })
}
