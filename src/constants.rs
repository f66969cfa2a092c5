// Record discovery
pub const RECORD_TAG: &str = "job";

// Download response
pub const DOWNLOAD_FILENAME: &str = "jobs.xlsx";
pub const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"jobs.xlsx\"";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const RECORD_COUNT_HEADER: &str = "x-record-count";

// Spreadsheet layout
pub const SHEET_NAME: &str = "Sheet1";
pub const MAX_SHEET_ROWS: usize = 1_048_576;
pub const MAX_SHEET_COLUMNS: usize = 16_384;

// Form field names
pub const URL_FIELD: &str = "url";
pub const FILE_FIELD: &str = "file";

// Environment variable read for the listening port
pub const PORT_ENV_VAR: &str = "PORT";
