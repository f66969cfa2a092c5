//! job-xml-converter library
//!
//! This crate provides the core functionality for the `job-xml-converter` binary:
//! turning a gzip-compressed XML feed of `<job>` elements into an Excel workbook.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! - [`extractor`] - Decompresses the feed, parses the XML and flattens `<job>` elements into records
//! - [`spreadsheet`] - Writes a column-union table as an in-memory XLSX workbook
//! - [`converter`] - Runs extraction and serialization for one input
//! - [`fetcher`] - Downloads remote feeds for the convert-from-URL endpoint
//! - [`server`] - HTTP routes, handlers and error responses
//! - [`cli`] / [`config`] - Command-line flags and TOML configuration
//! - [`models`] - Records and conversion results
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use job_xml_converter::{converter, extractor, errors::AppResult};
//!
//! # fn example(gz_data: &[u8]) -> AppResult<()> {
//! // Inspect the records...
//! for record in extractor::extract_records(gz_data)? {
//!     println!("{:?}", record.get("title"));
//! }
//!
//! // ...or go straight to a workbook
//! let conversion = converter::convert(gz_data)?;
//! std::fs::write("jobs.xlsx", conversion.workbook)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod converter;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod server;
pub mod spreadsheet;
pub mod utils;
