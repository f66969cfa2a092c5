use crate::errors::AppResult;
use polars::prelude::*;
use std::fmt::Write as FmtWrite;

/// Style index of the bold, bordered header cells in `styles.xml`.
const HEADER_STYLE: u32 = 1;

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Converts a 1-based column number to its letter form (1 -> A, 27 -> AA).
pub(crate) fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

fn write_inline_string(
    xml: &mut String,
    cell_ref: &str,
    style: Option<u32>,
    text: &str,
) -> std::fmt::Result {
    let style_attr = style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
    write!(
        xml,
        r#"<c r="{}"{} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        cell_ref,
        style_attr,
        escape_xml(text)
    )
}

/// Generates `xl/worksheets/sheet1.xml` for a frame of string columns.
///
/// Row 1 holds the column names; data starts at row 2. Null cells are left
/// out, so rows with no values are omitted entirely.
pub(crate) fn worksheet_xml(df: &DataFrame) -> AppResult<String> {
    let columns: Vec<&StringChunked> = df
        .get_columns()
        .iter()
        .map(|series| series.str())
        .collect::<PolarsResult<_>>()?;
    let letters: Vec<String> = (1..=columns.len() as u32).map(column_to_letters).collect();

    let mut xml = String::with_capacity(1024 + df.height() * columns.len() * 64);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    match letters.last() {
        Some(last) => write!(xml, r#"<dimension ref="A1:{}{}"/>"#, last, df.height() + 1)?,
        None => xml.push_str(r#"<dimension ref="A1"/>"#),
    }
    xml.push_str(r#"<sheetViews><sheetView tabSelected="1" workbookViewId="0"/></sheetViews>"#);
    xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

    if columns.is_empty() {
        xml.push_str("<sheetData/>");
    } else {
        xml.push_str("<sheetData>");

        xml.push_str(r#"<row r="1">"#);
        for (name, letter) in df.get_column_names().iter().zip(&letters) {
            write_inline_string(&mut xml, &format!("{letter}1"), Some(HEADER_STYLE), name)?;
        }
        xml.push_str("</row>");

        let mut row_xml = String::new();
        for row in 0..df.height() {
            let row_number = row + 2;
            row_xml.clear();
            for (column, letter) in columns.iter().zip(&letters) {
                if let Some(text) = column.get(row) {
                    write_inline_string(&mut row_xml, &format!("{letter}{row_number}"), None, text)?;
                }
            }
            if !row_xml.is_empty() {
                write!(xml, r#"<row r="{row_number}">{row_xml}</row>"#)?;
            }
        }

        xml.push_str("</sheetData>");
    }

    xml.push_str(
        r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
    );
    xml.push_str("</worksheet>");

    Ok(xml)
}
