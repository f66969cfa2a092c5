//! Common test utilities for integration tests

use flate2::write::GzEncoder;
use flate2::Compression;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;

/// Gzip-compresses `data` the way a `.xml.gz` feed would be.
#[allow(dead_code)]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Cells of `xl/worksheets/sheet1.xml`, keyed by 1-based (row, column).
#[allow(dead_code)]
pub struct SheetCells {
    pub cells: BTreeMap<(u32, u32), String>,
}

#[allow(dead_code)]
impl SheetCells {
    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    /// Values of the header row, left to right.
    pub fn header(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|((row, _), _)| *row == 1)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0)
    }

    /// Values of one column below the header, `None` for blank cells.
    pub fn column(&self, col: u32) -> Vec<Option<&str>> {
        (2..=self.max_row()).map(|row| self.get(row, col)).collect()
    }
}

fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let split = cell_ref
        .find(|c: char| c.is_ascii_digit())
        .expect("cell reference has a row number");
    let (letters, digits) = cell_ref.split_at(split);
    let col = letters
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
    (digits.parse().unwrap(), col)
}

/// Opens an XLSX package and reads the inline-string cells of the first sheet.
#[allow(dead_code)]
pub fn read_sheet(workbook: &[u8]) -> SheetCells {
    let mut archive = ZipArchive::new(Cursor::new(workbook)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut cells = BTreeMap::new();
    let mut current: Option<(u32, u32)> = None;
    let mut in_text = false;
    let mut text = String::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"c" => {
                let r = e
                    .attributes()
                    .filter_map(|a| a.ok())
                    .find(|a| a.key.as_ref() == b"r")
                    .expect("cell has a reference");
                current = Some(parse_cell_ref(&String::from_utf8_lossy(&r.value)));
                text.clear();
            }
            Event::Start(e) if e.name().as_ref() == b"t" => in_text = true,
            Event::Text(e) if in_text => text.push_str(&e.decode().unwrap()),
            Event::GeneralRef(e) if in_text => {
                let resolved = match String::from_utf8_lossy(&e).as_ref() {
                    "amp" => "&",
                    "lt" => "<",
                    "gt" => ">",
                    "quot" => "\"",
                    "apos" => "'",
                    other => panic!("unexpected entity {other}"),
                };
                text.push_str(resolved);
            }
            Event::End(e) if e.name().as_ref() == b"t" => in_text = false,
            Event::End(e) if e.name().as_ref() == b"c" => {
                if let Some(position) = current.take() {
                    cells.insert(position, std::mem::take(&mut text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    SheetCells { cells }
}

/// Feed with two jobs whose fields only partly overlap.
#[allow(dead_code)]
pub const HETEROGENEOUS_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<source>
  <publisher>Example Jobs</publisher>
  <job>
    <title>Engineer</title>
    <location>Berlin</location>
  </job>
  <job>
    <title>Chef</title>
    <salary>30000</salary>
  </job>
</source>"#;

/// Feed with a repeated child tag.
#[allow(dead_code)]
pub const DUPLICATE_FIELD_FEED: &str = r#"<jobs>
  <job>
    <salary>100</salary>
    <title>Analyst</title>
    <salary>200</salary>
  </job>
</jobs>"#;

/// Feed without any job element.
#[allow(dead_code)]
pub const EMPTY_FEED: &str = r#"<?xml version="1.0"?>
<source>
  <publisher>Nobody is hiring</publisher>
</source>"#;

/// Builds a feed of `count` jobs with ids `prefix-0 .. prefix-(count-1)`.
#[allow(dead_code)]
pub fn numbered_feed(prefix: &str, count: usize) -> String {
    let mut xml = String::from("<jobs>");
    for i in 0..count {
        xml.push_str(&format!(
            "<job><id>{prefix}-{i}</id><title>Role {i}</title></job>"
        ));
    }
    xml.push_str("</jobs>");
    xml
}

#[allow(dead_code)]
pub const BOUNDARY: &str = "----job-xml-converter-test-boundary";

/// Encodes a single file part as a `multipart/form-data` body.
#[allow(dead_code)]
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/gzip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Serves `feed` at `/jobs.xml.gz` and a 500 at `/broken.xml.gz` on a random local port.
/// Any other path is a 404.
#[allow(dead_code)]
pub async fn spawn_feed_server(feed: Vec<u8>) -> std::net::SocketAddr {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    let app = Router::new()
        .route(
            "/jobs.xml.gz",
            get(move || {
                let feed = feed.clone();
                async move { feed }
            }),
        )
        .route(
            "/broken.xml.gz",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}
