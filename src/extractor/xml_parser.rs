use super::dtd::EntityTable;
use crate::constants::RECORD_TAG;
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::utils::line_and_column;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::borrow::Cow;
use tracing::debug;

/// An element that has been opened but not yet closed.
struct OpenElement {
    name: String,
    /// Index into the record list when this element is itself a record
    record: Option<usize>,
    /// Index of the record this element is a direct child (field) of
    field_of: Option<usize>,
    /// Character data seen before the first child element
    text: String,
    text_done: bool,
}

/// Collects records while walking the document's events.
///
/// Records are allocated when their start tag is seen, so nested records keep
/// document order even though inner elements close first.
struct RecordCollector {
    records: Vec<Record>,
    stack: Vec<OpenElement>,
    root_seen: bool,
    root_closed: bool,
}

impl RecordCollector {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            stack: Vec::with_capacity(16),
            root_seen: false,
            root_closed: false,
        }
    }

    fn open(&mut self, name: String) -> Result<(), String> {
        if self.root_closed {
            return Err("junk after document element".into());
        }
        self.root_seen = true;

        let field_of = match self.stack.last_mut() {
            Some(parent) => {
                parent.text_done = true;
                parent.record
            }
            None => None,
        };
        let record = if name == RECORD_TAG {
            self.records.push(Record::new());
            Some(self.records.len() - 1)
        } else {
            None
        };

        self.stack.push(OpenElement {
            name,
            record,
            field_of,
            text: String::new(),
            text_done: false,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| "unmatched end tag".to_string())?;

        if let Some(index) = element.field_of {
            let record = &mut self.records[index];
            if record.contains(&element.name) {
                debug!(
                    record = index,
                    field = %element.name,
                    "Repeated field, keeping the last value"
                );
            }
            let value = (!element.text.is_empty()).then_some(element.text);
            record.insert(element.name, value);
        }

        if self.stack.is_empty() {
            self.root_closed = true;
        }
        Ok(())
    }

    fn text(&mut self, chunk: &str) -> Result<(), String> {
        if let Some(c) = chunk.chars().find(|c| !is_xml_char(*c)) {
            return Err(format!("invalid character U+{:04X}", c as u32));
        }

        match self.stack.last_mut() {
            None => {
                if !chunk.chars().all(is_xml_whitespace) {
                    return Err("text outside the root element".into());
                }
            }
            Some(element) => {
                if element.field_of.is_some() && !element.text_done {
                    element.text.push_str(&normalize_line_endings(chunk));
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Record>, String> {
        if let Some(element) = self.stack.last() {
            return Err(format!("unclosed element <{}>", element.name));
        }
        if !self.root_seen {
            return Err("no element found".into());
        }
        Ok(self.records)
    }
}

/// Parses XML text and flattens every `<job>` element, at any depth, into a [`Record`].
///
/// Each record maps the tag of a direct child to that child's text (the
/// character data before its first sub-element), verbatim. Children without
/// text map to `None`. A repeated child tag keeps its first position and its
/// last value.
///
/// Tags in a namespace are named `{uri}local`, so only un-namespaced `<job>`
/// elements are records. Attributes are checked but never become fields.
/// General entities declared in an internal DTD subset are expanded.
///
/// # Errors
///
/// Returns `MalformedDocumentError` with the line and column of the problem if
/// the text is not a well-formed XML document.
pub fn parse_records(xml: &str) -> AppResult<Vec<Record>> {
    let mut reader = NsReader::from_str(xml);

    // Heuristic: ~1 record per KB
    let mut collector = RecordCollector::with_capacity((xml.len() / 1024).max(16));

    let mut entities = EntityTable::default();
    let mut doctype_seen = false;

    loop {
        let event_start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(malformed(xml, reader.error_position() as usize, e.to_string()));
            }
        };

        let step = match event {
            Event::Start(e) => check_attributes(&e, &entities)
                .and_then(|_| element_name(&reader, &e))
                .and_then(|name| collector.open(name)),
            Event::Empty(e) => check_attributes(&e, &entities)
                .and_then(|_| element_name(&reader, &e))
                .and_then(|name| collector.open(name))
                .and_then(|_| collector.close()),
            Event::End(_) => collector.close(),
            Event::Text(e) => match e.decode() {
                Ok(text) => collector.text(&text),
                Err(e) => Err(format!("Failed to decode XML text: {e}")),
            },
            Event::CData(e) => collector.text(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => entities
                .resolve(&String::from_utf8_lossy(&e))
                .and_then(|resolved| collector.text(&resolved)),
            Event::Decl(_) if event_start != 0 => {
                Err("XML declaration not at start of document".into())
            }
            Event::PI(e) if e.target().eq_ignore_ascii_case(b"xml") => {
                Err("XML declaration not at start of document".into())
            }
            Event::DocType(e) => {
                if doctype_seen || collector.root_seen {
                    Err("misplaced document type declaration".into())
                } else {
                    doctype_seen = true;
                    match e.decode() {
                        Ok(doctype) => EntityTable::from_doctype(&doctype).map(|table| {
                            entities = table;
                        }),
                        Err(e) => Err(format!("Failed to decode DOCTYPE: {e}")),
                    }
                }
            }
            Event::Eof => break,
            _ => Ok(()),
        };

        step.map_err(|message| malformed(xml, event_start, message))?;
    }

    let end = xml.len();
    let records = collector
        .finish()
        .map_err(|message| malformed(xml, end, message))?;

    debug!(records = records.len(), "Parsed XML document");
    Ok(records)
}

fn malformed(xml: &str, offset: usize, message: impl Into<String>) -> AppError {
    let (line, column) = line_and_column(xml, offset);
    AppError::MalformedDocumentError {
        line,
        column,
        message: message.into(),
    }
}

/// Returns the element's tag, in `{uri}local` form when it is in a namespace.
fn element_name(reader: &NsReader<&[u8]>, start: &BytesStart) -> Result<String, String> {
    let (resolved, local) = reader.resolve_element(start.name());
    let local = String::from_utf8_lossy(local.as_ref());
    match resolved {
        ResolveResult::Unbound => Ok(local.into_owned()),
        ResolveResult::Bound(namespace) => Ok(format!(
            "{{{}}}{}",
            String::from_utf8_lossy(namespace.as_ref()),
            local
        )),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unbound prefix '{}'",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

/// Checks the attribute syntax of a start tag and that every value is valid
/// character data whose references all resolve. Attribute values are not kept.
fn check_attributes(start: &BytesStart, entities: &EntityTable) -> Result<(), String> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute: {e}"))?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| format!("invalid value for attribute '{key}': {e}"))?;

        if value.contains('<') {
            return Err(format!("'<' in value of attribute '{key}'"));
        }
        if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
            return Err(format!(
                "invalid character U+{:04X} in attribute '{key}'",
                c as u32
            ));
        }
        entities.expand(value)?;
    }
    Ok(())
}

/// The `Char` production of XML 1.0.
pub(super) fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
