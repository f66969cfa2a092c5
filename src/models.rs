/// One flattened `<job>` element: child tag name to child text.
///
/// Fields keep the order in which their tag first appeared. Inserting a name
/// that is already present replaces the value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, returning the previous value if the field was already present.
    pub fn insert(&mut self, name: String, value: Option<String>) -> Option<Option<String>> {
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Returns the text of a field. `None` both when the field is missing and when it has no text;
    /// use [`Record::contains`] to tell the two apart.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<(String, Option<String>)> {
        self.fields
    }
}

/// Result of a single conversion call. Owned by the caller; nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// XLSX package bytes
    pub workbook: Vec<u8>,
    /// Number of `<job>` records found
    pub record_count: usize,
    /// Number of distinct field names (spreadsheet columns)
    pub column_count: usize,
}

/// Where the compressed input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Url,
    Upload,
}

impl InputSource {
    /// Returns a human-readable name for the input source.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Upload => "upload",
        }
    }
}
