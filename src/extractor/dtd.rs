use super::xml_parser::is_xml_char;
use std::collections::HashMap;

/// Nesting limit when an entity's value references other entities
const MAX_EXPANSION_DEPTH: usize = 16;

/// Upper bound for the expansion of a single reference
const MAX_EXPANSION_LEN: usize = 1024 * 1024;

/// General entities declared in the internal subset of a `<!DOCTYPE>`.
///
/// Only internal (literal) entities are kept. Parameter entities and external
/// `SYSTEM`/`PUBLIC` entities are skipped, so references to them stay undefined.
/// Replacement text is expanded as character data, never re-parsed as markup.
#[derive(Debug, Default)]
pub(crate) struct EntityTable {
    entities: HashMap<String, String>,
}

impl EntityTable {
    /// Reads every `<!ENTITY name "value">` from the content of a DOCTYPE declaration.
    ///
    /// The first declaration of a name wins.
    pub(crate) fn from_doctype(doctype: &str) -> Result<Self, String> {
        const DECL: &str = "<!ENTITY";

        let mut table = Self::default();
        let mut rest = doctype;
        while let Some(start) = rest.find(DECL) {
            rest = rest[start + DECL.len()..].trim_start();
            if rest.starts_with('%') {
                continue;
            }

            let name_end = rest
                .find(char::is_whitespace)
                .ok_or_else(|| "unterminated entity declaration".to_string())?;
            let (name, after) = rest.split_at(name_end);
            let after = after.trim_start();
            rest = after;

            let quote = match after.chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => continue,
            };
            let body = &after[1..];
            let close = body
                .find(quote)
                .ok_or_else(|| format!("unterminated value for entity '{name}'"))?;

            table
                .entities
                .entry(name.to_string())
                .or_insert_with(|| body[..close].to_string());
            rest = &body[close + 1..];
        }
        Ok(table)
    }

    /// Resolves the reference `&name;`: a character reference, a predefined
    /// entity or a declared one.
    pub(crate) fn resolve(&self, name: &str) -> Result<String, String> {
        self.resolve_at(name, 0)
    }

    /// Expands every reference in `text`, e.g. an attribute value.
    pub(crate) fn expand(&self, text: &str) -> Result<String, String> {
        self.expand_at(text, 0)
    }

    fn resolve_at(&self, name: &str, depth: usize) -> Result<String, String> {
        if let Some(number) = name.strip_prefix('#') {
            return char_reference(number)
                .map(String::from)
                .ok_or_else(|| format!("invalid character reference &{name};"));
        }
        if let Some(value) = predefined_entity(name) {
            return Ok(value.to_string());
        }

        let value = self
            .entities
            .get(name)
            .ok_or_else(|| format!("undefined entity &{name};"))?;
        if depth >= MAX_EXPANSION_DEPTH {
            return Err(format!("recursive entity reference &{name};"));
        }
        self.expand_at(value, depth + 1)
    }

    fn expand_at(&self, text: &str, depth: usize) -> Result<String, String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let semi = after
                .find(';')
                .ok_or_else(|| "unterminated entity reference".to_string())?;
            out.push_str(&self.resolve_at(&after[..semi], depth)?);
            if out.len() > MAX_EXPANSION_LEN {
                return Err("entity expansion too large".into());
            }
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// `#38` / `#x26` without the leading `#`.
fn char_reference(number: &str) -> Option<char> {
    let code = match number.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|c| is_xml_char(*c))
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => None,
    }
}
