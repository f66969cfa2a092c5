use std::time::Duration;

pub fn elapsed_ms(duration: Duration) -> f64 {
    round_two_decimals(duration.as_secs_f64() * 1000.0)
}

pub fn kb_from_bytes(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a byte offset into `text` to a 1-based (line, column) pair.
///
/// Columns count characters, not bytes. Offsets past the end are clamped.
pub fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());
    let prefix = &bytes[..offset];

    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    let column = String::from_utf8_lossy(&prefix[line_start..]).chars().count() + 1;

    (line, column)
}
