//! Comma-separated text codec
//!
//! Encoding escapes every field so that spreadsheet applications never
//! evaluate it as a formula. Decoding is a single pass over the characters
//! that tracks whether the scanner is inside a quoted field.

use std::borrow::Cow;

use encoding_rs::UTF_8;
use tracing::warn;

use super::{Cell, RecordSet};

/// Byte-order mark, as a character
pub const BOM: char = '\u{feff}';

/// UTF-8 encoding of the byte-order mark
pub const BOM_BYTES: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Characters that make spreadsheet applications treat a cell as a formula
const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Escape one value for a CSV field.
///
/// - a leading `=`, `+`, `-` or `@` gets a space in front and the field is quoted
/// - a value containing `"`, `,`, `\n` or `\r` is quoted
/// - anything else is emitted unchanged (`"0"` stays `0`)
///
/// Quoted fields double their internal quotes.
pub fn safe_csv_value(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_TRIGGERS) {
        return Cow::Owned(quote(&format!(" {}", value)));
    }
    if value.contains(['"', ',', '\n', '\r']) {
        return Cow::Owned(quote(value));
    }
    Cow::Borrowed(value)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn encode_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        other => safe_csv_value(&other.to_text()).into_owned(),
    }
}

/// Encode a header row and data rows as CSV text.
///
/// Rows are expected to have one cell per header. Lines are joined with `\n`
/// and there is no trailing newline.
pub fn encode_csv<H: AsRef<str>>(headers: &[H], rows: &[Vec<Cell>]) -> String {
    let header_line = headers
        .iter()
        .map(|h| safe_csv_value(h.as_ref()))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_line);
    for row in rows {
        lines.push(row.iter().map(encode_cell).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

/// File contents for CSV text: the UTF-8 byte-order mark followed by the text
pub fn with_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(BOM_BYTES.len() + text.len());
    bytes.extend_from_slice(&BOM_BYTES);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Decode CSV text into a record set.
///
/// The first line is the header row. A leading byte-order mark is ignored.
/// Ragged rows are padded or truncated to the header length.
pub fn decode_csv(text: &str) -> RecordSet {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut lines = scan_lines(text).into_iter();
    let Some(header_line) = lines.next() else {
        return RecordSet::default();
    };

    let headers = split_fields(&header_line);
    RecordSet::from_rows(headers, lines.map(|line| split_fields(&line)))
}

/// Decode raw CSV bytes as UTF-8, dropping a byte-order mark.
///
/// Malformed sequences are replaced rather than rejected.
pub fn decode_csv_bytes(bytes: &[u8]) -> RecordSet {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        warn!("CSV input contained invalid UTF-8; affected characters were replaced");
    }
    decode_csv(&text)
}

/// Split text into logical lines. Line breaks inside quoted fields are content.
///
/// Quotes are kept in the returned lines so that [`split_fields`] can apply
/// the same rules again. Empty lines in the middle are kept; the run of empty
/// lines at the end of the input is dropped.
fn scan_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push_str("\"\"");
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    lines.push(current);

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Split one logical line on unquoted commas, unescaping quotes
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
