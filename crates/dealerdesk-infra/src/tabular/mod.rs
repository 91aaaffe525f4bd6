//! Tabular interchange between files and record sets
//!
//! Delimited text goes through the quote-aware scanner in [`csv_codec`];
//! `.xls`/`.xlsx` payloads are bridged through [`spreadsheet`]. Both produce
//! the same [`RecordSet`] shape.

pub mod csv_codec;
pub mod spreadsheet;

use std::path::Path;

use chrono::{DateTime, NaiveDate};
use dealerdesk_types::{CodecError, ExportFormat, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

pub use csv_codec::{decode_csv, decode_csv_bytes, encode_csv, safe_csv_value, with_bom};
pub use spreadsheet::{decode_spreadsheet, encode_xlsx};

/// Date layout used for every date-valued cell
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// `.csv`, UTF-8 comma-separated text
    Csv,
    /// `.xls` / `.xlsx`, first sheet only
    Spreadsheet,
}

impl TabularFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> std::result::Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(TabularFormat::Csv),
            Some("xls") | Some("xlsx") => Ok(TabularFormat::Spreadsheet),
            _ => Err(CodecError::UnsupportedFormat(format!(
                "{} (expected .csv, .xls or .xlsx)",
                path.display()
            ))),
        }
    }
}

/// A value handed to the encoder
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value; always encodes as an empty field
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Date cell from text. Unparseable input becomes [`Cell::Empty`].
    ///
    /// Accepts RFC 3339 timestamps, `YYYY-MM-DD` and `YYYY/MM/DD`.
    pub fn date_from_str(s: &str) -> Self {
        parse_date(s).map(Cell::Date).unwrap_or(Cell::Empty)
    }

    /// String form of the value, before any CSV escaping
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Integer(i) => i.to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Integer(i64::from(value))
    }
}

impl From<u16> for Cell {
    fn from(value: u16) -> Self {
        Cell::Integer(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Shortest round-trip form of a number (`2`, not `2.0`).
///
/// Magnitudes of `1e21` and above or below `1e-6` use exponent notation with
/// a signed exponent (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

/// Parse an RFC 3339 timestamp, `YYYY-MM-DD` or `YYYY/MM/DD` into a date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// One decoded row: an ordered header -> value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRecord {
    fields: Vec<(String, String)>,
}

impl TabularRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for TabularRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Records sharing one header list, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    headers: Vec<String>,
    records: Vec<TabularRecord>,
}

impl RecordSet {
    /// Zip each row against the header row by position.
    ///
    /// Short rows are padded with empty strings and extra fields are dropped.
    /// A repeated header name keeps its first position and takes the value of
    /// its rightmost column.
    pub fn from_rows<I>(header_row: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut headers: Vec<String> = Vec::with_capacity(header_row.len());
        let mut slots = Vec::with_capacity(header_row.len());
        for header in header_row {
            match headers.iter().position(|h| *h == header) {
                Some(slot) => slots.push(slot),
                None => {
                    slots.push(headers.len());
                    headers.push(header);
                }
            }
        }

        let records = rows
            .into_iter()
            .map(|mut fields| {
                let mut values = vec![String::new(); headers.len()];
                for (index, &slot) in slots.iter().enumerate() {
                    values[slot] = fields
                        .get_mut(index)
                        .map(std::mem::take)
                        .unwrap_or_default();
                }
                TabularRecord {
                    fields: headers.iter().cloned().zip(values).collect(),
                }
            })
            .collect();

        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[TabularRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cell values row by row, in header order
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| r.values().map(str::to_string).collect())
            .collect()
    }
}

/// Decode raw bytes of a known format
pub fn decode_bytes(
    format: TabularFormat,
    bytes: &[u8],
) -> std::result::Result<RecordSet, CodecError> {
    match format {
        TabularFormat::Csv => Ok(decode_csv_bytes(bytes)),
        TabularFormat::Spreadsheet => decode_spreadsheet(bytes),
    }
}

/// Decode a file, choosing the codec from its extension.
///
/// The extension is checked before the file is read.
pub fn decode_file(path: &Path) -> Result<RecordSet> {
    let format = TabularFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), ?format, bytes = bytes.len(), "decoding tabular file");

    let records = decode_bytes(format, &bytes)?;
    debug!(
        headers = records.headers().len(),
        records = records.len(),
        "decoded tabular file"
    );
    Ok(records)
}

/// Encode headers and rows into file contents for the given export format.
///
/// CSV output carries a UTF-8 byte-order mark.
pub fn encode_file<H: AsRef<str>>(
    format: ExportFormat,
    sheet_name: &str,
    headers: &[H],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => Ok(with_bom(&encode_csv(headers, rows))),
        ExportFormat::Xlsx => encode_xlsx(sheet_name, headers, rows),
    }
}

/// `<prefix>_export_<YYYY-MM-DD>.<ext>`
pub fn export_file_name(prefix: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_export_{}.{}",
        prefix,
        date.format(DATE_FORMAT),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TabularFormat::from_path(Path::new("stock.CSV")).unwrap(),
            TabularFormat::Csv
        );
        assert_eq!(
            TabularFormat::from_path(Path::new("stock.xls")).unwrap(),
            TabularFormat::Spreadsheet
        );
        assert!(matches!(
            TabularFormat::from_path(Path::new("stock.txt")),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(TabularFormat::from_path(Path::new("stock")).is_err());
    }

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let set = RecordSet::from_rows(
            strings(&["a", "b", "c"]),
            vec![strings(&["1", "2"]), strings(&["3", "4", "5", "6"])],
        );
        assert_eq!(set.to_rows(), vec![strings(&["1", "2", ""]), strings(&["3", "4", "5"])]);
        assert_eq!(set.records()[0].get("c"), Some(""));
    }

    #[test]
    fn test_from_rows_duplicate_header_last_value_wins() {
        let set = RecordSet::from_rows(
            strings(&["id", "name", "id"]),
            vec![strings(&["1", "x", "2"])],
        );
        assert_eq!(set.headers(), &strings(&["id", "name"])[..]);
        assert_eq!(set.records()[0].get("id"), Some("2"));
        assert_eq!(set.records()[0].get("name"), Some("x"));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::from(2.0).to_text(), "2");
        assert_eq!(Cell::from(1.5).to_text(), "1.5");
        assert_eq!(Cell::from(f64::INFINITY).to_text(), "Infinity");
        assert_eq!(Cell::from(None::<String>).to_text(), "");
        assert_eq!(Cell::from("0").to_text(), "0");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e25), "-1.5e+25");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_date_cells() {
        assert_eq!(Cell::date_from_str("2024-03-09").to_text(), "2024-03-09");
        assert_eq!(
            Cell::date_from_str("2024-03-09T15:04:05Z").to_text(),
            "2024-03-09"
        );
        assert_eq!(Cell::date_from_str("2024/03/09").to_text(), "2024-03-09");
        assert_eq!(Cell::date_from_str("next tuesday"), Cell::Empty);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            export_file_name("inventory", ExportFormat::Csv, date),
            "inventory_export_2024-01-05.csv"
        );
        assert_eq!(
            export_file_name("sales", ExportFormat::Xlsx, date),
            "sales_export_2024-01-05.xlsx"
        );
    }

    #[test]
    fn test_record_serializes_as_ordered_map() {
        let set = RecordSet::from_rows(strings(&["b", "a"]), vec![strings(&["1", "2"])]);
        let json = serde_json::to_string(&set.records()[0]).unwrap();
        assert_eq!(json, r#"{"b":"1","a":"2"}"#);
    }
}
