//! Spreadsheet bridge (`.xls` / `.xlsx`)
//!
//! Reading goes through calamine and bypasses the CSV scanner entirely;
//! writing uses rust_xlsxwriter. Only the first worksheet is read.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use dealerdesk_types::{CodecError, Error, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{format_number, Cell, RecordSet, DATE_FORMAT};

/// Header used for blank header cells
const EMPTY_HEADER: &str = "__EMPTY";

fn excel_error(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Decode the first worksheet of a spreadsheet into a record set.
///
/// The first non-blank row holds the headers. Blank rows are skipped and
/// missing cells become empty strings.
pub fn decode_spreadsheet(bytes: &[u8]) -> std::result::Result<RecordSet, CodecError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| CodecError::ParseError(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| CodecError::ParseError(e.to_string()))?,
        None => return Ok(RecordSet::default()),
    };

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()));

    let Some(header_row) = rows.next() else {
        return Ok(RecordSet::default());
    };

    Ok(RecordSet::from_rows(unique_headers(header_row), rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format(DATE_FORMAT).to_string(),
            None => format_number(dt.as_f64()),
        },
        other => other.to_string(),
    }
}

/// Make header names unique: blanks become `__EMPTY`, repeats get `_1`, `_2`, ...
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for header in raw {
        let base = if header.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            header
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Encode headers and rows as an `.xlsx` workbook with one sheet.
///
/// Text is always written as a string cell, so values starting with `=` are
/// never turned into formulas.
pub fn encode_xlsx<H: AsRef<str>>(
    sheet_name: &str,
    headers: &[H],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).map_err(excel_error)?;

    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header.as_ref(), &header_format)
            .map_err(excel_error)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let r = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Integer(i) => sheet.write_number(r, c, *i as f64),
                Cell::Number(n) if n.is_finite() => sheet.write_number(r, c, *n),
                other => sheet.write_string(r, c, other.to_text()),
            };
            written.map_err(excel_error)?;
        }
    }

    workbook.save_to_buffer().map_err(excel_error)
}
