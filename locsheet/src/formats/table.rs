//! Delimited-table reading and writing shared by the CSV and TSV formats.

use std::{
    fs::File,
    io::{BufRead, Read, Write},
    path::Path,
};

use crate::{
    error::Error,
    options::{ReadOptions, RowPolicy},
    types::{KEY_COLUMN, Row, Sheet},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads a header row plus data rows into a [`Sheet`].
///
/// The `key` column is located by name and may sit in any position; every other
/// non-empty header cell names a locale column. Keys are trimmed, values are kept
/// verbatim and short rows are padded with `""`.
pub(crate) fn read_table<R: BufRead>(
    reader: R,
    delimiter: u8,
    options: &ReadOptions,
) -> Result<Sheet, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);
    let mut records = rdr.records();

    let Some(header) = records.next() else {
        return Ok(Sheet::default());
    };
    let header = header.map_err(Error::CsvParse)?;

    let key_index = header
        .iter()
        .position(|cell| clean_header_cell(cell).eq_ignore_ascii_case(KEY_COLUMN))
        .ok_or_else(|| {
            Error::DataMismatch(format!("header has no `{}` column", KEY_COLUMN))
        })?;

    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(index, cell)| *index != key_index && !clean_header_cell(cell).is_empty())
        .map(|(index, cell)| (index, clean_header_cell(cell).to_string()))
        .collect();

    let mut sheet = Sheet::new(columns.iter().map(|(_, locale)| locale.clone()).collect());
    sheet
        .validate_locales()
        .map_err(|e| Error::DataMismatch(format!("invalid header: {}", e)))?;

    for record in records {
        let record = record.map_err(Error::CsvParse)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let key = match record.get(key_index).map(str::trim) {
            Some(key) if !key.is_empty() => key,
            cell => {
                let reason = if cell.is_none() {
                    "missing key cell"
                } else {
                    "key is empty"
                };
                match options.row_policy {
                    RowPolicy::Skip => {
                        tracing::warn!(line, reason, "skipping malformed row");
                        continue;
                    }
                    RowPolicy::FailFast => return Err(Error::malformed_row(line, reason)),
                }
            }
        };

        let values = columns
            .iter()
            .map(|(index, _)| record.get(*index).unwrap_or_default().to_string())
            .collect();
        sheet.rows.push(Row::new(key, values));
    }

    tracing::debug!(
        rows = sheet.rows.len(),
        locales = ?sheet.locales,
        "read sheet"
    );
    Ok(sheet)
}

/// Writes the header `key, <locales...>` followed by one record per row.
pub(crate) fn write_table<W: Write>(
    sheet: &Sheet,
    mut writer: W,
    delimiter: u8,
    bom: bool,
) -> Result<(), Error> {
    sheet.validate_locales()?;
    if bom {
        writer.write_all(UTF8_BOM).map_err(Error::Io)?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(sheet.header()).map_err(Error::CsvParse)?;

    let width = sheet.locales.len();
    for row in &sheet.rows {
        let record = std::iter::once(row.key.as_str()).chain((0..width).map(|i| row.value(i)));
        wtr.write_record(record).map_err(Error::CsvParse)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

/// Reads a whole file, decoding UTF-16 or UTF-8 according to its byte order mark.
pub(crate) fn read_decoded<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(match decoded.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => decoded,
    })
}

fn clean_header_cell(cell: &str) -> &str {
    cell.trim_start_matches('\u{feff}').trim()
}
