//! Support for the CSV sheet format.
//!
//! The first record is the header `key, <locale1>, <locale2>, ...`; every following
//! record is one translation key with a value per locale column.
//! Provides parsing, serialization, and conversion to/from [`Sheet`].
use std::{io::BufRead, path::Path};

use crate::{
    error::Error,
    formats::table::{read_decoded, read_table, write_table},
    options::{ReadOptions, WriteOptions},
    traits::Parser,
    types::Sheet,
};

const DELIMITER: u8 = b',';

/// A CSV translation sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub sheet: Sheet,
    pub write_options: WriteOptions,
}

impl Format {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            write_options: WriteOptions::default(),
        }
    }

    pub fn with_write_options(mut self, write_options: WriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    /// Parse from any reader with explicit read options.
    pub fn from_reader_with<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Self, Error> {
        Ok(Self::new(read_table(reader, DELIMITER, options)?))
    }

    /// Parse from a file path with explicit read options; BOM-aware.
    pub fn read_from_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self, Error> {
        let decoded = read_decoded(path)?;
        Self::from_reader_with(decoded.as_bytes(), options)
    }
}

impl Parser for Format {
    /// Parse from any reader, skipping malformed rows.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Self::from_reader_with(reader, &ReadOptions::default())
    }

    /// Decodes the file first so UTF-16 spreadsheet exports with a BOM are readable.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::read_from_with(path, &ReadOptions::default())
    }

    /// Writes the header and rows, with a BOM when requested.
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        write_table(&self.sheet, writer, DELIMITER, self.write_options.bom)
    }
}

impl From<Sheet> for Format {
    fn from(sheet: Sheet) -> Self {
        Format::new(sheet)
    }
}

impl From<Format> for Sheet {
    fn from(format: Format) -> Self {
        format.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RowPolicy;
    use crate::types::Row;
    use indoc::indoc;
    use std::io::Cursor;

    #[test]
    fn test_parse_two_locale_csv() {
        let content = indoc! {"
            key,tr,en
            hello,Merhaba,Hello
            labels.save,Kaydet,Save
        "};
        let format = Format::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(format.sheet.locales, vec!["tr", "en"]);
        assert_eq!(format.sheet.rows.len(), 2);
        assert_eq!(
            format.sheet.rows[1],
            Row::new("labels.save", vec!["Kaydet".into(), "Save".into()])
        );
    }

    #[test]
    fn test_key_column_can_move_and_keys_are_trimmed() {
        let content = "en,KEY,tr\nHello,  hello  ,Merhaba\n";
        let format = Format::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(format.sheet.locales, vec!["en", "tr"]);
        assert_eq!(
            format.sheet.rows[0],
            Row::new("hello", vec!["Hello".into(), "Merhaba".into()])
        );
    }

    #[test]
    fn test_header_with_path_like_locale_is_rejected() {
        for header in ["key,tr,../escaped", "key,sub/en,tr"] {
            let content = format!("{header}\nhello,a,b\n");
            let err = Format::from_reader(Cursor::new(content)).unwrap_err();
            assert!(matches!(err, Error::DataMismatch(ref msg) if msg.contains("invalid header")));
        }
    }

    #[test]
    fn test_short_rows_are_padded() {
        let content = "key,tr,en\nonly_tr,Sadece\n";
        let format = Format::from_reader(Cursor::new(content)).unwrap();
        let map = format.sheet.to_row_map();
        assert_eq!(map["only_tr"], vec!["Sadece", ""]);
    }

    #[test]
    fn test_values_are_kept_verbatim() {
        let content = "key,tr,en\ngreeting,\"  Merhaba, dünya \",\"Hello\nWorld\"\n";
        let format = Format::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(format.sheet.rows[0].values[0], "  Merhaba, dünya ");
        assert_eq!(format.sheet.rows[0].values[1], "Hello\nWorld");
    }

    #[test]
    fn test_empty_key_rows_are_skipped_by_default() {
        let content = "key,tr,en\n,orphan,orphan\n   ,blank,blank\nhello,Merhaba,Hello\n";
        let format = Format::from_reader(Cursor::new(content)).unwrap();
        assert_eq!(format.sheet.rows.len(), 1);
        assert_eq!(format.sheet.rows[0].key, "hello");
    }

    #[test]
    fn test_empty_key_rows_fail_fast() {
        let content = "key,tr,en\nhello,Merhaba,Hello\n ,orphan,orphan\n";
        let options = ReadOptions::new().with_row_policy(RowPolicy::FailFast);
        let err = Format::from_reader_with(Cursor::new(content), &options).unwrap_err();
        match err {
            Error::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "key is empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_key_cell_fails_fast() {
        let content = "tr,en,key\nMerhaba,Hello\n";
        let options = ReadOptions::new().with_row_policy(RowPolicy::FailFast);
        let err = Format::from_reader_with(Cursor::new(content), &options).unwrap_err();
        assert!(
            matches!(err, Error::MalformedRow { ref reason, .. } if reason == "missing key cell")
        );
    }

    #[test]
    fn test_header_without_key_column() {
        let content = "id,tr,en\nhello,Merhaba,Hello\n";
        let err = Format::from_reader(Cursor::new(content)).unwrap_err();
        assert!(matches!(err, Error::DataMismatch(_)));
    }

    #[test]
    fn test_duplicate_locale_columns_rejected() {
        let content = "key,en,en\nhello,Hello,Hi\n";
        let err = Format::from_reader(Cursor::new(content)).unwrap_err();
        assert!(err.to_string().contains("duplicate locale column"));
    }

    #[test]
    fn test_empty_input_is_empty_sheet() {
        let format = Format::from_reader(Cursor::new("")).unwrap();
        assert!(format.sheet.locales.is_empty());
        assert!(format.sheet.is_empty());
    }

    #[test]
    fn test_write_header_and_rows() {
        let sheet = Sheet::with_rows(
            vec!["tr".into(), "en".into()],
            vec![
                Row::new("hello", vec!["Merhaba".into(), "Hello".into()]),
                Row::new("bye", vec!["".into(), "Bye, now".into()]),
            ],
        );
        let written = Format::new(sheet).write_to_string().unwrap();
        assert_eq!(written, "key,tr,en\nhello,Merhaba,Hello\nbye,,\"Bye, now\"\n");
    }

    #[test]
    fn test_write_with_bom_and_read_back() {
        let sheet = Sheet::with_rows(
            vec!["tr".into(), "en".into()],
            vec![Row::new("şehir", vec!["İstanbul".into(), "Istanbul".into()])],
        );
        let format =
            Format::new(sheet.clone()).with_write_options(WriteOptions::new().with_bom(true));
        let mut buffer = Vec::new();
        format.to_writer(&mut buffer).unwrap();
        assert!(buffer.starts_with(b"\xEF\xBB\xBF"));

        let parsed = Format::from_bytes(&buffer).unwrap();
        assert_eq!(parsed.sheet, sheet);
    }

    #[test]
    fn test_read_from_utf16_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sheet.csv");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "key,tr\nhello,Merhaba\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let format = Format::read_from(&path).unwrap();
        assert_eq!(format.sheet.locales, vec!["tr"]);
        assert_eq!(format.sheet.rows[0], Row::new("hello", vec!["Merhaba".into()]));
    }
}
