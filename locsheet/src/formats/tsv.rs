//! Support for the TSV (Tab-Separated Values) sheet format.
//!
//! Same layout as CSV: a `key, <locales...>` header followed by one record per key.
//! Spreadsheet tools paste tab-separated text directly into cells, which makes this
//! format convenient for copy/paste round trips.
use std::{io::BufRead, path::Path};

use crate::{
    error::Error,
    formats::table::{read_decoded, read_table, write_table},
    options::{ReadOptions, WriteOptions},
    traits::Parser,
    types::Sheet,
};

const DELIMITER: u8 = b'\t';

/// A TSV translation sheet.
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

    pub fn from_reader_with<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Self, Error> {
        Ok(Self::new(read_table(reader, DELIMITER, options)?))
    }

    pub fn read_from_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self, Error> {
        let decoded = read_decoded(path)?;
        Self::from_reader_with(decoded.as_bytes(), options)
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Self::from_reader_with(reader, &ReadOptions::default())
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::read_from_with(path, &ReadOptions::default())
    }

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
