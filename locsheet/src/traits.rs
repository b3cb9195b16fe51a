//! The [`Parser`] trait shared by every locsheet file format.
//!
//! Nested formats (`.json`, `.js`) hold one locale's [`TranslationTree`](crate::TranslationTree);
//! tabular formats (`.csv`, `.tsv`) hold a whole [`Sheet`](crate::Sheet). Both are read and
//! written through the same handful of methods, so the pipelines in
//! [`converter`](crate::converter) never care which one they hold.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// Reading and writing one translation file, either a nested tree or a sheet.
///
/// Only [`Parser::from_reader`] and [`Parser::to_writer`] are required. Formats that
/// need to sniff the byte order mark of a file on disk override [`Parser::read_from`].
///
/// # Example
///
/// ```rust,no_run
/// use locsheet::traits::Parser;
/// let tr = locsheet::formats::json::Format::read_from("locales/tr.json")?;
/// println!("{}", tr.write_to_string()?);
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Builds the format from already decoded UTF-8 text.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Opens `path` and hands it to [`Parser::from_reader`].
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serializes the tree or sheet, byte order mark included when one was requested.
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Creates (or truncates) `path` and serializes into it.
    ///
    /// The pipelines stage their outputs instead; this is for one-off writes.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path).map_err(Error::Io)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Parses module, JSON or sheet source held in memory.
    fn from_str(source: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(source))
    }

    /// Like [`Parser::from_str`], for UTF-8 bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Serializes into a `String`, mostly useful for previews and tests.
    fn write_to_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::DataMismatch(format!("serialized output is not UTF-8: {}", e)))
    }
}
