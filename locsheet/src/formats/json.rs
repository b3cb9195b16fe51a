//! Support for nested JSON translation files.
//!
//! The document root must be an object. Output is pretty-printed with two-space
//! indentation and keeps the tree's key order.
use std::{
    io::{BufRead, Write},
    path::Path,
};

use serde_json::Value;

use crate::{
    error::Error, formats::table::read_decoded, traits::Parser, types::TranslationTree,
};

/// A nested JSON translation file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub tree: TranslationTree,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader).map_err(Error::Parse)?;
        Ok(Format {
            tree: TranslationTree::from_json(&value)?,
        })
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let decoded = read_decoded(path)?;
        Self::from_str(&decoded)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.tree).map_err(Error::Parse)?;
        writer.write_all(b"\n").map_err(Error::Io)?;
        writer.flush().map_err(Error::Io)
    }
}

impl From<TranslationTree> for Format {
    fn from(tree: TranslationTree) -> Self {
        Format { tree }
    }
}

impl From<Format> for TranslationTree {
    fn from(format: Format) -> Self {
        format.tree
    }
}
