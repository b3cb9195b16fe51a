//! Support for ES module translation files (`export default { ... };`).
//!
//! The object literal after `export default` is extracted as text, up to its balancing
//! closing brace, and parsed as JSON. Anything after the literal (a semicolon, comments,
//! other exports) is ignored. Module content is never evaluated, so only JSON-compatible
//! literals are accepted, which is exactly what the writer produces:
//!
//! ```text
//! export default {
//!   "title": "Başlık"
//! };
//! ```
use std::{
    io::{BufRead, Read, Write},
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    error::Error, formats::table::read_decoded, traits::Parser, types::TranslationTree,
};

lazy_static! {
    static ref EXPORT_DEFAULT_REGEX: Regex = Regex::new(r"export\s+default\s+\{").unwrap();
}

// Returns the `{ ... }` literal starting at `source[0]`, skipping braces inside strings.
fn object_literal(source: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in source.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&source[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// A translation module whose default export is the nested translation object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub tree: TranslationTree,
}

impl Format {
    /// Extracts the default-exported object literal from module source.
    fn parse_source(source: &str) -> Result<Self, Error> {
        let start = EXPORT_DEFAULT_REGEX
            .find(source)
            .map(|found| found.end() - 1)
            .ok_or_else(|| {
                Error::DataMismatch("no `export default { ... }` object found".to_string())
            })?;
        let literal = object_literal(&source[start..]).ok_or_else(|| {
            Error::DataMismatch("`export default` object is never closed".to_string())
        })?;

        let value: Value = serde_json::from_str(literal).map_err(Error::Parse)?;
        Ok(Format {
            tree: TranslationTree::from_json(&value)?,
        })
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source).map_err(Error::Io)?;
        Self::parse_source(&source)
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let decoded = read_decoded(path)?;
        Self::parse_source(&decoded)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(b"export default ").map_err(Error::Io)?;
        serde_json::to_writer_pretty(&mut writer, &self.tree).map_err(Error::Parse)?;
        writer.write_all(b";\n").map_err(Error::Io)?;
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
