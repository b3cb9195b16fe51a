//! All supported translation file formats for locsheet.
//!
//! Nested tree files (`.json`, ES modules) and flat sheets (`.csv`, `.tsv`) each get
//! their own module; [`FormatType`] names them for generic handling across the crate.

pub mod csv;
pub mod js_module;
pub mod json;
pub(crate) mod table;
pub mod tsv;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

// Reexporting the formats for easier access
pub use csv::Format as CsvFormat;
pub use js_module::Format as JsModuleFormat;
pub use json::Format as JsonFormat;
pub use tsv::Format as TsvFormat;

use crate::Error;

/// Represents all supported file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Nested JSON object.
    Json,
    /// ES module with an `export default { ... };` object.
    JsModule,
    /// Comma-separated sheet.
    Csv,
    /// Tab-separated sheet.
    Tsv,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use locsheet::formats::FormatType;
/// assert_eq!(FormatType::Json.to_string(), "json");
/// assert_eq!(FormatType::JsModule.to_string(), "js");
/// assert_eq!(FormatType::Csv.to_string(), "csv");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Json => write!(f, "json"),
            FormatType::JsModule => write!(f, "js"),
            FormatType::Csv => write!(f, "csv"),
            FormatType::Tsv => write!(f, "tsv"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts the following case-insensitive strings:
/// - `"json"` → `FormatType::Json`
/// - `"js"`, `"mjs"`, `"ts"`, `"module"` → `FormatType::JsModule`
/// - `"csv"` → `FormatType::Csv`
/// - `"tsv"` → `FormatType::Tsv`
///
/// Returns [`crate::error::Error::UnknownFormat`] for unknown strings.
///
/// # Example
/// ```rust
/// use locsheet::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("JS").unwrap(), FormatType::JsModule);
/// assert!(FormatType::from_str("xlsx").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "json" => Ok(FormatType::Json),
            "js" | "mjs" | "ts" | "module" => Ok(FormatType::JsModule),
            "csv" => Ok(FormatType::Csv),
            "tsv" => Ok(FormatType::Tsv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Json => "json",
            FormatType::JsModule => "js",
            FormatType::Csv => "csv",
            FormatType::Tsv => "tsv",
        }
    }

    /// Whether this format holds a flat sheet rather than a nested tree.
    pub fn is_tabular(&self) -> bool {
        matches!(self, FormatType::Csv | FormatType::Tsv)
    }
}
