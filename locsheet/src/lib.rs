#![forbid(unsafe_code)]
//! Translation tree ↔ spreadsheet toolkit for Rust.
//!
//! Translators work in spreadsheets while applications ship nested, per-locale
//! translation files. `locsheet` converts between the two and reconciles an edited
//! sheet with the previous one without losing keys.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locsheet::converter::{export_files, import_files, ImportPaths};
//! use locsheet::options::{ImportOptions, WriteOptions};
//!
//! // Two nested files → one `key, tr, en` sheet
//! export_files(
//!     &[("tr".to_string(), "locales/tr.js"), ("en".to_string(), "locales/en.js")],
//!     "translations.csv",
//!     &WriteOptions::default(),
//! )?;
//!
//! // Edited sheet + previous sheet → merged sheet + one nested file per locale
//! import_files(
//!     &ImportPaths {
//!         old: "translations.csv".into(),
//!         new: "edited.csv".into(),
//!         merged_output: Some("translations.csv".into()),
//!         out_dir: "locales".into(),
//!     },
//!     &ImportOptions::default(),
//! )?;
//! # Ok::<(), locsheet::Error>(())
//! ```
//!
//! # Building blocks
//!
//! - [`flatten`] / [`unflatten`]: nested tree ↔ dotted-key map (groups capped at depth 2)
//! - [`build_rows`]: union of two flat maps in first-seen key order
//! - [`reconcile`]: old rows + new rows, where a key present in the new set replaces
//!   the old row wholesale and a key missing from it is carried over
//!
//! # Supported Formats
//!
//! - **JSON**: nested object files
//! - **ES modules**: `export default { ... };` files (parsed, never evaluated)
//! - **CSV / TSV**: `key, <locale>, <locale>...` sheets

pub mod converter;
pub mod error;
pub mod flatten;
pub mod formats;
pub mod merge;
pub mod options;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    converter::{
        ImportOutcome, ImportPaths, export_files, import_files, import_sheets,
        infer_format_from_extension, infer_locale_from_path, read_sheet, read_tree,
        sheet_to_trees, trees_to_sheet, write_sheet, write_tree,
    },
    error::Error,
    flatten::{flatten, unflatten, unflatten_with},
    formats::FormatType,
    merge::{ReconcileReport, build_rows, reconcile, reconcile_sheets},
    options::{
        ConflictPolicy, ImportOptions, ReadOptions, RowPolicy, UnflattenOptions, WriteOptions,
    },
    traits::Parser,
    types::{FlatMap, LocalePair, Row, RowMap, Sheet, TranslationNode, TranslationTree},
};
