//! File-level pipelines for locsheet.
//!
//! This module chains the flattener, the merger and the file formats into the two
//! workflows translators use:
//!
//! - **export**: nested per-locale files → one sheet (`key, <locale>, <locale>`).
//! - **import**: old sheet + edited sheet → reconciled sheet → one nested file per locale.
//!
//! Every pipeline computes and serializes its complete result in memory, stages each
//! output in a temporary file next to its destination, and only renames the staged
//! files into place once all of them were written. A failing transform or write
//! leaves no partial output behind.

use std::{
    ffi::OsStr,
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    flatten::{flatten, unflatten_with},
    formats::{CsvFormat, FormatType, JsModuleFormat, JsonFormat, TsvFormat},
    merge::{ReconcileReport, reconcile_sheets},
    options::{ImportOptions, ReadOptions, UnflattenOptions, WriteOptions},
    traits::Parser,
    types::{FlatMap, Sheet, TranslationTree},
};

/// Infers a [`FormatType`] from a file extension.
///
/// # Example
/// ```rust
/// use locsheet::formats::FormatType;
/// use locsheet::converter::infer_format_from_extension;
///
/// assert_eq!(infer_format_from_extension("locales/tr.js"), Some(FormatType::JsModule));
/// assert_eq!(infer_format_from_extension("en.json"), Some(FormatType::Json));
/// assert_eq!(infer_format_from_extension("translations.csv"), Some(FormatType::Csv));
/// assert_eq!(infer_format_from_extension("translations.TSV"), Some(FormatType::Tsv));
/// assert_eq!(infer_format_from_extension("translations.xlsx"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?;

    match extension.to_lowercase().as_str() {
        "json" => Some(FormatType::Json),
        "js" | "mjs" | "ts" => Some(FormatType::JsModule),
        "csv" => Some(FormatType::Csv),
        "tsv" => Some(FormatType::Tsv),
        _ => None,
    }
}

/// Infers the locale of a nested translation file from its file stem.
///
/// The stem must be a BCP-47 language identifier whose language subtag has two or
/// three letters; underscores are normalized to hyphens.
///
/// # Example
/// ```rust
/// use locsheet::converter::infer_locale_from_path;
///
/// assert_eq!(infer_locale_from_path("src/locales/tr.js"), Some("tr".to_string()));
/// assert_eq!(infer_locale_from_path("pt_BR.json"), Some("pt-BR".to_string()));
/// assert_eq!(infer_locale_from_path("messages.json"), None);
/// ```
pub fn infer_locale_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let canonical = stem.replace('_', "-");
    let identifier = LanguageIdentifier::from_str(&canonical).ok()?;
    let language = identifier.language.as_str();
    if !(2..=3).contains(&language.len()) || language == "und" {
        return None;
    }
    Some(canonical)
}

fn require_format<P: AsRef<Path>>(path: P) -> Result<FormatType, Error> {
    let path = path.as_ref();
    infer_format_from_extension(path).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "cannot infer format from file extension: {}",
            path.display()
        ))
    })
}

/// Reads a nested translation file, inferring its format from the extension.
pub fn read_tree<P: AsRef<Path>>(path: P) -> Result<TranslationTree, Error> {
    let format = require_format(&path)?;
    read_tree_with_format(path, format)
}

/// Reads a nested translation file in an explicit format.
pub fn read_tree_with_format<P: AsRef<Path>>(
    path: P,
    format: FormatType,
) -> Result<TranslationTree, Error> {
    match format {
        FormatType::Json => Ok(JsonFormat::read_from(path)?.into()),
        FormatType::JsModule => Ok(JsModuleFormat::read_from(path)?.into()),
        FormatType::Csv | FormatType::Tsv => Err(Error::validation_error(format!(
            "`{}` is a sheet, expected a nested translation file",
            path.as_ref().display()
        ))),
    }
}

/// Writes a nested translation file in the given format.
pub fn write_tree<P: AsRef<Path>>(
    tree: &TranslationTree,
    path: P,
    format: FormatType,
) -> Result<(), Error> {
    let bytes = tree_bytes(tree, format)?;
    commit_writes(vec![PendingWrite::new(path, bytes)])
}

fn tree_bytes(tree: &TranslationTree, format: FormatType) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    match format {
        FormatType::Json => JsonFormat::from(tree.clone()).to_writer(&mut buffer)?,
        FormatType::JsModule => JsModuleFormat::from(tree.clone()).to_writer(&mut buffer)?,
        FormatType::Csv | FormatType::Tsv => {
            return Err(Error::validation_error(format!(
                "cannot write a nested translation tree as {}",
                format
            )));
        }
    }
    Ok(buffer)
}

/// Reads a sheet, inferring CSV or TSV from the extension.
pub fn read_sheet<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Sheet, Error> {
    match require_format(&path)? {
        FormatType::Csv => Ok(CsvFormat::read_from_with(path, options)?.into()),
        FormatType::Tsv => Ok(TsvFormat::read_from_with(path, options)?.into()),
        FormatType::Json | FormatType::JsModule => Err(Error::validation_error(format!(
            "`{}` is a nested translation file, expected a sheet",
            path.as_ref().display()
        ))),
    }
}

/// Writes a sheet, choosing CSV or TSV from the extension.
pub fn write_sheet<P: AsRef<Path>>(
    sheet: &Sheet,
    path: P,
    options: &WriteOptions,
) -> Result<(), Error> {
    let bytes = sheet_bytes(sheet, &path, options)?;
    commit_writes(vec![PendingWrite::new(path, bytes)])
}

fn sheet_bytes<P: AsRef<Path>>(
    sheet: &Sheet,
    path: P,
    options: &WriteOptions,
) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    match require_format(&path)? {
        FormatType::Csv => CsvFormat::new(sheet.clone())
            .with_write_options(options.clone())
            .to_writer(&mut buffer)?,
        FormatType::Tsv => TsvFormat::new(sheet.clone())
            .with_write_options(options.clone())
            .to_writer(&mut buffer)?,
        FormatType::Json | FormatType::JsModule => {
            return Err(Error::validation_error(format!(
                "cannot write a sheet to `{}`",
                path.as_ref().display()
            )));
        }
    }
    Ok(buffer)
}

/// A serialized output waiting to be moved into place.
struct PendingWrite {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl PendingWrite {
    fn new<P: AsRef<Path>>(path: P, bytes: Vec<u8>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            bytes,
        }
    }
}

// Stages every output in a temporary file beside its destination, then renames them
// all. Staged files are removed on drop when any staging step fails.
fn commit_writes(writes: Vec<PendingWrite>) -> Result<(), Error> {
    for write in &writes {
        if write.path.is_dir() {
            return Err(Error::validation_error(format!(
                "cannot write to `{}`: it is a directory",
                write.path.display()
            )));
        }
    }

    let mut staged = Vec::with_capacity(writes.len());
    for write in writes {
        let dir = match write.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut file = NamedTempFile::new_in(&dir).map_err(Error::Io)?;
        file.write_all(&write.bytes).map_err(Error::Io)?;
        file.flush().map_err(Error::Io)?;
        staged.push((file, write.path));
    }

    for (file, path) in staged {
        file.persist(&path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!(path = %path.display(), "wrote file");
    }
    Ok(())
}

/// Flattens one tree per locale and lays them out as a sheet.
///
/// Rows follow the first locale's key order, then keys only later locales have.
///
/// ```rust
/// use locsheet::converter::trees_to_sheet;
/// use locsheet::types::TranslationTree;
/// use serde_json::json;
///
/// let tr = TranslationTree::from_json(&json!({ "labels": { "save": "Kaydet" } }))?;
/// let en = TranslationTree::from_json(&json!({ "labels": { "save": "Save" }, "new": "New" }))?;
/// let sheet = trees_to_sheet(&[("tr", &tr), ("en", &en)])?;
/// assert_eq!(sheet.header(), vec!["key", "tr", "en"]);
/// assert_eq!(sheet.rows[0].values, vec!["Kaydet", "Save"]);
/// assert_eq!(sheet.rows[1].values, vec!["", "New"]);
/// # Ok::<(), locsheet::Error>(())
/// ```
pub fn trees_to_sheet(trees: &[(&str, &TranslationTree)]) -> Result<Sheet, Error> {
    if trees.is_empty() {
        return Err(Error::validation_error("at least one locale is required"));
    }

    let flat: Vec<(&str, FlatMap)> = trees
        .iter()
        .map(|(locale, tree)| (*locale, flatten(tree)))
        .collect();
    let named: Vec<(&str, &FlatMap)> = flat.iter().map(|(locale, map)| (*locale, map)).collect();

    let sheet = Sheet::from_locales(&named);
    sheet.validate_locales()?;
    tracing::debug!(rows = sheet.rows.len(), locales = ?sheet.locales, "built sheet");
    Ok(sheet)
}

/// Rebuilds one nested tree per locale column of `sheet`, in column order.
///
/// Every row yields a leaf in every locale; a blank cell becomes an empty string.
pub fn sheet_to_trees(
    sheet: &Sheet,
    options: &UnflattenOptions,
) -> Result<IndexMap<String, TranslationTree>, Error> {
    let mut trees = IndexMap::with_capacity(sheet.locales.len());
    for locale in &sheet.locales {
        let flat = sheet.locale_map(locale)?;
        trees.insert(locale.clone(), unflatten_with(&flat, options)?);
    }
    Ok(trees)
}

/// Result of reconciling an old and a new sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// The reconciled sheet.
    pub sheet: Sheet,
    /// One rebuilt tree per locale of the reconciled sheet.
    pub trees: IndexMap<String, TranslationTree>,
    pub report: ReconcileReport,
}

/// Reconciles `old` with `new` and rebuilds the nested trees from the result.
pub fn import_sheets(
    old: &Sheet,
    new: &Sheet,
    options: &UnflattenOptions,
) -> Result<ImportOutcome, Error> {
    let (sheet, report) = reconcile_sheets(old, new);
    let trees = sheet_to_trees(&sheet, options)?;
    Ok(ImportOutcome {
        sheet,
        trees,
        report,
    })
}

/// Reads nested files (one per locale) and writes them as a single sheet.
///
/// Returns the written sheet.
pub fn export_files<P: AsRef<Path>, Q: AsRef<Path>>(
    inputs: &[(String, P)],
    output: Q,
    options: &WriteOptions,
) -> Result<Sheet, Error> {
    let trees = inputs
        .iter()
        .map(|(locale, path)| Ok((locale.as_str(), read_tree(path)?)))
        .collect::<Result<Vec<_>, Error>>()?;
    let borrowed: Vec<(&str, &TranslationTree)> =
        trees.iter().map(|(locale, tree)| (*locale, tree)).collect();

    let sheet = trees_to_sheet(&borrowed)?;
    write_sheet(&sheet, output, options)?;
    Ok(sheet)
}

/// Where the import pipeline reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPaths {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Optional destination for the reconciled sheet.
    pub merged_output: Option<PathBuf>,
    /// Directory receiving one `<locale>.<ext>` file per locale.
    pub out_dir: PathBuf,
}

/// Path of the rebuilt file for `locale` inside `out_dir`.
pub fn tree_output_path<P: AsRef<Path>>(out_dir: P, locale: &str, format: FormatType) -> PathBuf {
    out_dir
        .as_ref()
        .join(format!("{}.{}", locale, format.extension()))
}

// Same as `tree_output_path`, refusing any locale that would leave `out_dir`.
fn checked_output_path(
    out_dir: &Path,
    locale: &str,
    format: FormatType,
) -> Result<PathBuf, Error> {
    let file_name = format!("{}.{}", locale, format.extension());
    let path = out_dir.join(&file_name);
    if path.parent() != Some(out_dir) || path.file_name() != Some(OsStr::new(&file_name)) {
        return Err(Error::validation_error(format!(
            "locale `{}` does not name a file inside `{}`",
            locale,
            out_dir.display()
        )));
    }
    Ok(path)
}

/// Reads both sheets, reconciles them, then writes the merged sheet and the trees.
///
/// Nothing is written unless every output could be computed and staged.
pub fn import_files(paths: &ImportPaths, options: &ImportOptions) -> Result<ImportOutcome, Error> {
    if options.tree_format.is_tabular() {
        return Err(Error::validation_error(format!(
            "tree format must be json or js, got {}",
            options.tree_format
        )));
    }

    let old = read_sheet(&paths.old, &options.read)?;
    let new = read_sheet(&paths.new, &options.read)?;
    let outcome = import_sheets(&old, &new, &options.unflatten)?;
    outcome.sheet.validate_locales()?;

    let mut writes = Vec::with_capacity(outcome.trees.len() + 1);
    if let Some(merged_output) = &paths.merged_output {
        let bytes = sheet_bytes(&outcome.sheet, merged_output, &options.write)?;
        writes.push(PendingWrite::new(merged_output, bytes));
    }
    for (locale, tree) in &outcome.trees {
        let path = checked_output_path(&paths.out_dir, locale, options.tree_format)?;
        writes.push(PendingWrite::new(path, tree_bytes(tree, options.tree_format)?));
    }

    let created_out_dir = !paths.out_dir.exists();
    fs::create_dir_all(&paths.out_dir).map_err(Error::Io)?;
    if let Err(e) = commit_writes(writes) {
        if created_out_dir {
            if let Err(cleanup) = fs::remove_dir(&paths.out_dir) {
                tracing::warn!(
                    path = %paths.out_dir.display(),
                    error = %cleanup,
                    "could not remove output directory after failed import"
                );
            }
        }
        return Err(e);
    }

    tracing::debug!(
        files = outcome.trees.len(),
        out_dir = %paths.out_dir.display(),
        "import finished"
    );
    Ok(outcome)
}
