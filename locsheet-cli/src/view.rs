use crate::progress::spinner;
use locsheet::{Error, FormatType, ReadOptions, Sheet, converter};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

/// Values longer than this many terminal columns are cut unless `--full` is given.
pub const MAX_VALUE_WIDTH: usize = 50;

/// Column header used for a nested file whose name is not a locale.
const FALLBACK_LOCALE: &str = "value";

/// Cuts `value` to at most `max_width` terminal columns, appending `...` when cut.
///
/// Line breaks are shown escaped so each value stays on one line.
pub fn truncate_to_width(value: &str, max_width: usize) -> String {
    let escaped = value.replace('\r', "\\r").replace('\n', "\\n");

    let mut width = 0;
    let mut out = String::new();
    for ch in escaped.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            out.push_str("...");
            return out;
        }
        width += ch_width;
        out.push(ch);
    }
    out
}

fn load_sheet(input: &Path) -> Result<Sheet, Error> {
    let format = converter::infer_format_from_extension(input).ok_or_else(|| {
        Error::UnknownFormat(format!(
            "cannot infer format from file extension: {}",
            input.display()
        ))
    })?;

    if format.is_tabular() {
        return converter::read_sheet(input, &ReadOptions::default());
    }

    let tree = converter::read_tree_with_format(input, format)?;
    let locale = converter::infer_locale_from_path(input)
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string());
    converter::trees_to_sheet(&[(locale.as_str(), &tree)])
}

/// Run the view command: print the flattened rows of a nested file or a sheet.
pub fn run_view_command(input: PathBuf, locale: Option<String>, full: bool) -> Result<(), Error> {
    let progress_bar = spinner();
    progress_bar.set_message("Reading translations...");

    let sheet = match load_sheet(&input) {
        Ok(sheet) => sheet,
        Err(e) => {
            progress_bar.finish_with_message("❌ Error reading input file");
            return Err(e);
        }
    };

    let columns: Vec<(usize, &str)> = match &locale {
        Some(locale) => {
            let Some(index) = sheet.locale_index(locale) else {
                progress_bar.finish_with_message("❌ Locale not found");
                return Err(Error::UnknownLocale(locale.clone()));
            };
            vec![(index, locale.as_str())]
        }
        None => sheet
            .locales
            .iter()
            .enumerate()
            .map(|(index, locale)| (index, locale.as_str()))
            .collect(),
    };

    progress_bar.finish_with_message(format!("✅ Found {} row(s)", sheet.len()));

    let kind = match converter::infer_format_from_extension(&input) {
        Some(FormatType::Csv) | Some(FormatType::Tsv) => "sheet",
        _ => "nested file",
    };
    println!("=== {} ({}) ===", input.display(), kind);
    println!(
        "Locales: {}",
        columns.iter().map(|(_, l)| *l).collect::<Vec<_>>().join(", ")
    );
    println!("Rows: {}", sheet.len());

    for (i, row) in sheet.rows.iter().enumerate() {
        println!("\n  {}. {}", i + 1, row.key);
        for (index, locale) in &columns {
            let value = row.value(*index);
            if full {
                println!("    {}: {}", locale, value);
            } else {
                println!("    {}: {}", locale, truncate_to_width(value, MAX_VALUE_WIDTH));
            }
        }
    }
    Ok(())
}
