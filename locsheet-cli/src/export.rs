use crate::progress::spinner;
use locsheet::{Error, converter, options::WriteOptions};
use std::path::{Path, PathBuf};

/// Picks the locale names for the two export inputs.
///
/// Explicit `--locales` win; otherwise each file stem must be a locale (`tr.js` → `tr`).
pub fn resolve_locales(
    first: &Path,
    second: &Path,
    locales: Option<Vec<String>>,
) -> Result<[String; 2], Error> {
    if let Some(locales) = locales {
        let locales: Vec<String> = locales.into_iter().map(|l| l.trim().to_string()).collect();
        return match <[String; 2]>::try_from(locales) {
            Ok(pair) => Ok(pair),
            Err(given) => Err(Error::validation_error(format!(
                "--locales needs exactly two names, got {}",
                given.len()
            ))),
        };
    }

    let infer = |path: &Path| {
        converter::infer_locale_from_path(path).ok_or_else(|| {
            Error::validation_error(format!(
                "cannot infer a locale from `{}`; pass --locales",
                path.display()
            ))
        })
    };
    Ok([infer(first)?, infer(second)?])
}

/// Run the export command: two nested files → one sheet.
pub fn run_export_command(
    first: PathBuf,
    second: PathBuf,
    locales: Option<Vec<String>>,
    output: PathBuf,
    bom: bool,
) -> Result<(), Error> {
    let [first_locale, second_locale] = resolve_locales(&first, &second, locales)?;

    let progress_bar = spinner();
    progress_bar.set_message(format!(
        "Exporting {} ({}) and {} ({})...",
        first.display(),
        first_locale,
        second.display(),
        second_locale
    ));

    let result = converter::export_files(
        &[(first_locale, &first), (second_locale, &second)],
        &output,
        &WriteOptions::new().with_bom(bom),
    );

    match result {
        Ok(sheet) => {
            progress_bar.finish_with_message(format!(
                "✅ Wrote {} rows to {}",
                sheet.len(),
                output.display()
            ));
            Ok(())
        }
        Err(e) => {
            progress_bar.finish_with_message("❌ Export failed");
            Err(e)
        }
    }
}
