use crate::progress::spinner;
use locsheet::{
    ConflictPolicy, Error, FormatType, ImportOptions, ImportPaths, ReadOptions, RowPolicy,
    UnflattenOptions, converter,
};
use std::path::PathBuf;

/// Flags of the import command.
#[derive(Debug, Clone)]
pub struct ImportArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub output: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub tree_format: FormatType,
    pub strict_rows: bool,
    pub strict_tree: bool,
    pub max_depth: usize,
}

impl ImportArgs {
    pub fn to_options(&self) -> ImportOptions {
        let row_policy = if self.strict_rows {
            RowPolicy::FailFast
        } else {
            RowPolicy::Skip
        };
        let on_conflict = if self.strict_tree {
            ConflictPolicy::Error
        } else {
            ConflictPolicy::LastWriteWins
        };

        ImportOptions::new()
            .with_read_options(ReadOptions::new().with_row_policy(row_policy))
            .with_unflatten_options(
                UnflattenOptions::new()
                    .with_max_depth(self.max_depth)
                    .with_conflict_policy(on_conflict),
            )
            .with_tree_format(self.tree_format)
    }
}

/// Run the import command: old sheet + edited sheet → merged sheet + nested files.
pub fn run_import_command(args: ImportArgs, json_output: bool) -> Result<(), Error> {
    let progress_bar = spinner();
    progress_bar.set_message(format!(
        "Reconciling {} with {}...",
        args.new.display(),
        args.old.display()
    ));

    let paths = ImportPaths {
        old: args.old.clone(),
        new: args.new.clone(),
        merged_output: args.output.clone(),
        out_dir: args.out_dir.clone(),
    };
    let outcome = match converter::import_files(&paths, &args.to_options()) {
        Ok(outcome) => outcome,
        Err(e) => {
            progress_bar.finish_with_message("❌ Import failed");
            return Err(e);
        }
    };

    progress_bar.finish_with_message(format!(
        "✅ Wrote {} file(s) to {}",
        outcome.trees.len(),
        args.out_dir.display()
    ));

    if json_output {
        let body = serde_json::json!({
            "report": outcome.report,
            "locales": outcome.sheet.locales,
            "files": outcome
                .trees
                .keys()
                .map(|locale| {
                    converter::tree_output_path(&args.out_dir, locale, args.tree_format)
                        .display()
                        .to_string()
                })
                .collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).map_err(Error::Parse)?
        );
        return Ok(());
    }

    let report = &outcome.report;
    println!("=== Import ===");
    println!("Locales: {}", outcome.sheet.locales.join(", "));
    println!("Rows: {}", report.total);
    println!("  Added: {}", report.added);
    println!("  Replaced: {}", report.replaced);
    println!("  Carried over: {}", report.carried_over);
    if let Some(output) = &args.output {
        println!("Merged sheet: {}", output.display());
    }
    for locale in outcome.trees.keys() {
        println!(
            "Wrote: {}",
            converter::tree_output_path(&args.out_dir, locale, args.tree_format).display()
        );
    }
    Ok(())
}
