use clap::{Parser, Subcommand};
use locsheet::FormatType;
use locsheet_cli::{export::run_export_command, import::run_import_command, view::run_view_command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Show debug logs on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten two nested translation files into one sheet.
    Export {
        /// First nested translation file (.json, .js, .mjs, .ts)
        first: PathBuf,
        /// Second nested translation file
        second: PathBuf,

        /// Locale names for the two inputs, comma separated (default: file stems)
        #[arg(long, value_delimiter = ',')]
        locales: Option<Vec<String>>,

        /// The sheet to write (.csv or .tsv)
        #[arg(short, long)]
        output: PathBuf,

        /// Prefix the sheet with a UTF-8 byte order mark
        #[arg(long)]
        bom: bool,
    },

    /// Reconcile an edited sheet with the previous one and rebuild nested files.
    Import {
        /// The previous sheet
        #[arg(long)]
        old: PathBuf,
        /// The edited sheet
        #[arg(long)]
        new: PathBuf,

        /// Where to write the reconciled sheet
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory receiving one `<locale>.<ext>` file per locale
        #[arg(long)]
        out_dir: PathBuf,

        /// Format of the rebuilt files
        #[arg(long, default_value = "js", value_parser = parse_tree_format)]
        tree_format: FormatType,

        /// Fail on rows without a key instead of skipping them
        #[arg(long)]
        strict_rows: bool,

        /// Fail when a key is both a value and a group instead of keeping the last one
        #[arg(long)]
        strict_tree: bool,

        /// Number of nesting levels rebuilt from dotted keys
        #[arg(long, default_value_t = locsheet::options::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Print the reconcile report as JSON
        #[arg(long)]
        json: bool,
    },

    /// View the flattened rows of a nested file or a sheet.
    View {
        /// The file to view
        input: PathBuf,

        /// Only show this locale column
        #[arg(short, long)]
        locale: Option<String>,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },
}

fn parse_tree_format(value: &str) -> Result<FormatType, String> {
    match value.parse::<FormatType>() {
        Ok(format) if !format.is_tabular() => Ok(format),
        Ok(format) => Err(format!("`{}` is a sheet format, expected js or json", format)),
        Err(e) => Err(e.to_string()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    tracing::debug!(command = ?args.commands, "parsed arguments");

    let result = match args.commands {
        Commands::Export {
            first,
            second,
            locales,
            output,
            bom,
        } => run_export_command(first, second, locales, output, bom),
        Commands::Import {
            old,
            new,
            output,
            out_dir,
            tree_format,
            strict_rows,
            strict_tree,
            max_depth,
            json,
        } => run_import_command(
            locsheet_cli::import::ImportArgs {
                old,
                new,
                output,
                out_dir,
                tree_format,
                strict_rows,
                strict_tree,
                max_depth,
            },
            json,
        ),
        Commands::View {
            input,
            locale,
            full,
        } => run_view_command(input, locale, full),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
