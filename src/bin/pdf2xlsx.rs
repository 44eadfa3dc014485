use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_table_extract::{
    ExtractOptions, PageScope, PageSelection, PdfDocument, TableSet, extract_tables,
    write_workbook_to_path,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2xlsx",
    version,
    about = "Extract tables from text PDFs into Excel workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show page count and whether the PDF has extractable text.
    Info {
        /// Input PDF path.
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Extract tables and write one worksheet per table.
    Extract(ExtractArgs),
    /// Print extracted tables without writing a workbook.
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Pages to extract, like 1,3-5,10. Defaults to the whole document.
    #[arg(long)]
    pages: Option<String>,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Extract even when no text is found on the first pages.
    #[arg(long)]
    allow_scanned: bool,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output workbook path. Defaults to <input stem>_tables.xlsx.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List every extracted table.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PreviewFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Preview output format.
    #[arg(long, value_enum, default_value_t = PreviewFormat::Text)]
    format: PreviewFormat,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}_tables.xlsx"))
}

fn build_options(args: &SelectionArgs, document: &PdfDocument) -> Result<ExtractOptions> {
    let scope = match args.pages.as_deref() {
        None => PageScope::All,
        Some(expression) => {
            let selection = PageSelection::parse(expression, document.page_count());
            if selection.is_empty() {
                bail!(
                    "no valid pages in '{expression}' (document has {} pages)",
                    document.page_count()
                );
            }
            eprintln!("selected pages: {}", selection.describe());
            PageScope::Selected(selection)
        }
    };

    Ok(ExtractOptions {
        scope,
        min_cols: args.min_cols,
        require_text: !args.allow_scanned,
    })
}

fn load_tables(args: &SelectionArgs) -> Result<TableSet> {
    let document = PdfDocument::open(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;
    let options = build_options(args, &document)?;
    extract_tables(&document, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))
}

fn run_info(input: &Path) -> Result<()> {
    let document = PdfDocument::open(input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;
    println!("pages: {}", document.page_count());
    println!("searchable: {}", document.is_searchable());
    Ok(())
}

fn run_extract(args: &ExtractArgs) -> Result<usize> {
    let tables = load_tables(&args.selection)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.selection.input));

    write_workbook_to_path(&tables, &output)
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    if tables.is_empty() {
        eprintln!("warning: no tables found in the selected pages");
    } else {
        eprintln!("found {} table(s), written to {}", tables.len(), output.display());
    }
    if args.verbose {
        for named in &tables {
            eprintln!(
                "  - {}: {} column(s), {} row(s)",
                named.name,
                named.table.width(),
                named.table.rows.len()
            );
        }
    }

    Ok(tables.len())
}

fn print_text_preview(tables: &TableSet) {
    for named in tables {
        println!("== {} ==", named.name);
        let columns = named.table.column_names();
        let mut widths = columns.iter().map(|name| name.chars().count()).collect::<Vec<_>>();
        for row in &named.table.rows {
            for (index, cell) in row.iter().enumerate() {
                let len = cell.as_deref().map_or(0, |text| text.chars().count());
                match widths.get_mut(index) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let render = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        println!("{}", render(columns.iter().map(String::as_str).collect()));
        for row in &named.table.rows {
            let mut cells = row
                .iter()
                .map(|cell| cell.as_deref().unwrap_or(""))
                .collect::<Vec<_>>();
            cells.resize(widths.len(), "");
            println!("{}", render(cells));
        }
        println!();
    }
}

fn run_preview(args: &PreviewArgs) -> Result<usize> {
    let tables = load_tables(&args.selection)?;
    match args.format {
        PreviewFormat::Json => println!("{}", serde_json::to_string_pretty(&tables)?),
        PreviewFormat::Text if tables.is_empty() => {
            eprintln!("warning: no tables found in the selected pages");
        }
        PreviewFormat::Text => print_text_preview(&tables),
    }
    Ok(tables.len())
}

fn exit_code(result: Result<usize>) -> ExitCode {
    match result {
        Ok(0) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_table_extract=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Info { input } => match run_info(&input) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
        Commands::Extract(args) => exit_code(run_extract(&args)),
        Commands::Preview(args) => exit_code(run_preview(&args)),
    }
}
