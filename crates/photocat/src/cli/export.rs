//! The `photocat export` command: dump catalog records.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use photocat_core::{CatalogStore, Config, ExportFormat, RecordExporter, SqliteCatalog};

/// Export format accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Jsonl,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Jsonl => ExportFormat::JsonLines,
        }
    }
}

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format (defaults to `[output] format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Catalog database (defaults to `[catalog] path` from config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn execute(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let format = match args.format {
        Some(arg) => arg.into(),
        None => ExportFormat::parse(&config.output.format).ok_or_else(|| {
            anyhow::anyhow!("Unknown export format in config: {}", config.output.format)
        })?,
    };
    let pretty = args.pretty || config.output.pretty;

    let mut config = config.clone();
    if let Some(catalog) = args.catalog {
        config.catalog.path = catalog;
    }
    let catalog_path = config.catalog_path();
    if !catalog_path.exists() {
        anyhow::bail!("No catalog at {}", catalog_path.display());
    }

    let catalog = SqliteCatalog::open(&catalog_path)?;
    let records = catalog.list()?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let summary = RecordExporter::new(writer, format, pretty).export(&records)?;

    tracing::info!(
        "Exported {} records ({} unreadable, {} marked for deletion, {} do-not-delete)",
        summary.records,
        summary.unreadable,
        summary.marked_for_deletion,
        summary.do_not_delete
    );
    if let Some(path) = &args.output {
        eprintln!("Wrote {} records to {}", summary.records, path.display());
    }
    Ok(())
}
