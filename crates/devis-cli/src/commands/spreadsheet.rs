//! Spreadsheet commands - import quotes from a sheet, export them to Excel.

use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::info;

use devis_core::export::{default_file_name, write_workbook};
use devis_core::import::import_file;

use super::quotes::FilterArgs;
use super::{now, Context, OutputFormat};

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Spreadsheet with a header row: client, typeTravaux, dateDevis, montant, statut, ...
    #[arg(required = true)]
    input: PathBuf,

    /// Output format of the report
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Output file (default: devis-export-YYYY-MM-DD.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn import(args: ImportArgs, ctx: &Context) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut service = ctx.service()?;
    info!("Importing {}", args.input.display());
    let report = import_file(&mut service, &args.input, now())?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!(
                "{} {} quotes created",
                style("✓").green(),
                style(report.count).green()
            );
            if !report.errors.is_empty() {
                println!();
                println!("{}", style(format!("{} rows rejected:", report.errors.len())).red());
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }
        }
    }

    Ok(())
}

pub async fn export(args: ExportArgs, ctx: &Context) -> anyhow::Result<()> {
    let company = ctx.load_config()?.company;
    let service = ctx.service()?;
    let quotes = service.database().filtered_quotes(&args.filter.to_filter())?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_file_name(Local::now().date_naive())));
    write_workbook(&quotes, &company, &output)?;

    println!(
        "{} Exported {} quotes to {}",
        style("✓").green(),
        quotes.len(),
        output.display()
    );
    Ok(())
}
