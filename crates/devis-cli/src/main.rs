//! CLI application for construction quote management.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, pdf, quotes, reports, spreadsheet, Context};

/// Devis - manage construction quotes: numbering, pricing, PDF and spreadsheet import
#[derive(Parser)]
#[command(name = "devis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the quote database (overrides the configured one)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a quote from JSON
    Create(quotes::CreateArgs),

    /// Show one quote
    Show(quotes::ShowArgs),

    /// List quotes with filters
    List(quotes::ListArgs),

    /// Update a quote from partial JSON
    Update(quotes::UpdateArgs),

    /// Delete a quote and its lines
    Delete(quotes::DeleteArgs),

    /// Distinct values usable as filters
    Options(quotes::OptionsArgs),

    /// Import quotes from a spreadsheet (.xlsx, .xls, .ods, .csv)
    Import(spreadsheet::ImportArgs),

    /// Export quotes to an Excel workbook
    Export(spreadsheet::ExportArgs),

    /// Extract draft quotes from PDF files without storing them
    Extract(pdf::ExtractArgs),

    /// Import quotes from PDF files, keeping the originals
    ImportPdf(pdf::ImportPdfArgs),

    /// Save the original PDF of an imported quote
    Pdf(pdf::PdfArgs),

    /// List clients with their quote totals
    Clients(reports::ClientsArgs),

    /// Show dashboard statistics
    Dashboard(reports::DashboardArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = Context::new(cli.config, cli.db);

    // Execute command
    match cli.command {
        Commands::Create(args) => quotes::create(args, &ctx).await,
        Commands::Show(args) => quotes::show(args, &ctx).await,
        Commands::List(args) => quotes::list(args, &ctx).await,
        Commands::Update(args) => quotes::update(args, &ctx).await,
        Commands::Delete(args) => quotes::delete(args, &ctx).await,
        Commands::Options(args) => quotes::options(args, &ctx).await,
        Commands::Import(args) => spreadsheet::import(args, &ctx).await,
        Commands::Export(args) => spreadsheet::export(args, &ctx).await,
        Commands::Extract(args) => pdf::extract(args, &ctx).await,
        Commands::ImportPdf(args) => pdf::import_pdf(args, &ctx).await,
        Commands::Pdf(args) => pdf::save_original(args, &ctx).await,
        Commands::Clients(args) => reports::clients(args, &ctx).await,
        Commands::Dashboard(args) => reports::dashboard(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
