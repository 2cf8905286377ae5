//! PDF commands - extract drafts, import quotes, save stored originals.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use devis_core::pdf::is_pdf;
use devis_core::service::draft_from_pdf;
use devis_core::DraftRecord;

use super::{now, Context};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// PDF file or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory, one JSON file per PDF (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportPdfArgs {
    /// PDF file or glob pattern
    #[arg(required = true)]
    input: String,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Args)]
pub struct PdfArgs {
    /// Quote number
    number: String,

    /// Output file (default: the stored file name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Draft of one file, as printed by `extract`.
#[derive(Serialize)]
struct FileDraft {
    #[serde(rename = "fichier")]
    file: String,
    #[serde(flatten)]
    draft: DraftRecord,
}

fn pdf_files(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", pattern);
    }
    Ok(files)
}

fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn read_pdf(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = fs::read(path)?;
    if !is_pdf(&data) {
        anyhow::bail!("Not a PDF file: {}", path.display());
    }
    Ok(data)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("devis.pdf")
        .to_string()
}

pub async fn extract(args: ExtractArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = ctx.load_config()?;
    let files = pdf_files(&args.input)?;
    let today = Local::now().date_naive();

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let mut drafts = Vec::with_capacity(files.len());
    let mut failed = Vec::new();

    for path in &files {
        let result = read_pdf(path)
            .and_then(|data| Ok(draft_from_pdf(&data, &config.quotes, today)?));

        match result {
            Ok(draft) => drafts.push(FileDraft {
                file: file_name(path),
                draft,
            }),
            Err(e) => {
                warn!("Failed to extract {}: {}", path.display(), e);
                failed.push((path.clone(), e.to_string()));
            }
        }
    }

    match &args.output_dir {
        Some(output_dir) => {
            for item in &drafts {
                let stem = Path::new(&item.file)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("devis");
                let output_path = output_dir.join(format!("{}.json", stem));
                fs::write(&output_path, serde_json::to_string_pretty(item)?)?;
                debug!("Wrote draft to {}", output_path.display());
            }
            println!(
                "{} Extracted {} drafts to {} in {:?}",
                style("✓").green(),
                drafts.len(),
                output_dir.display(),
                start.elapsed()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&drafts)?),
    }

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
        if drafts.is_empty() {
            anyhow::bail!("No draft could be extracted");
        }
    }

    Ok(())
}

pub async fn import_pdf(args: ImportPdfArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut service = ctx.service()?;
    let files = pdf_files(&args.input)?;

    let pb = progress_bar(files.len())?;
    let mut created = Vec::new();
    let mut failed = Vec::new();

    for path in &files {
        let result = read_pdf(path)
            .and_then(|data| Ok(service.import_pdf(&data, &file_name(path), now())?));

        match result {
            Ok(quote) => created.push((path.clone(), quote)),
            Err(e) => {
                if !args.continue_on_error {
                    pb.abandon();
                    anyhow::bail!("Import of {} failed: {}", path.display(), e);
                }
                warn!("Failed to import {}: {}", path.display(), e);
                failed.push((path.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (path, quote) in &created {
        println!(
            "{} {} -> {} ({}, {} € TTC)",
            style("✓").green(),
            path.display(),
            quote.number,
            quote.client.name,
            quote.totals.ttc
        );
    }
    println!(
        "   {} imported, {} failed in {:?}",
        style(created.len()).green(),
        style(failed.len()).red(),
        start.elapsed()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

pub async fn save_original(args: PdfArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let pdf = service.original_pdf(&args.number)?;

    let output = args.output.unwrap_or_else(|| PathBuf::from(&pdf.file_name));
    fs::write(&output, &pdf.data)?;

    println!(
        "{} Saved original PDF of {} to {}",
        style("✓").green(),
        args.number,
        output.display()
    );
    Ok(())
}
