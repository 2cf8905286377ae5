//! Quote commands - create, show, list, update, delete and filter options.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;

use devis_core::extraction::rules::format_french_amount;
use devis_core::{NewQuote, Pagination, Quote, QuoteFilter, QuoteStatus, QuoteUpdate, SortField, SortOrder};

use super::{now, read_json, Context, OutputFormat};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Quote JSON: inline, a file path, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Quote number (e.g. DEV-2024-001)
    number: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Quote number
    number: String,

    /// Partial quote JSON: inline, a file path, or `-` for stdin
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Quote number
    number: String,
}

#[derive(Args)]
pub struct OptionsArgs {}

/// Listing filters, shared with the export command.
#[derive(Args)]
pub struct FilterArgs {
    /// Search client, work type, notes and materials
    #[arg(short, long)]
    search: Option<String>,

    /// Client name contains
    #[arg(long)]
    client: Option<String>,

    /// Work type contains
    #[arg(long = "type")]
    work_type: Option<String>,

    /// Materials contain
    #[arg(long)]
    materials: Option<String>,

    /// Exact status (brouillon, envoyé, accepté, ...)
    #[arg(long, value_parser = parse_status)]
    status: Option<QuoteStatus>,

    /// Issued on or after (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Issued on or before (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Minimum TTC
    #[arg(long)]
    min: Option<Decimal>,

    /// Maximum TTC
    #[arg(long)]
    max: Option<Decimal>,

    /// Sort key: dateDevis, montantTTC, client, typeTravaux, statut, createdAt
    #[arg(long, default_value = "dateDevis")]
    sort: String,

    /// Sort order: asc or desc
    #[arg(long, default_value = "desc")]
    order: String,
}

impl FilterArgs {
    pub fn to_filter(&self) -> QuoteFilter {
        QuoteFilter {
            search: self.search.clone(),
            client: self.client.clone(),
            work_type: self.work_type.clone(),
            materials: self.materials.clone(),
            status: self.status,
            date_from: self.from,
            date_to: self.to,
            min_ttc: self.min,
            max_ttc: self.max,
            sort: SortField::parse(&self.sort),
            order: SortOrder::parse(&self.order),
        }
    }
}

fn parse_status(s: &str) -> Result<QuoteStatus, String> {
    QuoteStatus::parse(s).ok_or_else(|| format!("unknown status: {}", s))
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Page number, from 1
    #[arg(long, default_value = "1")]
    page: u32,

    /// Quotes per page
    #[arg(long, default_value = "50")]
    page_size: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn create(args: CreateArgs, ctx: &Context) -> anyhow::Result<()> {
    let input: NewQuote = read_json(&args.input)?;
    let mut service = ctx.service()?;

    let quote = service.create(input, now())?;
    print_quote(&quote, args.format)?;
    Ok(())
}

pub async fn show(args: ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let quote = service.get(&args.number)?;
    print_quote(&quote, args.format)?;
    Ok(())
}

pub async fn update(args: UpdateArgs, ctx: &Context) -> anyhow::Result<()> {
    let update: QuoteUpdate = read_json(&args.input)?;
    let mut service = ctx.service()?;

    let quote = service.update(&args.number, update, now())?;
    print_quote(&quote, args.format)?;
    Ok(())
}

pub async fn delete(args: DeleteArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut service = ctx.service()?;
    service.delete(&args.number)?;

    println!("{} Deleted quote {}", style("✓").green(), args.number);
    Ok(())
}

pub async fn list(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let pagination = Pagination {
        page: args.page,
        page_size: args.page_size,
    };
    let page = service
        .database()
        .list_quotes(&args.filter.to_filter(), pagination)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Text => {
            if page.data.is_empty() {
                println!("{} No quotes found.", style("ℹ").blue());
                return Ok(());
            }
            for quote in &page.data {
                println!(
                    "{:<14} {:<10} {:<25} {:<20} {:>14}  {}",
                    quote.number,
                    quote.issue_date.format("%d/%m/%Y"),
                    truncate(&quote.client.name, 25),
                    truncate(&quote.work_type, 20),
                    format_french_amount(quote.totals.ttc),
                    quote.status
                );
            }
            println!();
            println!(
                "Page {}/{} - {} quotes",
                page.page,
                page.total_pages.max(1),
                page.total
            );
        }
    }
    Ok(())
}

pub async fn options(_args: OptionsArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let options = service.database().options()?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn print_quote(quote: &Quote, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(quote)?),
        OutputFormat::Text => println!("{}", format_quote_text(quote)),
    }
    Ok(())
}

fn format_quote_text(quote: &Quote) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style(format!("Devis {}", quote.number)).bold()));
    out.push_str(&format!("Client:       {}\n", quote.client.name));
    if let Some(address) = &quote.client.address {
        out.push_str(&format!("Adresse:      {}\n", address));
    }
    out.push_str(&format!("Travaux:      {}\n", quote.work_type));
    out.push_str(&format!("Date:         {}\n", quote.issue_date.format("%d/%m/%Y")));
    if let Some(valid_until) = quote.valid_until {
        out.push_str(&format!("Validité:     {}\n", valid_until.format("%d/%m/%Y")));
    }
    out.push_str(&format!("Statut:       {}\n", quote.status));

    if !quote.lines.is_empty() {
        out.push('\n');
        for line in &quote.lines {
            if line.is_section {
                out.push_str(&format!("  {}\n", style(&line.description).bold()));
            } else {
                out.push_str(&format!(
                    "  {:<40} {:>8} {:<6} {:>12} {:>12}\n",
                    truncate(&line.description, 40),
                    line.quantity.normalize(),
                    line.unit,
                    format_french_amount(line.unit_price),
                    format_french_amount(line.amounts.ht)
                ));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!("Total HT:     {} €\n", format_french_amount(quote.totals.ht)));
    out.push_str(&format!(
        "TVA {}%:      {} €\n",
        quote.vat_rate.normalize(),
        format_french_amount(quote.totals.tva)
    ));
    out.push_str(&format!("Total TTC:    {} €", format_french_amount(quote.totals.ttc)));

    out
}
