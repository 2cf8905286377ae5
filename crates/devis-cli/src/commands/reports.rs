//! Report commands - clients and dashboard.

use chrono::Local;
use clap::Args;
use console::style;

use devis_core::extraction::rules::format_french_amount;
use devis_core::reports::{aggregate_clients, dashboard as build_dashboard};

use super::{Context, OutputFormat};

#[derive(Args)]
pub struct ClientsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the client list as CSV to this file
    #[arg(long)]
    csv: Option<std::path::PathBuf>,
}

#[derive(Args)]
pub struct DashboardArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn clients(args: ClientsArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let clients = aggregate_clients(&service.database().all_quotes(false)?);

    if let Some(path) = &args.csv {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "nom",
            "telephone",
            "email",
            "totalDevis",
            "totalMontant",
            "montantAccepte",
            "dernierDevis",
        ])?;
        for client in &clients {
            writer.write_record([
                client.name.clone(),
                client.phone.clone().unwrap_or_default(),
                client.email.clone().unwrap_or_default(),
                client.quote_count.to_string(),
                client.total_ttc.to_string(),
                client.accepted_ttc.to_string(),
                client.last_quote_date.to_string(),
            ])?;
        }
        writer.flush()?;
        println!(
            "{} Client list written to {}",
            style("✓").green(),
            path.display()
        );
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&clients)?),
        OutputFormat::Text => {
            for client in &clients {
                println!(
                    "{:<30} {:>3} devis  {:>14} € TTC  {:>14} € acceptés  dernier le {}",
                    client.name,
                    client.quote_count,
                    format_french_amount(client.total_ttc),
                    format_french_amount(client.accepted_ttc),
                    client.last_quote_date.format("%d/%m/%Y")
                );
            }
            println!();
            println!("{} clients", clients.len());
        }
    }
    Ok(())
}

pub async fn dashboard(args: DashboardArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.service()?;
    let stats = build_dashboard(
        &service.database().all_quotes(false)?,
        Local::now().date_naive(),
    );

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style("Tableau de bord").bold());
    println!(
        "Total:       {} devis, {} € HT, {} € TTC",
        stats.total.count,
        format_french_amount(stats.total.ht),
        format_french_amount(stats.total.ttc)
    );
    println!(
        "Ce mois:     {} devis, {} € TTC",
        stats.this_month.count,
        format_french_amount(stats.this_month.ttc)
    );
    println!(
        "Acceptés:    {} devis, {} € TTC",
        stats.accepted.count,
        format_french_amount(stats.accepted.ttc)
    );
    println!("En attente:  {} devis", stats.pending);

    println!();
    println!("{}", style("Par statut").bold());
    for status in &stats.by_status {
        println!(
            "  {:<12} {:>4}  {:>14} €",
            status.status.as_str(),
            status.count,
            format_french_amount(status.ttc)
        );
    }

    println!();
    println!("{}", style("Types de travaux").bold());
    for work_type in &stats.by_work_type {
        println!(
            "  {:<25} {:>4}  {:>14} €",
            work_type.work_type,
            work_type.count,
            format_french_amount(work_type.ttc)
        );
    }

    println!();
    println!("{}", style("Évolution").bold());
    for month in &stats.evolution {
        println!(
            "  {}  {:>4}  {:>14} €",
            month.month,
            month.count,
            format_french_amount(month.ttc)
        );
    }

    Ok(())
}
