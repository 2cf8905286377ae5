//! Config command - company identity, quote defaults and database location.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use devis_core::extraction::rules::format_french_amount;
use devis_core::models::config::AppConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Print the raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Print one setting (e.g. "quotes.default_vat_rate")
    Get { key: String },

    /// Change one setting; numbers and booleans are read as JSON
    Set { key: String, value: String },

    /// Show where the configuration file lives
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write to this file instead of the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,

    /// Name of the company issuing quotes
    #[arg(long)]
    company: Option<String>,

    /// Quote number prefix
    #[arg(long)]
    prefix: Option<String>,
}

pub async fn run(args: ConfigArgs, ctx: &Context) -> anyhow::Result<()> {
    let path = ctx.config_path();
    match args.command {
        ConfigCommand::Show { json } => show(&path, json),
        ConfigCommand::Init(init_args) => init(init_args, &path),
        ConfigCommand::Get { key } => {
            let tree = serde_json::to_value(read(&path)?)?;
            let value = tree
                .pointer(&pointer(&key))
                .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        ConfigCommand::Set { key, value } => set(&path, &key, &value),
        ConfigCommand::Path => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!(
                    "{} Not created yet, run 'devis config init'",
                    style("ℹ").blue()
                );
            }
            Ok(())
        }
    }
}

/// `quotes.number_prefix` as the JSON pointer `/quotes/number_prefix`.
fn pointer(key: &str) -> String {
    key.split('.').map(|part| format!("/{}", part)).collect()
}

/// The file at `path`, or defaults when there is none yet.
fn read(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        Ok(AppConfig::from_file(path)?)
    } else {
        Ok(AppConfig::default())
    }
}

fn show(path: &Path, json: bool) -> anyhow::Result<()> {
    let config = read(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = if path.exists() {
        path.display().to_string()
    } else {
        "defaults".to_string()
    };
    println!("{} ({})", style("Configuration").bold(), source);

    let company = &config.company;
    let name = if company.name.trim().is_empty() {
        "-"
    } else {
        company.name.as_str()
    };
    println!("Entreprise:   {}", name);
    let contact = company.contact_line();
    if !contact.is_empty() {
        println!("              {}", contact);
    }

    let quotes = &config.quotes;
    println!("Numérotation: {}-AAAA-NNN", quotes.number_prefix);
    println!(
        "TVA:          {} %",
        format_french_amount(quotes.default_vat_rate)
    );
    match quotes.validity_days {
        0 => println!("Validité:     aucune"),
        days => println!("Validité:     {} jours", days),
    }
    if let Some(notes) = quotes.notes() {
        println!("Notes:        {}", notes);
    }
    println!("Base:         {}", config.storage.database_path.display());

    Ok(())
}

fn init(args: InitArgs, default_path: &Path) -> anyhow::Result<()> {
    let path = args.output.unwrap_or_else(|| default_path.to_path_buf());
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists, pass --force to replace it",
            path.display()
        );
    }

    let mut config = AppConfig::default();
    if let Some(company) = args.company {
        config.company.name = company;
    }
    if let Some(prefix) = args.prefix {
        config.quotes.number_prefix = prefix;
    }
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(&path)?;

    println!("{} Wrote {}", style("✓").green(), path.display());
    Ok(())
}

fn set(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
    let value: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let mut tree = serde_json::to_value(read(path)?)?;
    let slot = tree
        .pointer_mut(&pointer(key))
        .filter(|slot| !slot.is_object())
        .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))?;
    *slot = value.clone();

    let config: AppConfig = serde_json::from_value(tree)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} {} = {}", style("✓").green(), key, value);
    Ok(())
}
