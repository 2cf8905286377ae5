//! Subcommands and the state they share.

pub mod config;
pub mod pdf;
pub mod quotes;
pub mod reports;
pub mod spreadsheet;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use tracing::debug;

use devis_core::models::config::AppConfig;
use devis_core::{Database, QuoteService};

/// Output format for commands that print records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

/// Global options resolved once per invocation.
pub struct Context {
    config_path: Option<PathBuf>,
    db_path: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<String>, db_path: Option<PathBuf>) -> Self {
        Self {
            config_path: config_path.map(PathBuf::from),
            db_path,
        }
    }

    /// The `--config` file, or the one in the platform config directory.
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(default_config_path)
    }

    /// Configuration from the config file, defaults when the default file is absent.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let path = self.config_path();
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            let config = AppConfig::from_file(&path)?;
            config.validate()?;
            return Ok(config);
        }
        if self.config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Ok(AppConfig::default())
    }

    /// Open the database and wrap it with the configured quote defaults.
    pub fn service(&self) -> anyhow::Result<QuoteService> {
        let config = self.load_config()?;
        let db_path = self
            .db_path
            .clone()
            .unwrap_or_else(|| config.storage.database_path.clone());

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        Ok(QuoteService::new(db, config.quotes))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devis")
        .join("config.json")
}

/// Local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse JSON given inline, as a file path, or as `-` for stdin.
pub fn read_json<T: DeserializeOwned>(source: &str) -> anyhow::Result<T> {
    let content = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if Path::new(source).is_file() {
        fs::read_to_string(source)?
    } else {
        source.to_string()
    };

    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
}
