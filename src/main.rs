//! Import a CSV sheet into SQLite.
//!
//! Usage:
//!   sheet-import <schema.json> <data.csv>
//!
//! Optional environment variables:
//! - IMPORT_BATCH_SIZE (defaults to 2000)
//! - IMPORT_LANGUAGE (defaults to en)
//! - IMPORT_DATABASE_PATH (defaults to data/import.db)
//! - IMPORT_DELIMITER (defaults to ,)

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use tracing::{info, warn};

use sheet_import::config::ImportConfig;
use sheet_import::db::SqliteSink;
use sheet_import::decoder::import_csv;
use sheet_import::i18n::Localization;
use sheet_import::{FieldSchema, RowListener};

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sheet_import=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [schema_path, data_path] = args.as_slice() else {
        bail!("Usage: sheet-import <schema.json> <data.csv>");
    };

    let config = ImportConfig::from_env()?;

    let schema_json = fs::read_to_string(schema_path)
        .context(format!("Failed to read schema file {}", schema_path))?;
    let schema = FieldSchema::from_json_str(&schema_json)?;
    info!("Loaded schema with {} fields", schema.len());

    let sink = SqliteSink::open(&config.database_path)?;
    let localization = Localization::new(config.language);
    let mut listener = RowListener::with_localization(schema, sink.clone(), &localization)
        .with_batch_size(config.batch_size);

    info!(
        "Importing {} into {} (batch size {}, language {})",
        data_path,
        config.database_path,
        config.batch_size,
        config.language.code()
    );
    let file = File::open(data_path).context(format!("Failed to open {}", data_path))?;
    let report = match import_csv(file, &mut listener, config.delimiter) {
        Ok(report) => report,
        Err(e) => {
            for entry in listener.drain_errors() {
                warn!("{}", entry.message);
            }
            return Err(e).context(format!("Import of {} aborted", data_path));
        }
    };

    for entry in &report.errors {
        warn!("{}", entry.message);
    }
    report.metrics.log_summary();
    info!("✓ {} rows now stored", sink.row_count()?);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
