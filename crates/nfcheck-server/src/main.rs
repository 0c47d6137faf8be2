//! nfcheck server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store and serves the validation API over HTTP. The reference table
//! can also be loaded and the audit log exported from the command line.
//!
//! ```text
//! nfcheck import-reference base.csv
//! nfcheck export-records registros.csv
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use nfcheck_core::{AuditRecorder, store::ReferenceSource, tabular};
use nfcheck_server::{ServerConfig, load_config};
use nfcheck_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "NFe validation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Replace the reference table with the rows of a CSV file.
  ImportReference {
    /// CSV file with UF, Nfe, Pedido and Planejamento columns.
    path: PathBuf,
  },
  /// Write every validation record to a CSV file.
  ExportRecords {
    /// Destination file; overwritten if it exists.
    out: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg =
    load_config(&cli.config).context("failed to load configuration")?;
  let store = open_store(&server_cfg).await?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg, store).await,
    Command::ImportReference { path } => import_reference(&store, path).await,
    Command::ExportRecords { out } => export_records(&store, out).await,
  }
}

async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store_path = cfg.resolved_store_path();

  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

async fn serve(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = nfcheck_server::app(Arc::new(store));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn import_reference(store: &SqliteStore, path: PathBuf) -> anyhow::Result<()> {
  let data = tokio::fs::read(&path)
    .await
    .with_context(|| format!("failed to read {path:?}"))?;
  let rows = tabular::parse_reference_csv(&data)
    .with_context(|| format!("invalid reference file {path:?}"))?;
  anyhow::ensure!(!rows.is_empty(), "{path:?} contains no reference rows");

  let n = store
    .replace_all(rows)
    .await
    .context("failed to replace reference table")?;
  println!("Imported {n} reference rows from {}", path.display());
  Ok(())
}

async fn export_records(store: &SqliteStore, out: PathBuf) -> anyhow::Result<()> {
  let csv = AuditRecorder::new(store)
    .export()
    .await
    .context("failed to read validation records")?;
  tokio::fs::write(&out, csv)
    .await
    .with_context(|| format!("failed to write {out:?}"))?;
  println!("Exported validation records to {}", out.display());
  Ok(())
}
