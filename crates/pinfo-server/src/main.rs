//! pinfo-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the primary
//! and secondary SQLite stores and the blob directory, and serves the JSON API
//! over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use pinfo_blob_fs::FsBlobStore;
use pinfo_core::sync::Synchronizer;
use pinfo_server::ServerConfig;
use pinfo_store_docs::{DocumentStore, PERSONAL_INFORMATIONS};
use pinfo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Personal information server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  // Open the three backends.
  let primary = SqliteStore::open(&cfg.primary_path)
    .await
    .with_context(|| format!("failed to open primary store at {:?}", cfg.primary_path))?;
  let secondary = DocumentStore::open(&cfg.secondary_path, PERSONAL_INFORMATIONS)
    .await
    .with_context(|| {
      format!("failed to open secondary store at {:?}", cfg.secondary_path)
    })?;
  let blobs = FsBlobStore::open(&cfg.blob_root)
    .await
    .with_context(|| format!("failed to open blob root {:?}", cfg.blob_root))?;

  let sync = Synchronizer::new(primary, secondary, blobs)
    .with_image_folder(cfg.image_folder.clone());

  let app = pinfo_api::app(Arc::new(sync), &cfg.blob_root, cfg.max_body_bytes);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
