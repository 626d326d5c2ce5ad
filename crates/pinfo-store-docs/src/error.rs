//! Error type for `pinfo-store-docs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Attempted to update or delete a document that does not exist or is
  /// already deleted.
  #[error("document not found: {0}")]
  NotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
