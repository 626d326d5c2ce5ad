//! Error type for `pinfo-blob-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The key or folder is empty, absolute, or escapes the root.
  #[error("invalid blob key: {0:?}")]
  InvalidKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
