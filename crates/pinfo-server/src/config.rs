//! Server settings, read from an optional TOML file and overlaid by `PINFO_*`
//! environment variables. Every key has a default.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, Map};
use pinfo_core::sync::DEFAULT_IMAGE_FOLDER;
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `PINFO_PORT=9000`.
pub const ENV_PREFIX: &str = "PINFO";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Relational SQLite file (primary store).
  pub primary_path:   PathBuf,
  /// Document SQLite file (secondary store).
  pub secondary_path: PathBuf,
  /// Directory holding uploaded files; also served under `/storage`.
  pub blob_root:      PathBuf,
  /// Folder inside `blob_root` that images are stored in.
  pub image_folder:   String,
  pub max_body_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           "127.0.0.1".to_string(),
      port:           8000,
      primary_path:   PathBuf::from("pinfo.sqlite3"),
      secondary_path: PathBuf::from("pinfo-docs.sqlite3"),
      blob_root:      PathBuf::from("storage"),
      image_folder:   DEFAULT_IMAGE_FOLDER.to_string(),
      max_body_bytes: 4 * 1024 * 1024,
    }
  }
}

impl ServerConfig {
  /// Load from `path` (missing file is fine) and the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> { Self::load_with_env(path, None) }

  /// Like [`load`](Self::load), reading environment variables from `env`
  /// instead of the process when given.
  pub fn load_with_env(
    path: &Path,
    env: Option<Map<String, String>>,
  ) -> Result<Self, ConfigError> {
    let config: Self = Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
      .build()?
      .try_deserialize()?;
    Ok(config.with_expanded_paths())
  }

  fn with_expanded_paths(mut self) -> Self {
    self.primary_path = expand_tilde(&self.primary_path);
    self.secondary_path = expand_tilde(&self.secondary_path);
    self.blob_root = expand_tilde(&self.blob_root);
    self
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
