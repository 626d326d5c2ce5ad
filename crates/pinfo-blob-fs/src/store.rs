//! [`FsBlobStore`] — the local-directory implementation of [`BlobStore`].

use std::{
  io::ErrorKind,
  path::{Component, Path, PathBuf},
};

use pinfo_core::{image::ImageUpload, store::BlobStore};
use uuid::Uuid;

use crate::{Error, Result};

/// Blobs stored as plain files below `root`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  /// Use `root` as the blob directory, creating it if needed.
  pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    tokio::fs::create_dir_all(&root)
      .await
      .map_err(|source| Error::Io {
        path: root.clone(),
        source,
      })?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  /// The file a key maps to. Rejects keys that would leave the root.
  pub fn path_of(&self, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let plain = !key.is_empty()
      && relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
      return Err(Error::InvalidKey(key.to_owned()));
    }
    Ok(self.root.join(relative))
  }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
  move |source| Error::Io {
    path: path.to_path_buf(),
    source,
  }
}

impl BlobStore for FsBlobStore {
  type Error = Error;

  async fn put(&self, folder: &str, image: &ImageUpload) -> Result<String> {
    let dir = self.path_of(folder)?;
    tokio::fs::create_dir_all(&dir).await.map_err(io_err(&dir))?;

    let key = format!(
      "{folder}/{}.{}",
      Uuid::new_v4().simple(),
      image.kind.extension()
    );
    let path = self.path_of(&key)?;
    tokio::fs::write(&path, &image.bytes)
      .await
      .map_err(io_err(&path))?;

    tracing::debug!(%key, bytes = image.bytes.len(), "stored blob");
    Ok(key)
  }

  async fn delete(&self, key: &str) -> Result<()> {
    let path = self.path_of(key)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => {
        tracing::debug!(%key, "deleted blob");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(%key, "blob already absent");
        Ok(())
      }
      Err(e) => Err(io_err(&path)(e)),
    }
  }
}
