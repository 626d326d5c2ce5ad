//! Store traits for the three backends the synchronizer drives.
//!
//! Implemented by `pinfo-store-sqlite` (primary), `pinfo-store-docs`
//! (secondary) and `pinfo-blob-fs` (blobs). The synchronizer and the API
//! depend on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used from axum
//! handlers on a multi-threaded tokio runtime.

use std::future::Future;

use crate::{
  correlate::Correlation,
  image::ImageUpload,
  person::{PersonInfo, PrimaryRecord, SecondaryRecord, SortDirection},
};

// ─── Primary ─────────────────────────────────────────────────────────────────

/// The relational store, authoritative for record identity.
pub trait PrimaryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a row and return it with its store-assigned id and timestamps.
  fn insert<'a>(
    &'a self,
    info: &'a PersonInfo,
  ) -> impl Future<Output = Result<PrimaryRecord, Self::Error>> + Send + 'a;

  /// Retrieve a row by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PrimaryRecord>, Self::Error>> + Send + '_;

  /// All rows ordered by `(first_name, last_name)` in `direction`.
  fn list(
    &self,
    direction: SortDirection,
  ) -> impl Future<Output = Result<Vec<PrimaryRecord>, Self::Error>> + Send + '_;

  /// Overwrite every field of row `id`. Errors if the row does not exist.
  fn update<'a>(
    &'a self,
    id: i64,
    info: &'a PersonInfo,
  ) -> impl Future<Output = Result<PrimaryRecord, Self::Error>> + Send + 'a;

  /// Delete row `id`. Errors if the row does not exist.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Secondary ───────────────────────────────────────────────────────────────

/// The document store holding a best-effort mirror of the primary rows.
pub trait SecondaryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a document and return it with its store-assigned id.
  fn insert<'a>(
    &'a self,
    info: &'a PersonInfo,
  ) -> impl Future<Output = Result<SecondaryRecord, Self::Error>> + Send + 'a;

  /// The first live document matching `filter`, in store order.
  fn find_by_filter<'a>(
    &'a self,
    filter: &'a Correlation,
  ) -> impl Future<Output = Result<Option<SecondaryRecord>, Self::Error>> + Send + 'a;

  /// All live documents ordered by `(first_name, last_name)` in `direction`.
  fn list(
    &self,
    direction: SortDirection,
  ) -> impl Future<Output = Result<Vec<SecondaryRecord>, Self::Error>> + Send + '_;

  /// Overwrite every field of document `id`. Errors if it does not exist.
  fn update<'a>(
    &'a self,
    id: &'a str,
    info: &'a PersonInfo,
  ) -> impl Future<Output = Result<SecondaryRecord, Self::Error>> + Send + 'a;

  /// Delete document `id`. Errors if it does not exist.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

/// Opaque storage for uploaded images.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `image` under `folder` and return its key.
  fn put<'a>(
    &'a self,
    folder: &'a str,
    image: &'a ImageUpload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Remove the blob at `key`. A missing blob is not an error.
  fn delete<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
