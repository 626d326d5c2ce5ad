//! [`Synchronizer`] — applies every record operation to both stores.
//!
//! Writes go to the blob store first (when an image is uploaded), then the
//! primary store, then the secondary store, strictly in sequence. There is no
//! transaction spanning the stores:
//!
//! - a failure before the primary write commits is reported as
//!   [`Error::Store`] with [`StoreSide::Primary`];
//! - a failure after it commits is reported as [`Error::PartialWrite`] and the
//!   primary write is left in place;
//! - an image stored by the failing operation is deleted again in both cases.
//!
//! Reads resolve the secondary document through [`correlate::resolve`]. A
//! missing document is a normal outcome; updates repair it by inserting one.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  correlate,
  error::{Committed, Error, Result, StoreSide},
  image::ImageUpload,
  person::{PersonInfo, PersonPatch, PrimaryRecord, SecondaryRecord, SortDirection},
  store::{BlobStore, PrimaryStore, SecondaryStore},
};

/// Blob folder for profile images unless configured otherwise.
pub const DEFAULT_IMAGE_FOLDER: &str = "profile_images";

// ─── Results ─────────────────────────────────────────────────────────────────

/// Both representations after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonPair {
  pub primary:   PrimaryRecord,
  pub secondary: SecondaryRecord,
}

/// A primary row and its correlated document, if one was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPerson {
  pub primary:   PrimaryRecord,
  pub secondary: Option<SecondaryRecord>,
}

/// Both stores dumped side by side. The lists are not aligned with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
  pub primary:   Vec<PrimaryRecord>,
  pub secondary: Vec<SecondaryRecord>,
}

// ─── Synchronizer ────────────────────────────────────────────────────────────

pub struct Synchronizer<P, S, B> {
  primary:      P,
  secondary:    S,
  blobs:        B,
  image_folder: String,
}

impl<P, S, B> Synchronizer<P, S, B>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  pub fn new(primary: P, secondary: S, blobs: B) -> Self {
    Self {
      primary,
      secondary,
      blobs,
      image_folder: DEFAULT_IMAGE_FOLDER.to_owned(),
    }
  }

  /// Store uploaded images under `folder` instead of the default.
  pub fn with_image_folder(mut self, folder: impl Into<String>) -> Self {
    self.image_folder = folder.into();
    self
  }

  pub fn primary(&self) -> &P { &self.primary }

  pub fn secondary(&self) -> &S { &self.secondary }

  pub fn blobs(&self) -> &B { &self.blobs }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Dump both stores, each ordered by `(first_name, last_name)`.
  pub async fn list(&self, direction: SortDirection) -> Result<Listing> {
    let primary = self
      .primary
      .list(direction)
      .await
      .map_err(|e| Error::store(StoreSide::Primary, e))?;
    let secondary = self
      .secondary
      .list(direction)
      .await
      .map_err(|e| Error::store(StoreSide::Secondary, e))?;
    Ok(Listing { primary, secondary })
  }

  /// Fetch a primary row and its correlated document.
  ///
  /// The secondary side is best-effort: a lookup failure is logged and
  /// reported as no document.
  pub async fn get(&self, id: i64) -> Result<ResolvedPerson> {
    let primary = self.find_primary(id).await?;

    let secondary = match correlate::resolve(&self.secondary, &primary).await {
      Ok(found) => found,
      Err(e) => {
        warn!(primary_id = id, error = %e, "secondary lookup failed");
        None
      }
    };
    if secondary.is_none() {
      debug!(primary_id = id, "no correlated secondary document");
    }

    Ok(ResolvedPerson { primary, secondary })
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Create a record in both stores.
  ///
  /// Any `image` or `correlation_id` already set on `info` is replaced.
  pub async fn create(
    &self,
    mut info: PersonInfo,
    image: Option<ImageUpload>,
  ) -> Result<PersonPair> {
    info.image = match &image {
      Some(upload) => Some(self.store_image(upload).await?),
      None => None,
    };
    info.correlation_id = Some(Uuid::new_v4());
    let uploaded = info.image.as_deref();

    let primary = match self.primary.insert(&info).await {
      Ok(record) => record,
      Err(e) => {
        self.discard_image(uploaded).await;
        return Err(Error::store(StoreSide::Primary, e));
      }
    };

    let secondary = match self.secondary.insert(&info).await {
      Ok(record) => record,
      Err(e) => {
        warn!(primary_id = primary.id, error = %e, "secondary insert failed after primary commit");
        self.discard_image(uploaded).await;
        return Err(Error::partial(Committed::PrimaryOnly(primary), e));
      }
    };

    info!(primary_id = primary.id, secondary_id = %secondary.id, "record created");
    Ok(PersonPair { primary, secondary })
  }

  /// Apply `patch` (and optionally a new image) to both stores.
  ///
  /// The secondary document is resolved from the values *before* the patch,
  /// otherwise a changed name or email would defeat the field fallback. When
  /// no document is found a new one is inserted.
  pub async fn update(
    &self,
    id: i64,
    patch: PersonPatch,
    image: Option<ImageUpload>,
  ) -> Result<PersonPair> {
    let current = self.find_primary(id).await?;
    let correlated = correlate::resolve(&self.secondary, &current)
      .await
      .map_err(|e| Error::store(StoreSide::Secondary, e))?;

    let mut info = current.info.clone();
    info.apply(patch);

    let mut uploaded = None;
    if let Some(upload) = &image {
      // The old image is gone from here on, even if a later step fails.
      if let Some(old) = &current.info.image {
        self.blobs.delete(old).await.map_err(Error::blob)?;
      }
      let key = self.store_image(upload).await?;
      info.image = Some(key.clone());
      uploaded = Some(key);
    }

    // Legacy pairs get a shared key on their first update.
    if info.correlation_id.is_none() {
      info.correlation_id = Some(Uuid::new_v4());
    }

    let primary = match self.primary.update(id, &info).await {
      Ok(record) => record,
      Err(e) => {
        self.discard_image(uploaded.as_deref()).await;
        return Err(Error::store(StoreSide::Primary, e));
      }
    };

    let written = match &correlated {
      Some(doc) => self.secondary.update(&doc.id, &info).await,
      None => {
        info!(primary_id = id, "secondary document missing; inserting");
        self.secondary.insert(&info).await
      }
    };

    match written {
      Ok(secondary) => {
        info!(primary_id = id, secondary_id = %secondary.id, "record updated");
        Ok(PersonPair { primary, secondary })
      }
      Err(e) => {
        warn!(primary_id = id, error = %e, "secondary write failed after primary commit");
        self.discard_image(uploaded.as_deref()).await;
        Err(Error::partial(Committed::PrimaryOnly(primary), e))
      }
    }
  }

  /// Delete the image, the primary row and the correlated document.
  ///
  /// A missing document is not an error. Nothing is restored when a later
  /// step fails.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let primary = self.find_primary(id).await?;
    let correlated = correlate::resolve(&self.secondary, &primary)
      .await
      .map_err(|e| Error::store(StoreSide::Secondary, e))?;

    if let Some(key) = &primary.info.image {
      self.blobs.delete(key).await.map_err(Error::blob)?;
    }

    self
      .primary
      .delete(id)
      .await
      .map_err(|e| Error::store(StoreSide::Primary, e))?;

    match correlated {
      Some(doc) => {
        self
          .secondary
          .delete(&doc.id)
          .await
          .map_err(|e| Error::partial(Committed::PrimaryDeleted(id), e))?;
        info!(primary_id = id, secondary_id = %doc.id, "record deleted");
      }
      None => info!(primary_id = id, "record deleted; no secondary document"),
    }

    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn find_primary(&self, id: i64) -> Result<PrimaryRecord> {
    self
      .primary
      .find_by_id(id)
      .await
      .map_err(|e| Error::store(StoreSide::Primary, e))?
      .ok_or(Error::NotFound(id))
  }

  async fn store_image(&self, upload: &ImageUpload) -> Result<String> {
    self
      .blobs
      .put(&self.image_folder, upload)
      .await
      .map_err(Error::blob)
  }

  /// Remove an image whose owning write did not complete. Failures are only
  /// logged; the caller is already reporting the original error.
  async fn discard_image(&self, key: Option<&str>) {
    let Some(key) = key else { return };
    if let Err(e) = self.blobs.delete(key).await {
      warn!(key, error = %e, "failed to delete orphaned image");
    }
  }
}
