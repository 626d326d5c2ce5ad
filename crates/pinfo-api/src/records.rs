//! Handlers for `/personal-information` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/personal-information` | Optional `?direction=asc\|desc` |
//! | `POST` | `/personal-information` | JSON or multipart; all fields required |
//! | `GET`  | `/personal-information/{id}` | 404 if not found |
//! | `PUT`/`PATCH` | `/personal-information/{id}` | Fields optional |
//! | `DELETE` | `/personal-information/{id}` | Removes image, row and document |

use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequestParts, Path, Query, State},
  http::{StatusCode, request::Parts},
  response::IntoResponse,
};
use pinfo_core::{
  person::SortDirection,
  store::{BlobStore, PrimaryStore, SecondaryStore},
  sync::{Listing, ResolvedPerson, Synchronizer},
  validate,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, form::PersonForm};

type SyncState<P, S, B> = State<Arc<Synchronizer<P, S, B>>>;

/// The `{id}` path segment. An unparsable id is a JSON 400 like every other
/// error.
pub struct RecordId(pub i64);

impl<St> FromRequestParts<St> for RecordId
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
    let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
    Ok(Self(id))
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub direction: Option<String>,
}

/// `GET /personal-information[?direction=asc|desc]`
pub async fn list<P, S, B>(
  State(sync): SyncState<P, S, B>,
  Query(params): Query<ListParams>,
) -> Result<Json<Listing>, ApiError>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  let direction = match params.direction.as_deref() {
    Some(raw) => raw
      .parse::<SortDirection>()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    None => SortDirection::default(),
  };

  let listing = sync
    .list(direction)
    .await
    .map_err(ApiError::sync("Error fetching records"))?;
  Ok(Json(listing))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /personal-information`
pub async fn create<P, S, B>(
  State(sync): SyncState<P, S, B>,
  form: PersonForm,
) -> Result<impl IntoResponse, ApiError>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  let (info, image) = validate::create(form.input, form.image)?;

  let pair = sync
    .create(info, image)
    .await
    .map_err(ApiError::sync("Error creating record"))?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "message": "Record created successfully",
      "primary": pair.primary,
      "secondary": pair.secondary,
    })),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /personal-information/{id}`
pub async fn get_one<P, S, B>(
  State(sync): SyncState<P, S, B>,
  RecordId(id): RecordId,
) -> Result<Json<ResolvedPerson>, ApiError>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  let resolved = sync
    .get(id)
    .await
    .map_err(ApiError::sync("Error fetching record"))?;
  Ok(Json(resolved))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT|PATCH /personal-information/{id}`
pub async fn update<P, S, B>(
  State(sync): SyncState<P, S, B>,
  RecordId(id): RecordId,
  form: PersonForm,
) -> Result<Json<serde_json::Value>, ApiError>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  let (patch, image) = validate::update(form.input, form.image)?;

  let pair = sync
    .update(id, patch, image)
    .await
    .map_err(ApiError::sync("Error updating record"))?;

  Ok(Json(json!({
    "message": "Record updated successfully",
    "primary": pair.primary,
    "secondary": pair.secondary,
  })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /personal-information/{id}`
pub async fn delete<P, S, B>(
  State(sync): SyncState<P, S, B>,
  RecordId(id): RecordId,
) -> Result<Json<serde_json::Value>, ApiError>
where
  P: PrimaryStore,
  S: SecondaryStore,
  B: BlobStore,
{
  sync
    .delete(id)
    .await
    .map_err(ApiError::sync("Error deleting record"))?;
  Ok(Json(json!({ "message": "Record deleted successfully" })))
}
