//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pinfo_core::{error::Error as SyncError, validate::ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// An extractor refused the request; `status` is the one axum chose.
  #[error("request rejected ({status}): {message}")]
  Rejection {
    status:  StatusCode,
    message: String,
  },

  /// A synchronizer failure, with the message shown to the client.
  #[error("{message}: {source}")]
  Sync {
    message: &'static str,
    #[source]
    source:  SyncError,
  },
}

impl ApiError {
  /// Wrap a synchronizer error under `message`, for use with `map_err`.
  pub fn sync(message: &'static str) -> impl FnOnce(SyncError) -> Self {
    move |source| Self::Sync { message, source }
  }
}

macro_rules! from_rejection {
  ($($ty:ty),+ $(,)?) => {
    $(
      impl From<$ty> for ApiError {
        fn from(e: $ty) -> Self {
          Self::Rejection {
            status:  e.status(),
            message: e.body_text(),
          }
        }
      }
    )+
  };
}

from_rejection!(JsonRejection, MultipartRejection, MultipartError, PathRejection);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
          "message": "The given data was invalid.",
          "errors": errors,
        })),
      )
        .into_response(),

      ApiError::BadRequest(m) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Bad request", "error": m })),
      )
        .into_response(),

      ApiError::Rejection { status, message } => (
        status,
        Json(json!({
          "message": status.canonical_reason().unwrap_or("Request rejected"),
          "error": message,
        })),
      )
        .into_response(),

      ApiError::Sync {
        source: source @ SyncError::NotFound(_),
        ..
      } => (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Record not found", "error": source.to_string() })),
      )
        .into_response(),

      ApiError::Sync { message, source } => {
        tracing::error!(error = %source, "{message}");

        let mut body = json!({ "message": message, "error": source.to_string() });
        if let Some(side) = source.failed_store() {
          body["failed_store"] = json!(side);
        }
        if let SyncError::PartialWrite { committed, .. } = &source {
          body["committed"] = json!(committed);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use pinfo_core::{
    error::{Committed, StoreSide},
    validate::{self, PersonInput},
  };

  use super::*;

  async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
    let resp = err.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn validation_is_422_with_field_errors() {
    let errors = validate::create(PersonInput::default(), None).unwrap_err();
    let (status, body) = body_of(errors.into()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The given data was invalid.");
    assert_eq!(body["errors"]["email"][0], "The email field is required.");
  }

  #[tokio::test]
  async fn not_found_is_404() {
    let err = ApiError::sync("Error fetching record")(SyncError::NotFound(9));
    let (status, body) = body_of(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Record not found");
    assert_eq!(body["error"], "personal information 9 not found");
  }

  #[tokio::test]
  async fn partial_write_reports_committed_side() {
    let err = ApiError::sync("Error deleting record")(SyncError::PartialWrite {
      committed: Box::new(Committed::PrimaryDeleted(3)),
      source:    "document store offline".into(),
    });
    let (status, body) = body_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deleting record");
    assert_eq!(body["failed_store"], "secondary");
    assert_eq!(body["committed"]["kind"], "primary_deleted");
    assert_eq!(body["committed"]["value"], 3);
  }

  #[tokio::test]
  async fn store_error_names_the_store() {
    let err = ApiError::sync("Error creating record")(SyncError::Store {
      side:   StoreSide::Primary,
      source: "disk full".into(),
    });
    let (status, body) = body_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["failed_store"], "primary");
    assert!(body.get("committed").is_none());
  }

  #[tokio::test]
  async fn blob_error_has_no_store() {
    let err = ApiError::sync("Error updating record")(SyncError::Blob("read-only".into()));
    let (status, body) = body_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("failed_store").is_none());
    assert_eq!(body["error"], "blob store error: read-only");
  }
}
