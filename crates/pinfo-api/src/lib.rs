//! JSON REST API for personal information records.
//!
//! Exposes axum [`Router`]s backed by a [`Synchronizer`] over any set of
//! stores, plus static serving of uploaded images. TLS and auth are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = pinfo_api::app(Arc::new(sync), "storage", 4 * 1024 * 1024);
//! ```

pub mod error;
pub mod form;
pub mod records;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::{Method, header},
  routing::get,
};
use pinfo_core::{
  store::{BlobStore, PrimaryStore, SecondaryStore},
  sync::Synchronizer,
};
use tower_http::{
  cors::{Any, CorsLayer},
  services::ServeDir,
  trace::TraceLayer,
};

pub use error::ApiError;

/// Build the record API router. Nest it under `/api`.
pub fn api_router<P, S, B>(sync: Arc<Synchronizer<P, S, B>>) -> Router<()>
where
  P: PrimaryStore + 'static,
  S: SecondaryStore + 'static,
  B: BlobStore + 'static,
{
  Router::new()
    .route(
      "/personal-information",
      get(records::list::<P, S, B>).post(records::create::<P, S, B>),
    )
    .route(
      "/personal-information/{id}",
      get(records::get_one::<P, S, B>)
        .put(records::update::<P, S, B>)
        .patch(records::update::<P, S, B>)
        .delete(records::delete::<P, S, B>),
    )
    .with_state(sync)
}

/// Serve files below `blob_root` at `/storage/<key>`, readable from any
/// origin.
pub fn storage_router(blob_root: impl Into<PathBuf>) -> Router<()> {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers([header::CONTENT_TYPE]);

  Router::new()
    .nest_service("/storage", ServeDir::new(blob_root.into()))
    .layer(cors)
}

/// The complete application: the API under `/api`, stored images under
/// `/storage`, a request body limit and request tracing.
pub fn app<P, S, B>(
  sync: Arc<Synchronizer<P, S, B>>,
  blob_root: impl Into<PathBuf>,
  max_body_bytes: usize,
) -> Router<()>
where
  P: PrimaryStore + 'static,
  S: SecondaryStore + 'static,
  B: BlobStore + 'static,
{
  Router::new()
    .nest("/api", api_router(sync))
    .merge(storage_router(blob_root))
    .layer(DefaultBodyLimit::max(max_body_bytes))
    .layer(TraceLayer::new_for_http())
}
