//! Filesystem blob store for uploaded images.
//!
//! Blobs live under a single root directory. A key is the blob's path
//! relative to that root, `<folder>/<uuid>.<ext>`, which is also the path the
//! HTTP layer serves it under.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsBlobStore;
