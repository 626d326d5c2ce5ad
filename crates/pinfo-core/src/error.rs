//! Error types for `pinfo-core`.
//!
//! The two-store write is not atomic. When the primary store committed and the
//! secondary store then failed, the error says so explicitly through
//! [`Error::PartialWrite`] and carries what was committed, so the caller can
//! decide between retrying, repairing by hand, or accepting the drift.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::person::PrimaryRecord;

/// Adapter errors are boxed so the synchronizer stays independent of any
/// backend's concrete error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which of the two record stores an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreSide {
  Primary,
  Secondary,
}

impl fmt::Display for StoreSide {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Primary => f.write_str("primary"),
      Self::Secondary => f.write_str("secondary"),
    }
  }
}

/// What had already been applied to the primary store when the secondary
/// store failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Committed {
  /// The primary row was inserted or updated to this state.
  PrimaryOnly(PrimaryRecord),
  /// The primary row with this id was deleted.
  PrimaryDeleted(i64),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("personal information {0} not found")]
  NotFound(i64),

  /// Nothing was committed to the other store by this operation.
  #[error("{side} store error: {source}")]
  Store {
    side:   StoreSide,
    #[source]
    source: BoxError,
  },

  /// The primary store committed; the secondary store did not. No rollback
  /// was attempted.
  #[error("primary store committed but secondary store failed: {source}")]
  PartialWrite {
    committed: Box<Committed>,
    #[source]
    source:    BoxError,
  },

  #[error("blob store error: {0}")]
  Blob(#[source] BoxError),
}

impl Error {
  pub(crate) fn store<E>(side: StoreSide, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store { side, source: Box::new(e) }
  }

  pub(crate) fn partial<E>(committed: Committed, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::PartialWrite {
      committed: Box::new(committed),
      source:    Box::new(e),
    }
  }

  pub(crate) fn blob<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Blob(Box::new(e))
  }

  /// The store that failed, if the failure came from a record store.
  pub fn failed_store(&self) -> Option<StoreSide> {
    match self {
      Self::Store { side, .. } => Some(*side),
      Self::PartialWrite { .. } => Some(StoreSide::Secondary),
      Self::NotFound(_) | Self::Blob(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
