//! Document backend for the secondary store.
//!
//! Records are kept as schemaless JSON documents grouped into named
//! collections inside a SQLite file of their own, separate from the primary
//! store. Each document gets an independently generated string id. Deleting
//! a document only marks it deleted; marked documents are invisible to every
//! read.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{DocumentStore, PERSONAL_INFORMATIONS};
