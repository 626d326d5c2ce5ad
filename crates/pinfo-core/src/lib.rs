//! Core types and trait definitions for pinfo.
//!
//! A personal-information record lives twice: once in a relational primary
//! store and once in a document secondary store. This crate owns the record
//! types, the store traits, the correlation policy between the two stores,
//! the input validation rules, and the [`sync::Synchronizer`] that applies
//! every operation to both sides.
//!
//! This crate is deliberately free of HTTP and database dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod correlate;
pub mod error;
pub mod image;
pub mod person;
pub mod store;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
