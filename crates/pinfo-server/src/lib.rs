//! Runtime configuration for the pinfo server binary.

pub mod config;

pub use config::{ServerConfig, expand_tilde};
