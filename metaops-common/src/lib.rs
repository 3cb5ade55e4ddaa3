//! # metaops common library
//!
//! Shared code for the metaops crates:
//! - Error and result types
//! - Configuration loading (TOML + environment)
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
