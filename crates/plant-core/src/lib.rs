//! Core types and utilities for the plant doctor workspace.
//!
//! This crate provides the error type, the shared data model (verdicts,
//! diagnoses, scan reports) and the configuration used by the screen, the
//! diagnoser and both front ends.

pub mod cli;
pub mod config;
pub mod error;
pub mod types;

pub use cli::*;
pub use config::*;
pub use error::{Error, Result};
pub use types::*;

/// Version of the workspace crates
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
}
