//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP response conversion
//! - Configuration structures for the server and the store

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};

#[cfg(feature = "database")]
pub use error::{StoreError, StoreResultExt};
