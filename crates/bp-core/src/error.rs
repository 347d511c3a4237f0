//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into `BpError`
//! via `From` impls, or keep them separate and wrap `BpError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::ModuleHandle;

/// The top-level error type for `bp-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum BpError {
    #[error("module {0} not found or no longer live")]
    ModuleNotFound(ModuleHandle),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `bp-*` crates.
pub type BpResult<T> = Result<T, BpError>;
