//! CLI support for js-to-json-logic
//!
//! Provides programmatic access to the `js2jl` commands so other tools can
//! embed them without spawning a process.

mod check;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{ConvertOptions, execute_convert};

use std::io;

use thiserror::Error;

use crate::{ParseError, TransformError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Conversion error: {0}")]
    Transform(#[from] TransformError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass an expression or pipe one to stdin.")]
    NoInput,
}

/// Reject blank input before it reaches the parser.
fn require_source(source: &str) -> Result<&str, CliError> {
    if source.trim().is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(source)
}
