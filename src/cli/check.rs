//! Validate expressions without printing a rule

use log::debug;

use super::{CliError, require_source};
use crate::{Lexer, Parser, TransformOptions, Transformer};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The expression to check
    pub source: String,
    /// Only validate syntax, don't convert
    pub syntax_only: bool,
    /// Deepest nesting accepted
    pub max_depth: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            source: String::new(),
            syntax_only: false,
            max_depth: TransformOptions::default().max_depth,
        }
    }
}

/// Result of a check operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// The source parses
    SyntaxValid,
    /// The source parses and converts into a rule
    Expressible,
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let source = require_source(&options.source)?;

    if options.syntax_only {
        debug!("checking syntax only");
        Parser::new(Lexer::new(source))?
            .with_max_depth(options.max_depth)
            .parse_program()?;
        return Ok(CheckResult::SyntaxValid);
    }

    Transformer::with_options(TransformOptions {
        max_depth: options.max_depth,
    })
    .transform(source)?;
    Ok(CheckResult::Expressible)
}
