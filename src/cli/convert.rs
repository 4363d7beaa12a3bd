//! Convert expressions into printed rules

use super::{CliError, require_source};
use crate::{TransformOptions, Transformer, output::JsonPrinter};

/// Options for the convert command
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// The expression to convert
    pub source: String,
    /// Pretty-print the output
    pub pretty: bool,
    /// Deepest nesting accepted
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            source: String::new(),
            pretty: false,
            max_depth: TransformOptions::default().max_depth,
        }
    }
}

/// Convert the source and render the rule as JSON text.
pub fn execute_convert(options: &ConvertOptions) -> Result<String, CliError> {
    let source = require_source(&options.source)?;

    let rule = Transformer::with_options(TransformOptions {
        max_depth: options.max_depth,
    })
    .transform(source)?;

    Ok(JsonPrinter::new(options.pretty).print(&rule))
}
