pub mod ast;
pub mod cli;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod transform;

pub use ast::{Expr, Program, Statement, Token};
pub use error::{TransformError, TransformResult};
pub use lexer::{LexError, Lexer, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{JsParser, ParseError, Parser};
pub use transform::{SourceParser, TransformOptions, Transformer};

/// Convert `source` into a JSON Logic rule with the default options.
///
/// ```
/// use js_to_json_logic::transform_js;
/// use serde_json::json;
///
/// assert_eq!(transform_js("a.b.c").unwrap(), json!({"var": "a.b.c"}));
/// ```
pub fn transform_js(source: &str) -> TransformResult<serde_json::Value> {
    Transformer::new().transform(source)
}
