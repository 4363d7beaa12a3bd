//! Serialization of rules to JSON text.
//!
//! Rules are [`serde_json::Value`]s, so printing is delegated to `serde_json`.
//! Output is deterministic: object keys come out sorted, and the same source
//! always yields byte-identical text.
//!
//! # Examples
//!
//! ```
//! use js_to_json_logic::output::{to_json, to_json_pretty};
//! use serde_json::json;
//!
//! let rule = json!({">": [{"var": "a"}, 3]});
//!
//! assert_eq!(to_json(&rule), r#"{">":[{"var":"a"},3]}"#);
//! assert!(to_json_pretty(&rule).starts_with("{\n  \">\": ["));
//! ```

use serde_json::Value;

/// Compact or indented rule printer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, rule: &Value) -> String {
        if self.pretty {
            // Two-space indentation, one element per line
            format!("{:#}", rule)
        } else {
            rule.to_string()
        }
    }
}

/// Converts a rule to compact JSON with no extra whitespace.
pub fn to_json(rule: &Value) -> String {
    JsonPrinter::new(false).print(rule)
}

/// Converts a rule to pretty-printed JSON with 2-space indentation.
///
/// ```
/// use js_to_json_logic::output::to_json_pretty;
/// use serde_json::json;
///
/// let rule = json!({"var": "user.name"});
/// assert_eq!(to_json_pretty(&rule), "{\n  \"var\": \"user.name\"\n}");
/// ```
pub fn to_json_pretty(rule: &Value) -> String {
    JsonPrinter::new(true).print(rule)
}
