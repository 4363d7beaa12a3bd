//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use env_logger::Builder;
use serde_json::Value;

pub fn init_logger() {
    static LOGGER: Once = Once::new();

    LOGGER.call_once(|| {
        let _ = Builder::from_default_env().is_test(true).try_init();
    });
}

/// Evaluate `rule` against `data` with a JSON Logic engine.
pub fn apply(rule: &Value, data: &Value) -> Value {
    jsonlogic_rs::apply(rule, data)
        .unwrap_or_else(|e| panic!("failed to evaluate {}: {}", rule, e))
}

/// Numeric results of an evaluation, which the engine may return as floats.
pub fn as_numbers(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .unwrap_or_else(|| panic!("expected an array, got {}", value))
        .iter()
        .map(|item| {
            item.as_f64()
                .unwrap_or_else(|| panic!("expected a number, got {}", item))
        })
        .collect()
}
