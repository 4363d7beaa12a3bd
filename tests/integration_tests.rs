mod support;

use js_to_json_logic::{TransformError, transform_js};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use support::{apply, init_logger};

fn convert(source: &str) -> Value {
    init_logger();
    transform_js(source).unwrap_or_else(|e| panic!("failed to convert {:?}: {}", source, e))
}

fn eval(source: &str, data: Value) -> Value {
    apply(&convert(source), &data)
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_boolean_literals() {
    assert_eq!(convert("true"), json!(true));
    assert_eq!(convert("false"), json!(false));
}

#[test]
fn test_null_literal() {
    assert_eq!(convert("null"), Value::Null);
}

#[test]
fn test_string_literal() {
    assert_eq!(convert(r#""Hello, world!""#), json!("Hello, world!"));
    assert_eq!(convert("'single'"), json!("single"));
}

#[test]
fn test_template_literal() {
    assert_eq!(
        eval("`Hello, ${name}!`", json!({"name": "Alice"})),
        json!("Hello, Alice!")
    );
}

#[test]
fn test_numeric_literals() {
    assert_eq!(convert("42"), json!(42));
    assert_eq!(convert("3.14"), json!(3.14));
    assert_eq!(convert("-10292.64"), json!(-10292.64));
    assert_eq!(convert("0b01011010"), json!(90));
    assert_eq!(convert("0xFF00FF"), json!(16711935));
}

#[test]
fn test_regex_literal() {
    assert_eq!(convert("/abc/i"), json!(["abc", "i"]));
}

// ============================================================================
// Objects and arrays
// ============================================================================

#[test]
fn test_object_expression() {
    assert_eq!(
        convert(r#"({"name": "Alice", "age": 30})"#),
        json!({"name": "Alice", "age": 30})
    );
}

#[test]
fn test_array_expression() {
    assert_eq!(convert("[1, 2, 3]"), json!([1, 2, 3]));
}

#[test]
fn test_array_expression_with_spread() {
    assert_eq!(
        eval("[1, ...myArr, 4]", json!({"myArr": [2, 3]})),
        json!([1, 2, 3, 4])
    );
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(convert("a"), json!({"var": "a"}));
    assert_eq!(convert("a.b.c"), json!({"var": "a.b.c"}));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_comparison_operators() {
    for op in ["<", "<=", ">", ">=", "==", "!=", "===", "!=="] {
        assert_eq!(
            convert(&format!("a {} 10", op)),
            json!({op: [{"var": "a"}, 10]}),
            "operator {}",
            op
        );
    }
}

#[test]
fn test_arithmetic_operators() {
    for op in ["+", "-", "*", "/", "%"] {
        assert_eq!(
            convert(&format!("a {} 10", op)),
            json!({op: [{"var": "a"}, 10]}),
            "operator {}",
            op
        );
    }
}

#[test]
fn test_simple_equality() {
    assert_eq!(eval("a == 1", json!({"a": 1})), json!(true));
}

#[test]
fn test_unary_operators() {
    assert_eq!(convert("!a"), json!({"!": [{"var": "a"}]}));
    assert_eq!(convert("!!a"), json!({"!": [{"!": [{"var": "a"}]}]}));
    assert_eq!(convert("-a"), json!({"-": [{"var": "a"}]}));
    assert_eq!(convert("+a"), json!({"+": [{"var": "a"}]}));
}

#[test]
fn test_logical_operators() {
    assert_eq!(convert("a && b"), json!({"and": [{"var": "a"}, {"var": "b"}]}));
    assert_eq!(convert("a || b"), json!({"or": [{"var": "a"}, {"var": "b"}]}));
}

#[test]
fn test_complex_logical_expression() {
    let rule = convert("(a > 10 && b < 5) || c == 'hello'");
    assert_eq!(
        rule,
        json!({
            "or": [
                {"and": [{">": [{"var": "a"}, 10]}, {"<": [{"var": "b"}, 5]}]},
                {"==": [{"var": "c"}, "hello"]}
            ]
        })
    );
    assert_eq!(apply(&rule, &json!({"a": 15, "b": 3, "c": "moon"})), json!(true));
}

// ============================================================================
// Calls and functions
// ============================================================================

#[test]
fn test_call_expression() {
    assert_eq!(convert("max(a, b)"), json!({"max": [{"var": "a"}, {"var": "b"}]}));
}

#[test]
fn test_call_expression_with_callback() {
    assert_eq!(
        convert("map(arr, x => x * 2)"),
        json!({"map": [{"var": "arr"}, {"*": [{"var": "x"}, 2]}]})
    );
}

#[test]
fn test_arrow_function() {
    assert_eq!(convert("(a, b) => a + b"), json!({"+": [{"var": "a"}, {"var": "b"}]}));
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_ternary_expression() {
    assert_eq!(
        convert("a > 10 ? 'big' : 'small'"),
        json!({"if": [{">": [{"var": "a"}, 10]}, "big", "small"]})
    );
}

#[test]
fn test_if_statement() {
    let rule = convert("if (a > 10) { 'big' } else if (a > 5) { 'medium' } else { 'small' }");
    assert_eq!(
        rule,
        json!({
            "if": [
                {">": [{"var": "a"}, 10]},
                "big",
                {"if": [{">": [{"var": "a"}, 5]}, "medium", "small"]}
            ]
        })
    );

    assert_eq!(apply(&rule, &json!({"a": 11})), json!("big"));
    assert_eq!(apply(&rule, &json!({"a": 7})), json!("medium"));
    assert_eq!(apply(&rule, &json!({"a": 1})), json!("small"));
}

#[test]
fn test_ternary_and_if_statement_agree() {
    assert_eq!(
        convert("a ? b : c"),
        convert("if (a) { b } else { c }")
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_syntax() {
    init_logger();
    let error = transform_js("a +").unwrap_err();
    assert!(matches!(error, TransformError::Syntax { .. }), "got {:?}", error);
    assert!(error.parser_diagnostic().is_some());
}

#[test]
fn test_unsupported_constructs_fail() {
    init_logger();
    for source in ["a = 1", "a.b()", "a ?? b", "a ** 2", "typeof a", "let x = 1", "a[0]"] {
        assert!(
            matches!(transform_js(source), Err(TransformError::Unsupported { .. })),
            "{} should be unsupported",
            source
        );
    }
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_conversion_is_deterministic() {
    let source = "if (a.b > 1) { `x${c}` } else { [1, ...d] }";
    assert_eq!(convert(source), convert(source));
    assert_eq!(
        js_to_json_logic::to_json(&convert(source)),
        js_to_json_logic::to_json(&convert(source))
    );
}

#[test]
fn test_smoke() {
    let rule = convert("a > 3 && b < 5");
    assert_eq!(apply(&rule, &json!({"a": 4, "b": 1})), json!(true));
    assert_eq!(apply(&rule, &json!({"a": 2, "b": 1})), json!(false));
}
