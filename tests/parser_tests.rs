// tests/parser_tests.rs

use js_to_json_logic::ast::{
    ArrowBody, BinOp, DeclarationKind, Element, Expr, LogicalOp, MemberProperty, Property,
    PropertyKey, Statement, UnaryOp,
};
use js_to_json_logic::lexer::{Lexer, Position};
use js_to_json_logic::parser::{ParseError, Parser};
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Expr {
    Parser::new(Lexer::new(input)).unwrap().parse().unwrap()
}

fn parse_err(input: &str) -> ParseError {
    match Parser::new(Lexer::new(input)) {
        Ok(mut parser) => parser.parse_program().unwrap_err(),
        Err(e) => e,
    }
}

fn program(input: &str) -> Vec<Statement> {
    Parser::new(Lexer::new(input))
        .unwrap()
        .parse_program()
        .unwrap()
        .body
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn num(raw: &str) -> Expr {
    Expr::Number(raw.to_string())
}

fn string(s: &str) -> Expr {
    Expr::String(s.to_string())
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn member(object: Expr, name: &str) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: MemberProperty::Named(name.to_string()),
    }
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(
        parse("a + b * 2"),
        binary(
            BinOp::Add,
            ident("a"),
            binary(BinOp::Multiply, ident("b"), num("2"))
        )
    );
}

#[test]
fn test_left_associative_subtraction() {
    assert_eq!(
        parse("a - b - c"),
        binary(
            BinOp::Subtract,
            binary(BinOp::Subtract, ident("a"), ident("b")),
            ident("c")
        )
    );
}

#[test]
fn test_exponent_is_right_associative() {
    assert_eq!(
        parse("a ** b ** c"),
        binary(
            BinOp::Exponent,
            ident("a"),
            binary(BinOp::Exponent, ident("b"), ident("c"))
        )
    );
}

#[test]
fn test_parentheses() {
    assert_eq!(
        parse("(a + b) * 2"),
        binary(
            BinOp::Multiply,
            binary(BinOp::Add, ident("a"), ident("b")),
            num("2")
        )
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse("a || b && c"),
        logical(
            LogicalOp::Or,
            ident("a"),
            logical(LogicalOp::And, ident("b"), ident("c"))
        )
    );
}

#[test]
fn test_comparison_below_arithmetic() {
    assert_eq!(
        parse("a + 1 > b"),
        binary(
            BinOp::GreaterThan,
            binary(BinOp::Add, ident("a"), num("1")),
            ident("b")
        )
    );
}

#[test]
fn test_equality_below_relational() {
    assert_eq!(
        parse("a < b === true"),
        binary(
            BinOp::StrictEqual,
            binary(BinOp::LessThan, ident("a"), ident("b")),
            Expr::Boolean(true)
        )
    );
}

#[test]
fn test_nested_unary() {
    assert_eq!(
        parse("!!a"),
        Expr::Unary {
            op: UnaryOp::Not,
            argument: Box::new(Expr::Unary {
                op: UnaryOp::Not,
                argument: Box::new(ident("a")),
            }),
        }
    );
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(
        parse("a ? b : c ? d : e"),
        Expr::Conditional {
            test: Box::new(ident("a")),
            consequent: Box::new(ident("b")),
            alternate: Box::new(Expr::Conditional {
                test: Box::new(ident("c")),
                consequent: Box::new(ident("d")),
                alternate: Box::new(ident("e")),
            }),
        }
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_parse_scalars() {
    assert_eq!(parse("42"), num("42"));
    assert_eq!(parse("'hi'"), string("hi"));
    assert_eq!(parse("true"), Expr::Boolean(true));
    assert_eq!(parse("false"), Expr::Boolean(false));
    assert_eq!(parse("null"), Expr::Null);
}

#[test]
fn test_parse_regex() {
    assert_eq!(
        parse("/a+/g"),
        Expr::Regex {
            pattern: "a+".to_string(),
            flags: "g".to_string()
        }
    );
}

#[test]
fn test_parse_template() {
    assert_eq!(
        parse("`a${x}b${y + 1}`"),
        Expr::Template {
            quasis: vec!["a".to_string(), "b".to_string(), String::new()],
            expressions: vec![ident("x"), binary(BinOp::Add, ident("y"), num("1"))],
        }
    );
}

#[test]
fn test_template_error_position_points_into_interpolation() {
    let error = parse_err("`abc ${1 +}`");
    assert!(matches!(error, ParseError::UnexpectedToken { .. }));
    assert_eq!(error.position(), Position { line: 1, column: 11 });
}

// ============================================================================
// Arrays and objects
// ============================================================================

#[test]
fn test_parse_array_with_spread_and_hole() {
    assert_eq!(
        parse("[1, ...xs, , 2]"),
        Expr::Array(vec![
            Element::Expr(num("1")),
            Element::Spread(ident("xs")),
            Element::Hole,
            Element::Expr(num("2")),
        ])
    );
}

#[test]
fn test_parse_array_trailing_comma() {
    assert_eq!(parse("[1, 2,]"), Expr::Array(vec![Element::Expr(num("1")), Element::Expr(num("2"))]));
}

#[test]
fn test_parse_object_literal() {
    assert_eq!(
        parse(r#"({"name": "Alice", age: 30, 1: x, [k]: v, short, ...rest, if: 1})"#),
        Expr::Object(vec![
            Property::KeyValue {
                key: PropertyKey::String("name".to_string()),
                value: string("Alice"),
            },
            Property::KeyValue {
                key: PropertyKey::Identifier("age".to_string()),
                value: num("30"),
            },
            Property::KeyValue {
                key: PropertyKey::Number("1".to_string()),
                value: ident("x"),
            },
            Property::KeyValue {
                key: PropertyKey::Computed(Box::new(ident("k"))),
                value: ident("v"),
            },
            Property::KeyValue {
                key: PropertyKey::Identifier("short".to_string()),
                value: ident("short"),
            },
            Property::Spread(ident("rest")),
            Property::KeyValue {
                key: PropertyKey::Identifier("if".to_string()),
                value: num("1"),
            },
        ])
    );
}

#[test]
fn test_parse_empty_object() {
    assert_eq!(parse("({})"), Expr::Object(vec![]));
}

// ============================================================================
// Member access and calls
// ============================================================================

#[test]
fn test_member_chain() {
    assert_eq!(parse("a.b.c"), member(member(ident("a"), "b"), "c"));
}

#[test]
fn test_keyword_as_property_name() {
    assert_eq!(parse("a.if"), member(ident("a"), "if"));
}

#[test]
fn test_computed_member() {
    assert_eq!(
        parse("a[0]"),
        Expr::Member {
            object: Box::new(ident("a")),
            property: MemberProperty::Computed(Box::new(num("0"))),
        }
    );
}

#[test]
fn test_call_with_spread() {
    assert_eq!(
        parse("max(a, ...[1, 2])"),
        Expr::Call {
            callee: Box::new(ident("max")),
            arguments: vec![
                Element::Expr(ident("a")),
                Element::Spread(Expr::Array(vec![
                    Element::Expr(num("1")),
                    Element::Expr(num("2")),
                ])),
            ],
        }
    );
}

// ============================================================================
// Arrow functions
// ============================================================================

#[test]
fn test_single_parameter_arrow() {
    assert_eq!(
        parse("x => x * 2"),
        Expr::Arrow {
            params: vec!["x".to_string()],
            body: ArrowBody::Expr(Box::new(binary(BinOp::Multiply, ident("x"), num("2")))),
        }
    );
}

#[test]
fn test_parenthesized_parameters() {
    assert_eq!(
        parse("(a, b) => a + b"),
        Expr::Arrow {
            params: vec!["a".to_string(), "b".to_string()],
            body: ArrowBody::Expr(Box::new(binary(BinOp::Add, ident("a"), ident("b")))),
        }
    );
}

#[test]
fn test_no_parameter_arrow_with_block_body() {
    assert_eq!(
        parse("() => { return 1; }"),
        Expr::Arrow {
            params: vec![],
            body: ArrowBody::Block(vec![Statement::Return(Some(num("1")))]),
        }
    );
}

#[test]
fn test_arrow_as_call_argument() {
    assert_eq!(
        parse("map(xs, x => x.y)"),
        Expr::Call {
            callee: Box::new(ident("map")),
            arguments: vec![
                Element::Expr(ident("xs")),
                Element::Expr(Expr::Arrow {
                    params: vec!["x".to_string()],
                    body: ArrowBody::Expr(Box::new(member(ident("x"), "y"))),
                }),
            ],
        }
    );
}

#[test]
fn test_invalid_arrow_parameter() {
    assert!(matches!(
        parse_err("(a + 1) => a"),
        ParseError::InvalidArrowParameter { .. }
    ));
}

// ============================================================================
// Sequences and assignment
// ============================================================================

#[test]
fn test_sequence_expression() {
    assert_eq!(parse("a, b"), Expr::Sequence(vec![ident("a"), ident("b")]));
    assert_eq!(parse("(a, b)"), Expr::Sequence(vec![ident("a"), ident("b")]));
}

#[test]
fn test_assignment() {
    assert_eq!(
        parse("a = b = 1"),
        Expr::Assignment {
            target: Box::new(ident("a")),
            value: Box::new(Expr::Assignment {
                target: Box::new(ident("b")),
                value: Box::new(num("1")),
            }),
        }
    );
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_if_else_chain() {
    let body = program("if (a) { 1 } else if (b) { 2 } else { 3 }");
    assert_eq!(
        body,
        vec![Statement::If {
            test: ident("a"),
            consequent: Box::new(Statement::Block(vec![Statement::Expression(num("1"))])),
            alternate: Some(Box::new(Statement::If {
                test: ident("b"),
                consequent: Box::new(Statement::Block(vec![Statement::Expression(num("2"))])),
                alternate: Some(Box::new(Statement::Block(vec![Statement::Expression(
                    num("3")
                )]))),
            })),
        }]
    );
}

#[test]
fn test_if_without_braces_or_else() {
    assert_eq!(
        program("if (a) 'yes';"),
        vec![Statement::If {
            test: ident("a"),
            consequent: Box::new(Statement::Expression(string("yes"))),
            alternate: None,
        }]
    );
}

#[test]
fn test_statements_and_semicolons() {
    assert_eq!(
        program("const x = 1; x;;"),
        vec![
            Statement::VariableDeclaration {
                kind: DeclarationKind::Const,
                name: "x".to_string(),
                init: Some(num("1")),
            },
            Statement::Expression(ident("x")),
            Statement::Empty,
        ]
    );
}

#[test]
fn test_empty_program() {
    assert_eq!(program("  // nothing\n"), vec![]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_incomplete_expression() {
    let error = parse_err("a +");
    assert_eq!(
        error,
        ParseError::UnexpectedToken {
            expected: "an expression".to_string(),
            found: "end of input".to_string(),
            position: Position { line: 1, column: 4 },
        }
    );
}

#[test]
fn test_unclosed_paren() {
    assert!(matches!(parse_err("(a + b"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_unclosed_block() {
    assert!(matches!(parse_err("if (a) { 1"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_lexer_errors_surface() {
    assert!(matches!(parse_err("'abc"), ParseError::Lex(_)));
}

#[test]
fn test_trailing_tokens_rejected_by_parse() {
    let mut parser = Parser::new(Lexer::new("a b")).unwrap();
    assert!(parser.parse().is_err());
}

// ============================================================================
// Depth limits
// ============================================================================

#[test]
fn test_depth_limit() {
    let source = format!("{}a{}", "(".repeat(20), ")".repeat(20));
    let mut parser = Parser::new(Lexer::new(&source)).unwrap().with_max_depth(10);
    assert!(matches!(parser.parse(), Err(ParseError::TooDeep { max_depth: 10, .. })));
}

#[test]
fn test_deep_input_does_not_overflow() {
    let source = format!("{}a", "!".repeat(100_000));
    let mut parser = Parser::new(Lexer::new(&source)).unwrap();
    assert!(matches!(parser.parse(), Err(ParseError::TooDeep { .. })));
}

#[test]
fn test_long_operator_chain_is_limited() {
    for op in ["+", "*", "&&", "||", "==", "<"] {
        let source = vec!["a"; 200_000].join(op);
        let mut parser = Parser::new(Lexer::new(&source)).unwrap();
        assert!(
            matches!(parser.parse(), Err(ParseError::TooDeep { max_depth: 128, .. })),
            "chain of {}",
            op
        );
    }
}

#[test]
fn test_long_postfix_chain_is_limited() {
    let members = format!("a{}", ".b".repeat(200_000));
    let calls = format!("f{}", "()".repeat(200_000));
    let indexes = format!("a{}", "[0]".repeat(200_000));

    for source in [members, calls, indexes] {
        let mut parser = Parser::new(Lexer::new(&source)).unwrap();
        assert!(matches!(parser.parse(), Err(ParseError::TooDeep { .. })));
    }
}

#[test]
fn test_chain_within_limit() {
    let source = vec!["a"; 100].join(" + ");
    let mut parser = Parser::new(Lexer::new(&source)).unwrap();
    assert!(parser.parse().is_ok());
}
