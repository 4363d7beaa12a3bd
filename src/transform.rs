//! Conversion of syntax trees into JSON Logic rules.
//!
//! The rule tree is a plain [`serde_json::Value`]: scalars stand for
//! themselves, arrays are evaluated element-wise, and every operation is a
//! single-key object `{"operator": [arguments...]}`.
//!
//! | Source | Rule |
//! |---|---|
//! | `a.b.c` | `{"var": "a.b.c"}` |
//! | `a > 10` | `{">": [{"var": "a"}, 10]}` |
//! | `a && b` | `{"and": [{"var": "a"}, {"var": "b"}]}` |
//! | `t ? x : y`, `if (t) { x } else { y }` | `{"if": [t, x, y]}` |
//! | `` `Hi ${name}` `` | `{"cat": ["Hi ", {"var": "name"}]}` |
//! | `[1, ...xs]` | `{"merge": [[1], {"var": "xs"}]}` |
//! | `map(xs, x => x * 2)` | `{"map": [{"var": "xs"}, {"*": [{"var": "x"}, 2]}]}` |
//! | `/ab+c/i` | `["ab+c", "i"]` |
//!
//! Arrow functions are replaced by their body. Parameters are not bound
//! anywhere: the evaluator is expected to supply them as data, which is how
//! JSON Logic's `map`, `filter` and `reduce` already scope their argument.

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::{
    ast::{
        ArrowBody, BinOp, Element, Expr, LogicalOp, MemberProperty, Program, Property,
        PropertyKey, Statement, UnaryOp,
    },
    error::{TransformError, TransformResult},
    parser::{DEFAULT_MAX_DEPTH, JsParser},
};

mod literals;

pub use literals::{encode_number, encode_regex};

/// Operator used to join template literal parts.
pub const CONCAT_OPERATOR: &str = "cat";

/// Operator used to splice spread elements into an array.
pub const MERGE_OPERATOR: &str = "merge";

/// Anything that turns source text into a [`Program`].
///
/// Failures are opaque to the transformer: they are wrapped into
/// [`TransformError::Syntax`] with the original error kept as the source.
pub trait SourceParser {
    type Error: std::error::Error + Send + Sync + 'static;

    fn parse(&self, source: &str) -> Result<Program, Self::Error>;
}

/// Limits applied to a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Deepest syntax tree accepted, counted in nested nodes.
    pub max_depth: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Converts source text into JSON Logic rules.
///
/// A transformer holds no state between calls and can be shared freely.
///
/// # Examples
///
/// ```
/// use js_to_json_logic::Transformer;
/// use serde_json::json;
///
/// let rule = Transformer::new().transform("a > 3 && b < 5").unwrap();
/// assert_eq!(
///     rule,
///     json!({"and": [{">": [{"var": "a"}, 3]}, {"<": [{"var": "b"}, 5]}]})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Transformer<P = JsParser> {
    parser: P,
    options: TransformOptions,
}

impl Transformer<JsParser> {
    pub fn new() -> Self {
        Transformer::with_options(TransformOptions::default())
    }

    pub fn with_options(options: TransformOptions) -> Self {
        Transformer {
            parser: JsParser::with_max_depth(options.max_depth),
            options,
        }
    }
}

impl Default for Transformer<JsParser> {
    fn default() -> Self {
        Transformer::new()
    }
}

impl<P: SourceParser> Transformer<P> {
    /// Transformer backed by a custom parser.
    pub fn with_parser(parser: P, options: TransformOptions) -> Self {
        Transformer { parser, options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Parse `source` and convert it into a rule.
    pub fn transform(&self, source: &str) -> TransformResult<Value> {
        debug!("transforming {} bytes of source", source.len());

        let program = self.parser.parse(source).map_err(TransformError::syntax)?;
        let result = self.transform_program(&program);

        if let Err(error) = &result {
            debug!("transform failed: {}", error);
        }
        result
    }

    /// Convert an already parsed program.
    pub fn transform_program(&self, program: &Program) -> TransformResult<Value> {
        NodeTransformer {
            max_depth: self.options.max_depth,
        }
        .program(program)
    }
}

/// Result of transforming the argument of a spread element.
enum Spliced {
    /// Elements known statically, spliced in place
    Items(Vec<Value>),
    /// A rule that evaluates to the array to splice
    Dynamic(Value),
}

/// Run of an array literal in the `merge` encoding.
enum Segment {
    Items(Vec<Value>),
    Dynamic(Value),
}

struct NodeTransformer {
    max_depth: usize,
}

impl NodeTransformer {
    fn program(&self, program: &Program) -> TransformResult<Value> {
        match meaningful(&program.body).as_slice() {
            [statement] => self.statement(statement, 0),
            [] => Err(TransformError::structure("the program contains no expression")),
            many => Err(TransformError::structure(format!(
                "the program contains {} statements, expected a single expression or if statement",
                many.len()
            ))),
        }
    }

    fn enter(&self, depth: usize) -> TransformResult<usize> {
        if depth >= self.max_depth {
            return Err(TransformError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn statement(&self, statement: &Statement, depth: usize) -> TransformResult<Value> {
        let depth = self.enter(depth)?;
        trace!("statement {}", statement.kind());

        match statement {
            Statement::Expression(expr) => self.expr(expr, depth),
            Statement::If {
                test,
                consequent,
                alternate,
            } => {
                let mut args = vec![self.expr(test, depth)?, self.statement(consequent, depth)?];
                if let Some(alternate) = alternate {
                    args.push(self.statement(alternate, depth)?);
                }
                Ok(operation("if", args))
            }
            Statement::Block(body) => match meaningful(body).as_slice() {
                [only] => self.statement(only, depth),
                [] => Err(TransformError::structure(
                    "empty block, a block must contain exactly one expression",
                )),
                many => Err(TransformError::structure(format!(
                    "block contains {} statements, a block must contain exactly one expression",
                    many.len()
                ))),
            },
            Statement::Return(_) | Statement::VariableDeclaration { .. } | Statement::Empty => {
                Err(TransformError::unsupported(statement.kind()))
            }
        }
    }

    fn expr(&self, expr: &Expr, depth: usize) -> TransformResult<Value> {
        let depth = self.enter(depth)?;
        trace!("expression {}", expr.kind());

        match expr {
            Expr::Boolean(value) => Ok(Value::Bool(*value)),
            Expr::Null => Ok(Value::Null),
            Expr::Number(raw) => encode_number(raw),
            Expr::String(value) => Ok(Value::String(value.clone())),
            Expr::Template {
                quasis,
                expressions,
            } => self.template(quasis, expressions, depth),
            Expr::Regex { pattern, flags } => encode_regex(pattern, flags),

            Expr::Identifier(name) => Ok(var(name.clone())),
            Expr::Member { .. } => Ok(var(identifier_path(expr)?)),

            Expr::Array(elements) => self.array(elements, depth),
            Expr::Object(properties) => self.object(properties, depth),

            Expr::Binary { op, left, right } => match op {
                BinOp::Equal
                | BinOp::NotEqual
                | BinOp::StrictEqual
                | BinOp::StrictNotEqual
                | BinOp::LessThan
                | BinOp::LessEqual
                | BinOp::GreaterThan
                | BinOp::GreaterEqual
                | BinOp::Add
                | BinOp::Subtract
                | BinOp::Multiply
                | BinOp::Divide
                | BinOp::Modulo => Ok(operation(
                    op.symbol(),
                    vec![self.expr(left, depth)?, self.expr(right, depth)?],
                )),
                BinOp::Exponent | BinOp::In | BinOp::Instanceof => Err(
                    TransformError::unsupported(format!("binary operator `{}`", op.symbol())),
                ),
            },

            Expr::Logical { op, left, right } => {
                let name = match op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                    LogicalOp::NullishCoalesce => {
                        return Err(TransformError::unsupported("logical operator `??`"));
                    }
                };
                Ok(operation(
                    name,
                    vec![self.expr(left, depth)?, self.expr(right, depth)?],
                ))
            }

            Expr::Unary { op, argument } => self.unary(*op, argument, depth),

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => Ok(operation(
                "if",
                vec![
                    self.expr(test, depth)?,
                    self.expr(consequent, depth)?,
                    self.expr(alternate, depth)?,
                ],
            )),

            Expr::Call { callee, arguments } => self.call(callee, arguments, depth),

            // Parameters are dropped, only the body is encoded
            Expr::Arrow { body, .. } => self.arrow_body(body, depth),

            Expr::Sequence(_) | Expr::Assignment { .. } => {
                Err(TransformError::unsupported(expr.kind()))
            }
        }
    }

    fn unary(&self, op: UnaryOp, argument: &Expr, depth: usize) -> TransformResult<Value> {
        // A sign directly in front of a numeric literal is part of the number
        if let (UnaryOp::Minus | UnaryOp::Plus, Expr::Number(raw)) = (op, argument) {
            return match op {
                UnaryOp::Minus => literals::encode_negated_number(raw),
                _ => encode_number(raw),
            };
        }

        match op {
            UnaryOp::Not | UnaryOp::Minus | UnaryOp::Plus => {
                Ok(operation(op.symbol(), vec![self.expr(argument, depth)?]))
            }
            UnaryOp::Typeof => Err(TransformError::unsupported("unary operator `typeof`")),
        }
    }

    fn template(&self, quasis: &[String], expressions: &[Expr], depth: usize) -> TransformResult<Value> {
        if expressions.is_empty() {
            return Ok(Value::String(quasis.concat()));
        }

        let mut parts = Vec::with_capacity(quasis.len() + expressions.len());
        for index in 0..quasis.len().max(expressions.len()) {
            if let Some(text) = quasis.get(index).filter(|text| !text.is_empty()) {
                parts.push(Value::String(text.clone()));
            }
            if let Some(expr) = expressions.get(index) {
                parts.push(self.expr(expr, depth)?);
            }
        }
        Ok(operation(CONCAT_OPERATOR, parts))
    }

    /// Arrays without dynamic spreads stay plain arrays. Otherwise every run
    /// of ordinary elements becomes one nested array and the whole literal a
    /// `merge`, whose one-level flattening splices exactly the spread values.
    fn array(&self, elements: &[Element], depth: usize) -> TransformResult<Value> {
        let mut segments: Vec<Segment> = Vec::new();

        for element in elements {
            match element {
                Element::Expr(expr) => push_item(&mut segments, self.expr(expr, depth)?),
                Element::Spread(argument) => match self.spread(argument, depth)? {
                    Spliced::Items(values) => {
                        for value in values {
                            push_item(&mut segments, value);
                        }
                    }
                    Spliced::Dynamic(value) => segments.push(Segment::Dynamic(value)),
                },
                Element::Hole => return Err(TransformError::unsupported("array hole")),
            }
        }

        if segments.iter().all(|segment| matches!(segment, Segment::Items(_))) {
            let items = segments
                .into_iter()
                .flat_map(|segment| match segment {
                    Segment::Items(items) => items,
                    Segment::Dynamic(value) => vec![value],
                })
                .collect();
            return Ok(Value::Array(items));
        }

        let args = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Items(items) => Value::Array(items),
                Segment::Dynamic(value) => value,
            })
            .collect();
        Ok(operation(MERGE_OPERATOR, args))
    }

    fn spread(&self, argument: &Expr, depth: usize) -> TransformResult<Spliced> {
        let value = self.expr(argument, depth)?;
        match (argument, value) {
            (Expr::Array(_), Value::Array(items)) => Ok(Spliced::Items(items)),
            (_, value) => Ok(Spliced::Dynamic(value)),
        }
    }

    fn object(&self, properties: &[Property], depth: usize) -> TransformResult<Value> {
        let mut map = Map::new();

        for property in properties {
            match property {
                Property::KeyValue { key, value } => {
                    let key = match key {
                        PropertyKey::Identifier(name) | PropertyKey::String(name) => name.clone(),
                        PropertyKey::Number(raw) => encode_number(raw)?.to_string(),
                        PropertyKey::Computed(_) => {
                            return Err(TransformError::unsupported("computed property key"));
                        }
                    };
                    map.insert(key, self.expr(value, depth)?);
                }
                Property::Spread(_) => return Err(TransformError::unsupported("object spread")),
            }
        }
        Ok(Value::Object(map))
    }

    fn call(&self, callee: &Expr, arguments: &[Element], depth: usize) -> TransformResult<Value> {
        let name = match callee {
            Expr::Identifier(name) => name,
            Expr::Member { .. } => {
                let construct = match identifier_path(callee) {
                    Ok(path) => format!("method call `{}(...)`", path),
                    Err(_) => "computed callee".to_string(),
                };
                return Err(TransformError::unsupported(construct));
            }
            other => {
                return Err(TransformError::unsupported(format!(
                    "call of {}",
                    other.kind()
                )));
            }
        };

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument {
                Element::Expr(expr) => args.push(self.expr(expr, depth)?),
                Element::Spread(expr) => match self.spread(expr, depth)? {
                    Spliced::Items(values) => args.extend(values),
                    Spliced::Dynamic(_) => {
                        return Err(TransformError::unsupported(
                            "spread of a non-literal array in call arguments",
                        ));
                    }
                },
                Element::Hole => return Err(TransformError::unsupported("argument hole")),
            }
        }
        Ok(operation(name, args))
    }

    fn arrow_body(&self, body: &ArrowBody, depth: usize) -> TransformResult<Value> {
        let statements = match body {
            ArrowBody::Expr(expr) => return self.expr(expr, depth),
            ArrowBody::Block(statements) => meaningful(statements),
        };

        match statements.as_slice() {
            [Statement::Return(Some(expr))] | [Statement::Expression(expr)] => {
                self.expr(expr, depth)
            }
            [Statement::Return(None)] => Err(TransformError::structure(
                "arrow function body returns no value",
            )),
            [only] => self.statement(only, depth),
            [] => Err(TransformError::structure("empty arrow function body")),
            many => Err(TransformError::structure(format!(
                "arrow function body contains {} statements, expected a single return",
                many.len()
            ))),
        }
    }
}

/// Statements other than stray `;`.
fn meaningful(statements: &[Statement]) -> Vec<&Statement> {
    statements
        .iter()
        .filter(|statement| !matches!(statement, Statement::Empty))
        .collect()
}

fn push_item(segments: &mut Vec<Segment>, value: Value) {
    match segments.last_mut() {
        Some(Segment::Items(items)) => items.push(value),
        _ => segments.push(Segment::Items(vec![value])),
    }
}

/// Flatten `a.b.c` into `"a.b.c"`. Only dot access on an identifier root is
/// accepted.
fn identifier_path(expr: &Expr) -> TransformResult<String> {
    let mut segments = Vec::new();
    let mut current = expr;

    loop {
        match current {
            Expr::Member { object, property } => {
                match property {
                    MemberProperty::Named(name) => segments.push(name.as_str()),
                    MemberProperty::Computed(_) => {
                        return Err(TransformError::unsupported("computed member access"));
                    }
                }
                current = object;
            }
            Expr::Identifier(name) => {
                segments.push(name.as_str());
                break;
            }
            other => {
                return Err(TransformError::unsupported(format!(
                    "member access on {}",
                    other.kind()
                )));
            }
        }
    }

    segments.reverse();
    Ok(segments.join("."))
}

/// `{"var": path}`
fn var(path: String) -> Value {
    let mut map = Map::new();
    map.insert("var".to_string(), Value::String(path));
    Value::Object(map)
}

/// `{name: [args...]}`
fn operation(name: &str, args: Vec<Value>) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), Value::Array(args));
    Value::Object(map)
}
