use crate::ast::{BinOp, LogicalOp, Statement, UnaryOp};

/// Syntax tree node for an expression.
///
/// The parser produces these nodes; the transformer walks them read-only.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Numeric literal, raw source text
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0xFF00FF
    /// 1_000.5e-3
    /// ```
    Number(String),

    /// String literal, escapes resolved
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// `null`
    Null,

    /// Template literal
    ///
    /// `quasis` always holds one more entry than `expressions`; static text and
    /// interpolations alternate starting with `quasis[0]`.
    ///
    /// # Example
    /// ```text
    /// `Hello, ${name}!`   // quasis: ["Hello, ", "!"], expressions: [name]
    /// ```
    Template {
        quasis: Vec<String>,
        expressions: Vec<Expr>,
    },

    /// Regular expression literal
    ///
    /// # Example
    /// ```text
    /// /ab+c/gi
    /// ```
    Regex { pattern: String, flags: String },

    // References
    /// Free identifier
    Identifier(String),

    /// Property access
    ///
    /// # Examples
    /// ```text
    /// user.name
    /// items[0]
    /// ```
    Member {
        object: Box<Expr>,
        property: MemberProperty,
    },

    // Collections
    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, ...rest, 4]
    /// ```
    Array(Vec<Element>),

    /// Object literal
    ///
    /// # Example
    /// ```text
    /// ({"name": "Alice", age: 30})
    /// ```
    Object(Vec<Property>),

    // Operations
    /// Arithmetic, comparison or relational operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `&&`, `||` or `??`
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Prefix operation
    Unary { op: UnaryOp, argument: Box<Expr> },

    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// Function call
    ///
    /// # Examples
    /// ```text
    /// max(a, b)
    /// map(items, x => x * 2)
    /// ```
    Call {
        callee: Box<Expr>,
        arguments: Vec<Element>,
    },

    /// Arrow function
    ///
    /// # Examples
    /// ```text
    /// (a, b) => a + b
    /// x => { return x * 2 }
    /// ```
    Arrow { params: Vec<String>, body: ArrowBody },

    /// Comma operator, `(a, b)`
    Sequence(Vec<Expr>),

    /// Assignment, `a = b`
    Assignment { target: Box<Expr>, value: Box<Expr> },
}

impl Expr {
    /// Node kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Number(_) => "NumericLiteral",
            Expr::String(_) => "StringLiteral",
            Expr::Boolean(_) => "BooleanLiteral",
            Expr::Null => "NullLiteral",
            Expr::Template { .. } => "TemplateLiteral",
            Expr::Regex { .. } => "RegExpLiteral",
            Expr::Identifier(_) => "Identifier",
            Expr::Member { .. } => "MemberExpression",
            Expr::Array(_) => "ArrayExpression",
            Expr::Object(_) => "ObjectExpression",
            Expr::Binary { .. } => "BinaryExpression",
            Expr::Logical { .. } => "LogicalExpression",
            Expr::Unary { .. } => "UnaryExpression",
            Expr::Conditional { .. } => "ConditionalExpression",
            Expr::Call { .. } => "CallExpression",
            Expr::Arrow { .. } => "ArrowFunctionExpression",
            Expr::Sequence(_) => "SequenceExpression",
            Expr::Assignment { .. } => "AssignmentExpression",
        }
    }
}

/// Right-hand side of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `object.name`
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

/// Entry of an array literal or a call's argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Expr(Expr),
    /// `...expr`
    Spread(Expr),
    /// Elided slot, as in `[1, , 3]`
    Hole,
}

/// Entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `key: value`, or shorthand `key` (value is then the identifier itself)
    KeyValue { key: PropertyKey, value: Expr },
    /// `...expr`
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// `name: ...`
    Identifier(String),
    /// `"name": ...`
    String(String),
    /// `1: ...`, raw source text
    Number(String),
    /// `[expr]: ...`
    Computed(Box<Expr>),
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `x => x * 2`
    Expr(Box<Expr>),
    /// `x => { return x * 2 }`
    Block(Vec<Statement>),
}
