use crate::ast::Expr;

/// Statement node.
///
/// Only expression statements, `if` chains and blocks can be transformed; the
/// remaining kinds exist so they can be rejected by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression followed by an optional `;`
    Expression(Expr),

    /// `if (test) consequent else alternate`
    ///
    /// # Example
    /// ```text
    /// if (a > 10) { 'big' } else if (a > 5) { 'medium' } else { 'small' }
    /// ```
    If {
        test: Expr,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },

    /// `{ ... }`
    Block(Vec<Statement>),

    /// `return expr`
    Return(Option<Expr>),

    /// `let x = expr`, `const x = expr`, `var x = expr`
    VariableDeclaration {
        kind: DeclarationKind,
        name: String,
        init: Option<Expr>,
    },

    /// Lone `;`
    Empty,
}

impl Statement {
    /// Node kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Expression(_) => "ExpressionStatement",
            Statement::If { .. } => "IfStatement",
            Statement::Block(_) => "BlockStatement",
            Statement::Return(_) => "ReturnStatement",
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::Empty => "EmptyStatement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
}
