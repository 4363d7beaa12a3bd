use crate::ast::Statement;

/// Parsed source text.
///
/// The transformer accepts programs with exactly one meaningful statement;
/// the parser keeps everything it read so that the transformer can say why
/// a program was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements, in source order
    pub body: Vec<Statement>,
}

impl Program {
    pub fn new(body: Vec<Statement>) -> Self {
        Program { body }
    }

    /// Convenience for a program made of one expression statement.
    pub fn expression(expr: crate::ast::Expr) -> Self {
        Program {
            body: vec![Statement::Expression(expr)],
        }
    }
}
