//! # Syntax tree for the JavaScript expression subset
//!
//! This module defines the syntax tree produced by the bundled parser and
//! consumed by the [transformer](crate::transform). Node names follow the
//! usual JavaScript tooling vocabulary (`BinaryExpression`, `IfStatement`,
//! ...) so that error messages read naturally to rule authors.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, access, operations, functions)
//! - **[operators]** - Binary, logical and unary operators
//! - **[statements]** - Statement nodes (`if` chains, blocks, and the kinds we reject)
//! - **[program]** - The top-level program
//!
//! ## Supported input
//!
//! ```text
//! a > 10 && user.age >= 18
//! if (a > 10) { 'big' } else if (a > 5) { 'medium' } else { 'small' }
//! map(items, x => x * 2)
//! `Hello, ${name}!`
//! ```
//!
//! The parser accepts a little more than the transformer supports (assignments,
//! `**`, `typeof`, declarations, ...). Those constructs parse into real nodes so
//! the transformer can reject them by name instead of reporting a syntax error.
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod statements;
pub mod program;

pub use tokens::{TemplateChunk, Token};
pub use expressions::{ArrowBody, Element, Expr, MemberProperty, Property, PropertyKey};
pub use operators::{BinOp, LogicalOp, UnaryOp};
pub use statements::{DeclarationKind, Statement};
pub use program::Program;
