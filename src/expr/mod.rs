//! Filter expression language
//!
//! Tokenizes and parses one filter expression string (e.g.
//! `file.ext == "md" && price > 10`) into an immutable AST.
//!
//! # Supported syntax
//!
//! - String/number/boolean/null literals
//! - Bare identifiers (metadata lookups) and dotted member chains
//! - Call expressions with zero or more arguments
//! - Unary `!` and numeric negation `-`
//! - Comparisons `== != > < >= <=`, arithmetic `+ - * / %`
//! - Logical `&&` and `||`
//!
//! A syntactically invalid expression fails with a [`ParseError`] carrying
//! the offending substring; callers surface this as a renderable inline
//! error, never a fatal condition.

mod ast;
mod errors;
mod lexer;
mod parser;

pub use ast::{BinaryOp, ExprNode, Literal, LogicalOp, UnaryOp};
pub use errors::{ParseError, ParseResult};
pub use parser::parse_expression;
