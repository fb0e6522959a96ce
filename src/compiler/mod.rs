//! Filter compilation
//!
//! Splits each filter between the content store and the in-memory
//! interpreter:
//!
//! 1. Classify the property a comparison touches ([`resolve_property`])
//! 2. Try to push the whole expression down ([`compile_expression`])
//! 3. Recursively combine `and`/`or`/`not` groups ([`compile_filter`])
//!
//! # Invariant
//!
//! Applying the store predicate and then the residual must yield exactly
//! the same entry set as interpreting the original filter against every
//! entry. Any uncertainty biases toward the residual (interpreted) path,
//! never toward dropping a sub-expression.

mod combinator;
mod property;
mod pushdown;

pub use combinator::{compile_filter, CompiledFilter, Residual};
pub use property::{resolve_property, ComputedField, FieldInfo};
pub use pushdown::{compile_expression, CompileResult};
