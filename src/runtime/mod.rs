//! Runtime Evaluator
//!
//! Interprets any expression AST against a single entry's in-memory
//! representation. Used for every filter the push-down compiler reports
//! as not representable.
//!
//! # Error scope
//!
//! Evaluation failures (calling a non-callable, an unparsable date) are
//! scoped to the entry being tested: [`entry_matches`] maps them to
//! "does not match" and the query continues with the remaining entries.

mod env;
mod errors;
mod eval;
mod globals;
mod methods;
mod value;

pub use env::EvalEnv;
pub use errors::{EvalError, EvalResult};
pub use eval::evaluate;
pub use value::{Callable, NativeFn, Value};

use crate::expr::ExprNode;
use crate::store::Entry;

/// Interprets a filter expression as a predicate over one entry.
///
/// A falsy result or an evaluation error both exclude the entry.
pub fn entry_matches(ast: &ExprNode, entry: &Entry, root_dir: Option<&str>) -> bool {
    let env = EvalEnv::new(entry, root_dir);
    match evaluate(ast, &env) {
        Ok(value) => value.is_truthy(),
        Err(error) => {
            tracing::debug!(path = %entry.path, %error, "entry excluded by evaluation error");
            false
        }
    }
}
