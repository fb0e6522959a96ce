//! Push-down compilation of single expressions.
//!
//! Only two expression shapes compile to store predicates: binary
//! comparisons whose left side resolves to a scalar or metadata path and
//! whose right side is a literal, and the two store-cheap calls
//! `file.inFolder(..)` and `file.hasProperty(..)`. Everything else is
//! reported as not representable and handled by the interpreter.

use serde_json::json;

use crate::expr::{BinaryOp, ExprNode, Literal};
use crate::store::{CompareOp, ScalarField, StorePredicate};

use super::property::{resolve_property, FieldInfo};

/// Outcome of attempting to push one expression down to the store
#[derive(Debug, Clone, PartialEq)]
pub enum CompileResult {
    /// Equivalent store predicate found
    Pushed(StorePredicate),
    /// Must be interpreted in memory
    NotRepresentable,
}

impl CompileResult {
    pub fn is_pushed(&self) -> bool {
        matches!(self, CompileResult::Pushed(_))
    }
}

/// Attempts to compile one expression into a store predicate.
pub fn compile_expression(ast: &ExprNode, root_dir: Option<&str>) -> CompileResult {
    if let ExprNode::Binary { op, left, right } = ast {
        if op.is_comparison() {
            return compile_comparison(*op, left, right, root_dir);
        }
    }

    if let ExprNode::Call { callee, args } = ast {
        if is_file_method(callee, "inFolder") {
            if let [folder] = args.as_slice() {
                if let Some(folder) = literal_str(folder) {
                    return CompileResult::Pushed(folder_prefix(folder, root_dir));
                }
            }
        }
        if is_file_method(callee, "hasProperty") {
            if let [name] = args.as_slice() {
                if let Some(name) = literal_str(name) {
                    return CompileResult::Pushed(StorePredicate::MetadataExists(vec![
                        name.to_string(),
                    ]));
                }
            }
        }
    }

    CompileResult::NotRepresentable
}

fn compile_comparison(
    op: BinaryOp,
    left: &ExprNode,
    right: &ExprNode,
    root_dir: Option<&str>,
) -> CompileResult {
    let Some(field) = resolve_property(left) else {
        return CompileResult::NotRepresentable;
    };

    // With a root directory in play, expressions see prefixed paths while
    // the store holds stripped ones; path comparisons stay interpreted so
    // both halves agree on what `file.path` means.
    if field == FieldInfo::Scalar(ScalarField::Path)
        && root_dir.is_some_and(|root| !root.is_empty())
    {
        return CompileResult::NotRepresentable;
    }

    // Null comparisons have presence semantics the store predicate grammar
    // cannot express; they stay on the interpreted path.
    let value = match right.as_literal() {
        Some(Literal::Null) | None => return CompileResult::NotRepresentable,
        Some(lit) => literal_to_json(lit),
    };

    let op = compare_op(op);

    match field {
        FieldInfo::Scalar(scalar) => CompileResult::Pushed(StorePredicate::Scalar {
            field: scalar,
            op,
            value,
        }),
        FieldInfo::MetadataPath(path) => {
            // != compiles as a negated equality wrapper so that missing
            // fields count as "not equal"
            let predicate = if op == CompareOp::Ne {
                StorePredicate::Not(Box::new(StorePredicate::Metadata {
                    path,
                    op: CompareOp::Eq,
                    value,
                }))
            } else {
                StorePredicate::Metadata { path, op, value }
            };
            CompileResult::Pushed(predicate)
        }
        FieldInfo::Computed(_) => CompileResult::NotRepresentable,
    }
}

/// `file.inFolder("X")` compiles to a path-prefix match. Entries are
/// stored without the site's root directory, so a folder argument that
/// names or starts with the root has the root stripped first; stripping
/// the whole argument away means the folder is the effective root and
/// every entry matches.
fn folder_prefix(folder: &str, root_dir: Option<&str>) -> StorePredicate {
    let mut folder = folder.to_string();

    if let Some(root) = root_dir {
        if !root.is_empty() && folder.starts_with(root) {
            folder = folder[root.len()..].to_string();
            if folder.starts_with('/') {
                folder.remove(0);
            }
            if folder.is_empty() {
                return StorePredicate::All;
            }
        }
    }

    if !folder.ends_with('/') {
        folder.push('/');
    }
    StorePredicate::PathPrefix(folder)
}

fn is_file_method(callee: &ExprNode, method: &str) -> bool {
    match callee {
        ExprNode::Member { object, property } => {
            property == method
                && matches!(object.as_ref(), ExprNode::Identifier(name) if name == "file")
        }
        _ => false,
    }
}

fn literal_str(node: &ExprNode) -> Option<&str> {
    match node.as_literal() {
        Some(Literal::Str(s)) => Some(s),
        _ => None,
    }
}

fn compare_op(op: BinaryOp) -> CompareOp {
    match op {
        BinaryOp::Eq => CompareOp::Eq,
        BinaryOp::Ne => CompareOp::Ne,
        BinaryOp::Gt => CompareOp::Gt,
        BinaryOp::Lt => CompareOp::Lt,
        BinaryOp::Gte => CompareOp::Gte,
        BinaryOp::Lte => CompareOp::Lte,
        // callers only pass comparison operators
        _ => CompareOp::Eq,
    }
}

fn literal_to_json(lit: &Literal) -> serde_json::Value {
    match lit {
        Literal::Null => serde_json::Value::Null,
        Literal::Bool(b) => json!(b),
        Literal::Num(n) => {
            if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                json!(*n as i64)
            } else {
                json!(n)
            }
        }
        Literal::Str(s) => json!(s),
    }
}
