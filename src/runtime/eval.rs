//! Tree-walking interpreter for filter expressions.

use crate::expr::{BinaryOp, ExprNode, Literal, LogicalOp, UnaryOp};

use super::env::EvalEnv;
use super::errors::{EvalError, EvalResult};
use super::methods;
use super::value::Value;

/// Evaluates an expression against one entry's environment.
pub fn evaluate(node: &ExprNode, env: &EvalEnv) -> EvalResult<Value> {
    match node {
        ExprNode::Literal(lit) => Ok(literal_value(lit)),
        ExprNode::Identifier(name) => Ok(env.lookup(name)),
        ExprNode::Member { object, property } => {
            let object = evaluate(object, env)?;
            Ok(methods::member(&object, property))
        }
        ExprNode::Unary { op, arg } => {
            let value = evaluate(arg, env)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!value.is_truthy()),
                UnaryOp::Neg => Value::Num(-value.number_or_nan()),
            })
        }
        ExprNode::Binary { op, left, right } => {
            let left = evaluate(left, env)?;
            let right = evaluate(right, env)?;
            Ok(binary(*op, &left, &right))
        }
        ExprNode::Logical { op, left, right } => {
            // short-circuit; the operand value itself flows through
            let left = evaluate(left, env)?;
            match op {
                LogicalOp::And => {
                    if left.is_truthy() {
                        evaluate(right, env)
                    } else {
                        Ok(left)
                    }
                }
                LogicalOp::Or => {
                    if left.is_truthy() {
                        Ok(left)
                    } else {
                        evaluate(right, env)
                    }
                }
            }
        }
        ExprNode::Call { callee, args } => {
            let callee = evaluate(callee, env)?;
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(evaluate(arg, env)?);
            }
            match callee {
                Value::Callable(f) => f.call(&evaluated),
                other => Err(EvalError::NotCallable(other.type_name())),
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Num(n) => Value::Num(*n),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Eq => Value::Bool(left.loose_eq(right)),
        BinaryOp::Ne => Value::Bool(!left.loose_eq(right)),
        BinaryOp::Gt => Value::Bool(left.loose_cmp(right) == Some(std::cmp::Ordering::Greater)),
        BinaryOp::Lt => Value::Bool(left.loose_cmp(right) == Some(std::cmp::Ordering::Less)),
        BinaryOp::Gte => Value::Bool(matches!(
            left.loose_cmp(right),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        )),
        BinaryOp::Lte => Value::Bool(matches!(
            left.loose_cmp(right),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        )),
        BinaryOp::Add => {
            // string concatenation wins when either side is a string
            if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
                Value::Str(left.render_string() + &right.render_string())
            } else {
                Value::Num(left.number_or_nan() + right.number_or_nan())
            }
        }
        BinaryOp::Sub => Value::Num(left.number_or_nan() - right.number_or_nan()),
        BinaryOp::Mul => Value::Num(left.number_or_nan() * right.number_or_nan()),
        BinaryOp::Div => Value::Num(left.number_or_nan() / right.number_or_nan()),
        BinaryOp::Mod => Value::Num(left.number_or_nan() % right.number_or_nan()),
    }
}
