//! Typed arithmetic, comparison and collection primitives.
//!
//! Operands must already be of the operation's type; callers convert first.
//! An unknown operand yields an unknown result of the operation's result
//! type. Nulls are rejected because there is nothing to compute with.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;

use crate::errors::{cannot_get_length, division_by_zero, modulo_by_zero, type_required, Result};
use crate::types::Type;
use crate::value::Value;

/// Binary arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Ordering comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

enum Operand<'a> {
    Known(&'a BigDecimal),
    Unknown,
}

fn number_operand(v: &Value) -> Result<Operand<'_>> {
    match v {
        Value::Number(n) => Ok(Operand::Known(n)),
        Value::Unknown(_) => Ok(Operand::Unknown),
        _ => Err(type_required(&Type::Number)),
    }
}

/// Apply a binary arithmetic operator to two numbers.
///
/// Sums, differences, products and remainders are exact at any magnitude.
/// Quotients that do not terminate are rounded to 100 significant digits.
pub fn arithmetic(op: ArithOp, a: &Value, b: &Value) -> Result<Value> {
    let (Operand::Known(x), Operand::Known(y)) = (number_operand(a)?, number_operand(b)?) else {
        return Ok(Value::unknown(Type::Number));
    };
    let result = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => {
            if is_zero(y) {
                return Err(division_by_zero());
            }
            x / y
        }
        // Truncated remainder: the result takes the sign of the dividend.
        ArithOp::Mod => {
            if is_zero(y) {
                return Err(modulo_by_zero());
            }
            x % y
        }
    };
    Ok(Value::number(result.normalized()))
}

fn is_zero(n: &BigDecimal) -> bool {
    *n == BigDecimal::from(0_i64)
}

pub fn negate(a: &Value) -> Result<Value> {
    match number_operand(a)? {
        Operand::Known(x) => Ok(Value::number(-x.clone())),
        Operand::Unknown => Ok(Value::unknown(Type::Number)),
    }
}

/// Compare two numbers or two strings.
///
/// Numbers compare numerically, strings by code point. Mixed operands are a
/// type error: convert them to a common type first.
pub fn compare(op: CompareOp, a: &Value, b: &Value) -> Result<Value> {
    let ordering = match (a, b) {
        (Value::Unknown(_), _) | (_, Value::Unknown(_)) => {
            return Ok(Value::unknown(Type::Bool));
        }
        (Value::Number(x), Value::Number(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.as_str().cmp(y.as_str()),
        (Value::String(_), _) => return Err(type_required(&Type::String)),
        _ => return Err(type_required(&Type::Number)),
    };
    let result = match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

pub fn less_than(a: &Value, b: &Value) -> Result<Value> {
    compare(CompareOp::Lt, a, b)
}

pub fn less_than_or_equal(a: &Value, b: &Value) -> Result<Value> {
    compare(CompareOp::Le, a, b)
}

pub fn greater_than(a: &Value, b: &Value) -> Result<Value> {
    compare(CompareOp::Gt, a, b)
}

/// Number of elements of a collection, or of characters of a string.
///
/// Strings count Unicode scalar values, not bytes.
pub fn length(v: &Value) -> Result<Value> {
    let n = match v {
        Value::Unknown(_) => return Ok(Value::unknown(Type::Number)),
        Value::String(s) => s.chars().count(),
        Value::List { items, .. } | Value::Set { items, .. } | Value::Tuple(items) => items.len(),
        Value::Map { entries, .. } => entries.len(),
        _ => return Err(cannot_get_length(&v.ty())),
    };
    Ok(Value::number(BigDecimal::from(n as u64)))
}

/// Concatenate two strings.
pub fn concat(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Unknown(_), _) | (_, Value::Unknown(_)) => Ok(Value::unknown(Type::String)),
        (Value::String(x), Value::String(y)) => {
            let mut out = String::with_capacity(x.len() + y.len());
            out.push_str(x);
            out.push_str(y);
            Ok(Value::string(out))
        }
        _ => Err(type_required(&Type::String)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
